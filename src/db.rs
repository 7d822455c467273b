pub mod inventory_repo;
pub mod rbac_repo;
pub mod session_repo;
pub mod tenancy_repo;
pub mod user_repo;

pub use inventory_repo::InventoryRepository;
pub use rbac_repo::MembershipRepository;
pub use session_repo::SessionRepository;
pub use tenancy_repo::OrganizationRepository;
pub use user_repo::UserRepository;
