pub mod auth;
pub mod document_service;
pub mod inventory_service;
pub mod rbac_service;
pub mod tenancy_service;

pub use auth::AuthService;
pub use document_service::DocumentService;
pub use inventory_service::InventoryService;
pub use rbac_service::RbacService;
pub use tenancy_service::TenancyService;
