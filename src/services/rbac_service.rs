// src/services/rbac_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{MembershipRepository, UserRepository},
    models::rbac::Role,
};

#[derive(Clone)]
pub struct RbacService {
    user_repo: UserRepository,
    membership_repo: MembershipRepository,
    pool: SqlitePool,
}

impl RbacService {
    pub fn new(
        user_repo: UserRepository,
        membership_repo: MembershipRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            user_repo,
            membership_repo,
            pool,
        }
    }

    // Troca o papel de um membro da organização do chamador. O alvo é
    // localizado por e-mail e PRECISA já ser membro — ninguém é criado ou
    // convidado por aqui. A mudança vale na próxima resolução de sessão.
    pub async fn change_member_role(
        &self,
        org_id: &str,
        email: &str,
        role: Role,
    ) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::InvalidInput(
                "Informe o e-mail do membro.".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.membership_repo
            .find_for_user_in_org(&user.id, org_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        let mut tx = self.pool.begin().await?;
        let rows = self
            .membership_repo
            .update_role(&mut tx, &user.id, org_id, role)
            .await?;
        if rows == 0 {
            return Err(AppError::MembershipNotFound);
        }
        tx.commit().await?;

        tracing::info!(%email, ?role, "Papel de membro atualizado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppState;
    use crate::db::OrganizationRepository;

    async fn seed(state: &AppState) -> (String, String) {
        let org_repo = OrganizationRepository::new(state.db_pool.clone());
        let user_repo = UserRepository::new(state.db_pool.clone());
        let membership_repo = MembershipRepository::new(state.db_pool.clone());

        let mut tx = state.db_pool.begin().await.unwrap();
        let org = org_repo
            .create_organization(&mut tx, "Org RBAC", "RBAC01")
            .await
            .unwrap();
        let user = user_repo
            .create_user(&mut tx, "eva", "eva@local", "$2b$04$hashfake")
            .await
            .unwrap();
        membership_repo
            .add_member(&mut tx, &user.id, &org.id, Role::Viewer)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        (org.id, user.id)
    }

    #[tokio::test]
    async fn troca_papel_de_membro_existente() {
        let state = AppState::for_tests().await;
        let (org_id, user_id) = seed(&state).await;

        state
            .rbac_service
            .change_member_role(&org_id, "eva@local", Role::Manager)
            .await
            .unwrap();

        let membership_repo = MembershipRepository::new(state.db_pool.clone());
        let membership = membership_repo
            .find_for_user_in_org(&user_id, &org_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, Role::Manager);
    }

    #[tokio::test]
    async fn alvo_desconhecido_ou_de_fora_e_not_found() {
        let state = AppState::for_tests().await;
        let (org_id, _) = seed(&state).await;

        let err = state
            .rbac_service
            .change_member_role(&org_id, "ninguem@local", Role::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));

        // Usuário existe mas pertence a outra organização
        let org_repo = OrganizationRepository::new(state.db_pool.clone());
        let mut tx = state.db_pool.begin().await.unwrap();
        let other = org_repo
            .create_organization(&mut tx, "Outra Org", "OUTR01")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let err = state
            .rbac_service
            .change_member_role(&other.id, "eva@local", Role::Manager)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MembershipNotFound));
    }
}
