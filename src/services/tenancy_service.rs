// src/services/tenancy_service.rs

use bcrypt::hash;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    common::error::AppError,
    common::ids::make_join_code,
    db::{InventoryRepository, MembershipRepository, OrganizationRepository, UserRepository},
    models::{auth::User, rbac::Role, tenancy::Organization},
};

#[derive(Clone)]
pub struct TenancyService {
    org_repo: OrganizationRepository,
    user_repo: UserRepository,
    membership_repo: MembershipRepository,
    inventory_repo: InventoryRepository,
    pool: SqlitePool,
}

impl TenancyService {
    pub fn new(
        org_repo: OrganizationRepository,
        user_repo: UserRepository,
        membership_repo: MembershipRepository,
        inventory_repo: InventoryRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            org_repo,
            user_repo,
            membership_repo,
            inventory_repo,
            pool,
        }
    }

    // Sorteia códigos até achar um livre. O espaço é pequeno de propósito
    // (código digitável); colisões só custam mais uma rodada.
    async fn unique_join_code(&self, conn: &mut SqliteConnection) -> Result<String, AppError> {
        loop {
            let code = make_join_code();
            if !self.org_repo.join_code_exists(conn, &code).await? {
                return Ok(code);
            }
        }
    }

    pub async fn create_organization(&self, name: &str) -> Result<Organization, AppError> {
        let mut tx = self.pool.begin().await?;
        let code = self.unique_join_code(&mut tx).await?;
        let org = self.org_repo.create_organization(&mut tx, name, &code).await?;
        tx.commit().await?;
        Ok(org)
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        // O hashing fica fora da transação: não toca no banco
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;
        let user = self
            .user_repo
            .create_user(&mut tx, name, email, &password_hash)
            .await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn add_member(
        &self,
        user_id: &str,
        org_id: &str,
        role: Role,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.membership_repo
            .add_member(&mut tx, user_id, org_id, role)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // Garante a conta administrativa na subida do processo: sem usuário
    // 'admin', cria (organização padrão + catálogo de demonstração +
    // admin dono), tudo em uma transação. Rodar de novo é um no-op.
    pub async fn bootstrap_admin(&self) -> Result<(), AppError> {
        if self.user_repo.find_by_name("admin").await?.is_some() {
            return Ok(());
        }

        let password_hash =
            tokio::task::spawn_blocking(|| hash("admin123", bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let org_id = match self.org_repo.find_oldest(&mut tx).await? {
            Some(org) => org.id,
            None => {
                let code = self.unique_join_code(&mut tx).await?;
                let org = self
                    .org_repo
                    .create_organization(&mut tx, "Organização Principal", &code)
                    .await?;
                self.seed_demo(&mut tx, &org.id).await?;
                org.id
            }
        };

        let admin = self
            .user_repo
            .create_user(&mut tx, "admin", "admin@local", &password_hash)
            .await?;
        self.membership_repo
            .add_member(&mut tx, &admin.id, &org_id, Role::Owner)
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Conta 'admin' criada na organização padrão");
        Ok(())
    }

    // Catálogo de demonstração da organização padrão
    async fn seed_demo(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
    ) -> Result<(), AppError> {
        let massager = self
            .inventory_repo
            .insert_product(conn, org_id, "Massageador de rolo", "00044", "un", 650.0, 6, 550.0)
            .await?;
        let serum = self
            .inventory_repo
            .insert_product(conn, org_id, "Sérum facial SkinLab", "00047", "un", 120.0, 35, 80.0)
            .await?;
        self.inventory_repo
            .insert_product(conn, org_id, "Agulha 27g", "00030", "un", 6.0, 190, 3.0)
            .await?;

        self.inventory_repo
            .insert_receipt(conn, org_id, &serum.id, 20, 95.0)
            .await?;
        self.inventory_repo
            .insert_receipt(conn, org_id, &massager.id, 10, 550.0)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppState;

    #[tokio::test]
    async fn bootstrap_e_idempotente() {
        let state = AppState::for_tests().await;

        state.tenancy_service.bootstrap_admin().await.unwrap();
        // Segunda rodada não duplica nada
        state.tenancy_service.bootstrap_admin().await.unwrap();

        let user_repo = UserRepository::new(state.db_pool.clone());
        let admin = user_repo.find_by_name("admin").await.unwrap().unwrap();

        let membership_repo = MembershipRepository::new(state.db_pool.clone());
        let first = membership_repo
            .first_for_user(&admin.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.role, Role::Owner);
        assert_eq!(first.org_name, "Organização Principal");
        assert_eq!(first.org_join_code.unwrap().len(), 6);

        // O catálogo de demonstração veio junto
        let snapshot = state.inventory_service.state(&first.org_id).await.unwrap();
        assert_eq!(snapshot.products.len(), 3);
        assert_eq!(snapshot.receipts.len(), 2);
    }

    #[tokio::test]
    async fn organizacoes_ganham_codigos_distintos() {
        let state = AppState::for_tests().await;

        let a = state
            .tenancy_service
            .create_organization("Org A")
            .await
            .unwrap();
        let b = state
            .tenancy_service
            .create_organization("Org B")
            .await
            .unwrap();

        assert_ne!(a.join_code, b.join_code);
    }
}
