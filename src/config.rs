// src/config.rs

use std::{env, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    db::{
        InventoryRepository, MembershipRepository, OrganizationRepository, SessionRepository,
        UserRepository,
    },
    services::{AuthService, DocumentService, InventoryService, RbacService, TenancyService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub rbac_service: RbacService,
    pub tenancy_service: TenancyService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:estoque.db".to_string());

        // WAL + busy_timeout: gravadores concorrentes esperam a vez em vez
        // de falhar; foreign_keys liga as cascatas do esquema.
        let options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // Monta o gráfico de dependências a partir de uma pool pronta.
    // Os testes de integração usam isto com um banco em memória.
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let org_repo = OrganizationRepository::new(db_pool.clone());
        let membership_repo = MembershipRepository::new(db_pool.clone());
        let session_repo = SessionRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            membership_repo.clone(),
            session_repo,
        );
        let inventory_service = InventoryService::new(inventory_repo.clone(), db_pool.clone());
        let rbac_service = RbacService::new(
            user_repo.clone(),
            membership_repo.clone(),
            db_pool.clone(),
        );
        let tenancy_service = TenancyService::new(
            org_repo,
            user_repo,
            membership_repo,
            inventory_repo.clone(),
            db_pool.clone(),
        );
        let document_service = DocumentService::new(inventory_repo);

        Self {
            db_pool,
            auth_service,
            inventory_service,
            rbac_service,
            tenancy_service,
            document_service,
        }
    }

    // Banco em memória com o esquema aplicado, para os testes de unidade
    #[cfg(test)]
    pub(crate) async fn for_tests() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("opções do SQLite em memória")
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("falha ao abrir o banco em memória");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .expect("falha ao aplicar as migrações de teste");

        Self::from_pool(db_pool)
    }
}
