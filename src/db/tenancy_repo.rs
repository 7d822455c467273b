// src/db/tenancy_repo.rs

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{common::error::AppError, common::ids::make_id, models::tenancy::Organization};

// O repositório de organizações (os "tenants" do sistema)
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: SqlitePool,
}

impl OrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, org_id: &str) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = ?")
            .bind(org_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(org)
    }

    // A organização mais antiga vira o destino do admin no bootstrap
    pub async fn find_oldest(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;
        Ok(org)
    }

    pub async fn join_code_exists(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
    ) -> Result<bool, AppError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT id FROM organizations WHERE join_code = ?")
                .bind(code)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row.is_some())
    }

    pub async fn create_organization(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
        join_code: &str,
    ) -> Result<Organization, AppError> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, name, join_code, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(make_id("org"))
        .bind(name)
        .bind(join_code)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(org)
    }
}
