// src/db/session_repo.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{common::error::AppError, models::auth::SessionContext};

// O registro de sessões: tokens opacos com expiração absoluta.
// Cada operação é uma transação independente de um único comando;
// nenhum lock atravessa requisições.
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        token: &str,
        user_id: &str,
        org_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, org_id, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(org_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // Uma consulta só: sessão + usuário + organização + papel atual.
    // O papel NÃO é cacheado no registro da sessão.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionContext>, AppError> {
        let ctx = sqlx::query_as::<_, SessionContext>(
            r#"
            SELECT s.token, s.user_id, s.org_id, s.expires_at,
                   u.name AS user_name, u.email AS email,
                   o.name AS org_name, o.join_code AS org_join_code,
                   m.role AS role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            JOIN organizations o ON o.id = s.org_id
            JOIN memberships m ON m.user_id = s.user_id AND m.org_id = s.org_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ctx)
    }

    // Idempotente: apagar um token desconhecido não é erro
    pub async fn delete(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
