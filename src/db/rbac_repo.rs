// src/db/rbac_repo.rs

use chrono::Utc;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::{
    common::error::AppError,
    common::ids::make_id,
    models::rbac::{Membership, Role},
};

// A primeira organização do usuário, resolvida no login
#[derive(Debug, Clone, FromRow)]
pub struct FirstMembership {
    pub org_id: String,
    pub role: Role,
    pub org_name: String,
    pub org_join_code: Option<String>,
}

// O repositório de vínculos usuário-organização, com exatamente um papel
// por par (garantido pelo UNIQUE no banco)
#[derive(Clone)]
pub struct MembershipRepository {
    pool: SqlitePool,
}

impl MembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_for_user_in_org(
        &self,
        user_id: &str,
        org_id: &str,
    ) -> Result<Option<Membership>, AppError> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = ? AND org_id = ?",
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    // A sessão nasce presa à organização mais antiga do usuário
    pub async fn first_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<FirstMembership>, AppError> {
        let membership = sqlx::query_as::<_, FirstMembership>(
            r#"
            SELECT m.org_id, m.role, o.name AS org_name, o.join_code AS org_join_code
            FROM memberships m
            JOIN organizations o ON o.id = m.org_id
            WHERE m.user_id = ?
            ORDER BY m.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    pub async fn add_member(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        org_id: &str,
        role: Role,
    ) -> Result<Membership, AppError> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (id, user_id, org_id, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(make_id("m"))
        .bind(user_id)
        .bind(org_id)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(membership)
    }

    // Vale a partir da PRÓXIMA requisição: o papel é relido do banco a cada
    // resolução de sessão, nunca cacheado no registro da sessão.
    pub async fn update_role(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        org_id: &str,
        role: Role,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE memberships SET role = ? WHERE user_id = ? AND org_id = ?")
            .bind(role)
            .bind(user_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
