// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::rbac::Role;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

// Uma linha da tabela de sessões. O token é opaco: 32 bytes aleatórios em
// hex, nada de informação embutida.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub org_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// O resultado da resolução de um token: sessão + usuário + organização +
// papel, tudo em uma consulta. O papel vem da tabela de memberships no
// momento da resolução — uma troca de papel vale já na requisição seguinte.
#[derive(Debug, Clone, FromRow)]
pub struct SessionContext {
    pub token: String,
    pub user_id: String,
    pub org_id: String,
    pub user_name: String,
    pub email: String,
    pub org_name: String,
    pub org_join_code: Option<String>,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn me(&self) -> Me {
        Me {
            name: self.user_name.clone(),
            email: self.email.clone(),
            org_name: self.org_name.clone(),
            org_join_code: self.org_join_code.clone().unwrap_or_default(),
            role: self.role,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O nome de usuário é obrigatório."))]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// O "quem sou eu" devolvido em /me, no login e no snapshot de estado
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub name: String,
    pub email: String,
    pub org_name: String,
    pub org_join_code: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    pub me: Me,
}
