// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// ---
// 1. Role (O Papel)
// ---
// Exatamente um papel por (usuário, organização). O papel é resolvido do
// banco a cada requisição, nunca gravado na sessão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Manager,
    Viewer,
}

// ---
// 2. Membership (A "Ponte" Usuário-Organização)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub org_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Payload: troca de papel de um membro
// ---
// Só o dono da organização pode usar isto.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeRolePayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub role: Role,
}
