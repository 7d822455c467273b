// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// Organization (O "Tenant")
// ---
// A conta isolada: cada organização tem seu próprio catálogo, recebimentos,
// expedições e membros. Nenhuma consulta cruza organizações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    // Código curto compartilhável para entrada na organização
    pub join_code: Option<String>,
    pub created_at: DateTime<Utc>,
}
