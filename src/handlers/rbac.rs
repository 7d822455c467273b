// src/handlers/rbac.rs

use axum::{extract::State, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentSession,
        rbac::{PermManageRoles, RequirePermission},
    },
    models::rbac::ChangeRolePayload,
};

// Troca o papel de um membro da organização do chamador. Só o dono passa
// pelo guardião.
#[utoipa::path(
    post,
    path = "/api/memberships/role",
    tag = "RBAC",
    request_body = ChangeRolePayload,
    responses(
        (status = 200, description = "Papel atualizado"),
        (status = 403, description = "Só o dono pode trocar papéis"),
        (status = 404, description = "Usuário não é membro da organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn change_member_role(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermManageRoles>,
    Json(payload): Json<ChangeRolePayload>,
) -> Result<Json<Value>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .rbac_service
        .change_member_role(&session.org_id, &payload.email, payload.role)
        .await?;

    Ok(Json(json!({ "ok": true })))
}
