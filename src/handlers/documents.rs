// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentSession,
    models::inventory::ShipmentPrintData,
};

// Dados do documento imprimível de uma expedição. Leitura: qualquer papel
// com sessão válida. Quem renderiza o documento é o consumidor.
#[utoipa::path(
    get,
    path = "/api/shipments/{id}/print",
    tag = "Documents",
    params(("id" = String, Path, description = "Id da expedição")),
    responses(
        (status = 200, description = "Dados do documento", body = ShipmentPrintData),
        (status = 404, description = "Expedição não encontrada na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn shipment_print(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(shipment_id): Path<String>,
) -> Result<Json<ShipmentPrintData>, AppError> {
    let data = app_state
        .document_service
        .shipment_print_data(&session.org_id, &session.org_name, &shipment_id)
        .await?;
    Ok(Json(data))
}
