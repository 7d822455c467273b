// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentSession,
        rbac::{PermLedgerWrite, RequirePermission},
    },
    models::inventory::{
        CreateProductPayload, CreateReceiptPayload, CreateShipmentPayload, StateResponse,
        UpdateProductPayload, UpdateProductPricePayload,
    },
};

// ---
// Snapshot
// ---

#[utoipa::path(
    get,
    path = "/api/state",
    tag = "Inventory",
    responses(
        (status = 200, description = "Snapshot completo da organização", body = StateResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("session_cookie" = []))
)]
pub async fn get_state(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<StateResponse>, AppError> {
    let state = app_state.inventory_service.state(&session.org_id).await?;
    Ok(Json(StateResponse {
        state,
        me: session.me(),
    }))
}

// ---
// Produtos
// ---

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Papel sem permissão de escrita")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let snapshot = app_state
        .inventory_service
        .create_product(
            &session.org_id,
            &payload.name,
            payload.sku.as_deref(),
            payload.unit.as_deref(),
            payload.price,
            payload.stock,
            payload.purchase_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/price",
    tag = "Inventory",
    request_body = UpdateProductPricePayload,
    params(("id" = String, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Preço atualizado; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 404, description = "Produto não encontrado na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_product_price(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateProductPricePayload>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .inventory_service
        .update_product_price(&session.org_id, &product_id, payload.price)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Inventory",
    request_body = UpdateProductPayload,
    params(("id" = String, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto atualizado; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 400, description = "Nome em branco"),
        (status = 404, description = "Produto não encontrado na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let snapshot = app_state
        .inventory_service
        .update_product(&session.org_id, &product_id, &payload.name, payload.price)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "Produto removido; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 404, description = "Produto não encontrado na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .inventory_service
        .delete_product(&session.org_id, &product_id)
        .await?;
    Ok(Json(snapshot))
}

// ---
// Recebimentos
// ---

#[utoipa::path(
    post,
    path = "/api/receipts",
    tag = "Inventory",
    request_body = CreateReceiptPayload,
    responses(
        (status = 201, description = "Recebimento lançado; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_receipt(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Json(payload): Json<CreateReceiptPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let snapshot = app_state
        .inventory_service
        .create_receipt(
            &session.org_id,
            &payload.product_id,
            payload.quantity,
            payload.cost,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    delete,
    path = "/api/receipts/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "Id do recebimento")),
    responses(
        (status = 200, description = "Recebimento revertido; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 404, description = "Recebimento não encontrado na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_receipt(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Path(receipt_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .inventory_service
        .delete_receipt(&session.org_id, &receipt_id)
        .await?;
    Ok(Json(snapshot))
}

// ---
// Expedições
// ---

#[utoipa::path(
    post,
    path = "/api/shipments",
    tag = "Inventory",
    request_body = CreateShipmentPayload,
    responses(
        (status = 201, description = "Expedição gravada; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 400, description = "Posições inválidas"),
        (status = 404, description = "Produto de alguma posição não existe na organização"),
        (status = 409, description = "Saldo insuficiente em alguma posição")
    ),
    security(("session_cookie" = []))
)]
pub async fn create_shipment(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Json(payload): Json<CreateShipmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let snapshot = app_state
        .inventory_service
        .create_shipment(&session.org_id, &payload.items)
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    delete,
    path = "/api/shipments/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "Id da expedição")),
    responses(
        (status = 200, description = "Expedição desfeita; snapshot atualizado", body = crate::models::inventory::OrgState),
        (status = 404, description = "Expedição não encontrada na organização")
    ),
    security(("session_cookie" = []))
)]
pub async fn delete_shipment(
    State(app_state): State<AppState>,
    CurrentSession(session): CurrentSession,
    _guard: RequirePermission<PermLedgerWrite>,
    Path(shipment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = app_state
        .inventory_service
        .delete_shipment(&session.org_id, &shipment_id)
        .await?;
    Ok(Json(snapshot))
}
