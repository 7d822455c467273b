// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::Me;

// ---
// 1. Produto (O catálogo)
// ---
// `stock` nunca fica negativo: expedições validam antes de gravar e a
// reversão de recebimento trava em zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub sku: String,
    pub unit: String,
    pub price: f64,
    pub stock: i64,
    pub purchase_price: f64,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. Recebimento (entrada de estoque, imutável)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub org_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Expedição (saída de estoque, cabeçalho + itens)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct ShipmentRow {
    pub id: String,
    pub org_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItem {
    pub id: i64,
    pub shipment_id: String,
    pub org_id: String,
    pub product_id: String,
    pub quantity: i64,
    // Preço congelado no momento da expedição (pode divergir do catálogo)
    pub price: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ShipmentItem>,
}

// ---
// 4. Snapshot completo da organização
// ---
// Sem paginação: o histórico inteiro volta a cada chamada. Os conjuntos
// de dados são de pequenas empresas, limitados por construção.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgState {
    pub products: Vec<Product>,
    pub receipts: Vec<Receipt>,
    pub shipments: Vec<Shipment>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: OrgState,
    pub me: Me,
}

// ---
// 5. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub sku: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub purchase_price: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPricePayload {
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceiptPayload {
    #[validate(length(min = 1, message = "O campo 'productId' é obrigatório."))]
    pub product_id: String,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItemPayload {
    #[validate(length(min = 1, message = "O campo 'productId' é obrigatório."))]
    pub product_id: String,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,
    // Preço manual opcional; sem ele, congela o preço atual do catálogo
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentPayload {
    #[validate(length(min = 1, message = "Adicione pelo menos uma posição."), nested)]
    pub items: Vec<ShipmentItemPayload>,
}

// ---
// 6. Dados para o documento imprimível de uma expedição
// ---
// Consumidos pelo renderizador externo; aqui só montamos os dados.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPrintLine {
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPrintData {
    pub id: String,
    pub org_name: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ShipmentPrintLine>,
    pub total: f64,
}
