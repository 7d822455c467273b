// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,

        // --- Inventory ---
        handlers::inventory::get_state,
        handlers::inventory::create_product,
        handlers::inventory::update_product_price,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::create_receipt,
        handlers::inventory::delete_receipt,
        handlers::inventory::create_shipment,
        handlers::inventory::delete_shipment,

        // --- RBAC ---
        handlers::rbac::change_member_role,

        // --- Documents ---
        handlers::documents::shipment_print,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::Me,
            models::auth::LoginResponse,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::Membership,
            models::rbac::ChangeRolePayload,

            // --- Tenancy ---
            models::tenancy::Organization,

            // --- Inventory ---
            models::inventory::Product,
            models::inventory::Receipt,
            models::inventory::Shipment,
            models::inventory::ShipmentItem,
            models::inventory::OrgState,
            models::inventory::StateResponse,
            models::inventory::CreateProductPayload,
            models::inventory::UpdateProductPricePayload,
            models::inventory::UpdateProductPayload,
            models::inventory::CreateReceiptPayload,
            models::inventory::ShipmentItemPayload,
            models::inventory::CreateShipmentPayload,
            models::inventory::ShipmentPrintLine,
            models::inventory::ShipmentPrintData,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessão"),
        (name = "Inventory", description = "Catálogo, recebimentos e expedições"),
        (name = "RBAC", description = "Papéis dos membros da organização"),
        (name = "Documents", description = "Dados para documentos imprimíveis")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                crate::middleware::auth::SESSION_COOKIE,
            ))),
        );
    }
}
