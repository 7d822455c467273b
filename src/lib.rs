// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

// Monta o router de produção. Os testes de integração usam exatamente
// este app, só trocando a pool por um banco em memória.
pub fn build_app(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas; logout lê o cookie por conta própria)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    // /api/auth/me exige sessão
    let me_routes = Router::new()
        .route("/me", get(handlers::auth::me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Tudo abaixo passa pelo guardião de sessão; os handlers de escrita
    // ainda checam o papel via RequirePermission.
    let protected_routes = Router::new()
        .route("/state", get(handlers::inventory::get_state))
        .route("/memberships/role", post(handlers::rbac::change_member_role))
        .route("/products", post(handlers::inventory::create_product))
        .route(
            "/products/{id}/price",
            patch(handlers::inventory::update_product_price),
        )
        .route(
            "/products/{id}",
            patch(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        )
        .route("/receipts", post(handlers::inventory::create_receipt))
        .route("/receipts/{id}", delete(handlers::inventory::delete_receipt))
        .route("/shipments", post(handlers::inventory::create_shipment))
        .route(
            "/shipments/{id}",
            delete(handlers::inventory::delete_shipment),
        )
        .route(
            "/shipments/{id}/print",
            get(handlers::documents::shipment_print),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo sob /api num único nível de nest
    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes.merge(me_routes))
        .merge(protected_routes);

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
