// src/handlers/auth.rs

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{CurrentSession, SESSION_COOKIE},
    models::auth::{LoginPayload, LoginResponse, Me},
};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// Handler de registro: desativado de fábrica. Contas entram pelo
// bootstrap do administrador.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    responses(
        (status = 400, description = "Registro desativado")
    )
)]
pub async fn register() -> Result<Json<Value>, AppError> {
    Err(AppError::InvalidInput(
        "Registro desativado. Use a conta do administrador.".to_string(),
    ))
}

// Handler de login: credenciais → cookie de sessão
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = LoginResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, me) = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token));
    Ok((jar, Json(LoginResponse { ok: true, me })))
}

// Handler de logout: revoga a sessão (se houver) e limpa o cookie.
// Sem sessão, continua respondendo ok — revogação é idempotente.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão encerrada")
    )
)]
pub async fn logout(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        app_state.auth_service.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    Ok((jar, Json(json!({ "ok": true }))))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão atual", body = Me),
        (status = 401, description = "Não autenticado")
    ),
    security(("session_cookie" = []))
)]
pub async fn me(CurrentSession(session): CurrentSession) -> Json<Me> {
    Json(session.me())
}
