// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Cada variante carrega um "kind" estável, checável por máquina, além da
// mensagem legível.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Requer autenticação")]
    Unauthenticated,

    #[error("Nome de usuário ou senha inválidos")]
    InvalidCredentials,

    #[error("Permissão insuficiente")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário não pertence à sua organização")]
    MembershipNotFound,

    #[error("Usuário não possui organização")]
    NoOrganization,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Recebimento não encontrado")]
    ReceiptNotFound,

    #[error("Expedição não encontrada")]
    ShipmentNotFound,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    // A tag devolvida no corpo JSON junto com a mensagem.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => "VALIDATION_ERROR",
            AppError::Unauthenticated | AppError::InvalidCredentials => "UNAUTHENTICATED",
            AppError::Forbidden | AppError::NoOrganization => "FORBIDDEN",
            AppError::UserNotFound
            | AppError::MembershipNotFound
            | AppError::ProductNotFound
            | AppError::ReceiptNotFound
            | AppError::ShipmentNotFound => "NOT_FOUND",
            AppError::InsufficientStock => "INSUFFICIENT_STOCK",
            AppError::DatabaseError(_)
            | AppError::BcryptError(_)
            | AppError::InternalServerError(_) => "INTERNAL_FAILURE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::NoOrganization => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::MembershipNotFound
            | AppError::ProductNotFound
            | AppError::ReceiptNotFound
            | AppError::ShipmentNotFound => StatusCode::NOT_FOUND,
            AppError::InsufficientStock => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::BcryptError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Retorna todos os detalhes da validação, campo a campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "kind": self.kind(),
                "details": details,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let status = self.status();

        // Erros de infraestrutura viram 500 genérico; o detalhe fica só no log.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {:?}", self);
            let body = Json(json!({
                "error": "Ocorreu um erro inesperado.",
                "kind": self.kind(),
            }));
            return (status, body).into_response();
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nao_autenticado_e_proibido_sao_distintos() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_ne!(AppError::Unauthenticated.kind(), AppError::Forbidden.kind());
    }

    #[test]
    fn nao_encontrado_cobre_entidades_do_livro() {
        for err in [
            AppError::ProductNotFound,
            AppError::ReceiptNotFound,
            AppError::ShipmentNotFound,
            AppError::MembershipNotFound,
        ] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.kind(), "NOT_FOUND");
        }
    }

    #[test]
    fn estoque_insuficiente_tem_kind_proprio() {
        assert_eq!(AppError::InsufficientStock.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InsufficientStock.kind(), "INSUFFICIENT_STOCK");
    }
}
