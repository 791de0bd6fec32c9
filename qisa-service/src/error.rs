//! Errors raised while answering a question.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::ErrorResponse;
use std::time::Duration;
use thiserror::Error;

use crate::services::providers::ProviderError;

/// Message returned to callers for every gateway failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Erro ao gerar resposta da qisa";

/// Rejected request payload. Rendered as HTTP 400.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error(
        "Loja, produtos e pergunta são obrigatórios. Campos ausentes ou inválidos: {}",
        .0.join(", ")
    )]
    MissingFields(Vec<&'static str>),

    #[error("Dados da loja inválidos: {0}")]
    InvalidStore(String),

    #[error("Lista de produtos inválida: {0}")]
    InvalidProducts(String),

    #[error("Dados inválidos em {field}: {detail}")]
    Constraint { field: String, detail: String },
}

/// Failure talking to the text provider. Rendered as a generic HTTP 500.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Provider did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Provider returned no usable text")]
    EmptyReply,
}

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for ResponderError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ResponderError::Validation(err) => {
                tracing::warn!(error = %err, "Rejected responder request");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ResponderError::Gateway(err) => {
                tracing::error!(error = %err, "Failed to generate answer");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
