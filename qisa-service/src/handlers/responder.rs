use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::error::{ResponderError, ValidationError};
use crate::models::ResponderReply;
use crate::services::{build_instruction, validate_payload};
use crate::startup::AppState;

/// `POST /responder`: answer one question about the store in the payload.
#[tracing::instrument(skip(state, payload))]
pub async fn responder(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResponderReply>, ResponderError> {
    let Json(body) = payload.map_err(|e| ValidationError::InvalidBody(e.body_text()))?;

    tracing::debug!(body = %body, "POST /responder body");

    let request = validate_payload(&body)?;

    tracing::info!(
        store = request.store.nome.as_deref().unwrap_or("-"),
        products = request.products.len(),
        question_len = request.question.len(),
        "POST /responder called"
    );

    let instruction = build_instruction(&request.store, &request.products);
    let reply = state.gateway.ask(&instruction, &request.question).await?;

    Ok(Json(ResponderReply {
        resposta: reply.trim().to_string(),
    }))
}
