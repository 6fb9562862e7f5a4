//! Webhook orchestrator: authenticate, parse, validate, transform, respond.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::domain::transaction::Transaction;
use crate::error::AppError;
use crate::transform;
use crate::validation;
use crate::AppState;

/// Header carrying the base64 signature over the raw request body.
pub const SIGNATURE_HEADER: &str = "verification-signature";

/// Success envelope. Failures use the same `{code, message}` shape via
/// [`AppError`], with `data` absent.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Transaction>>,
}

pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing verification-signature".to_string()))?;

    if body.is_empty() {
        return Err(AppError::BadRequest("Missing request body".to_string()));
    }

    if !state.verifier.verify(&body, signature) {
        return Err(AppError::Unauthorized("Invalid signature".to_string()));
    }
    tracing::debug!("signature verified");

    let payload: Value = serde_json::from_str(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?;

    validation::validate_payload(&payload)
        .map_err(|err| AppError::Unprocessable(err.to_string()))?;

    let outcome = transform::transform_payload(&payload);
    if !outcome.is_clean() {
        let reasons: Vec<String> = outcome
            .failures
            .iter()
            .map(|failure| format!("item {}: {}", failure.index, failure.error))
            .collect();
        tracing::warn!(failures = ?reasons, "detail records failed mapping");
        return Err(AppError::Unprocessable(format!(
            "Failed to map DirectCreditDetails items ({})",
            reasons.join("; ")
        )));
    }

    tracing::info!(
        transactions = outcome.transactions.len(),
        "webhook processed"
    );
    Ok(Json(WebhookResponse {
        code: 200,
        message: "Trigger/event received at webhook & processed successfully!".to_string(),
        data: Some(outcome.transactions),
    }))
}
