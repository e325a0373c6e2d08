use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::{AppState, error::AppError, validation::object_or_empty};

use super::model::{LIMIT_FIELD, SpendLimitResponse, limit_update_constraints};

#[axum::debug_handler]
pub async fn get_spend_limit(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let figures = state.gateway.fetch_spend_figures().await?;
    tracing::debug!(
        "Spend figures: spent {} of cap {}",
        figures.amount_spent,
        figures.spend_cap
    );

    Ok((
        StatusCode::OK,
        Json(SpendLimitResponse {
            limit: figures.available_limit(),
        }),
    ))
}

/// Updates the remote spend cap.
///
/// The validated `limit` is forwarded exactly as received, in dollars, while
/// the read path treats the same remote field as cents. No conversion happens
/// here; the intended unit of the update is unconfirmed.
#[axum::debug_handler]
pub async fn set_spend_limit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload = object_or_empty(&body);

    let violations = limit_update_constraints().validate(&payload);
    if !violations.is_empty() {
        return Err(AppError::from_violations(violations));
    }

    // Validation above guarantees a float `limit`; this arm only keeps the
    // extraction total.
    let Some(Value::Number(limit)) = payload.get(LIMIT_FIELD) else {
        return Err(AppError::InvalidArgument {
            fields: vec![format!("[{LIMIT_FIELD}]")],
        });
    };

    state.gateway.update_spend_cap(limit).await?;

    Ok(StatusCode::NO_CONTENT)
}
