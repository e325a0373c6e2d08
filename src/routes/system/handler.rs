use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// Ping response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    /// Server time, unix seconds.
    pub timestamp: i64,
}

/// Liveness probe; never calls the ad platform.
pub async fn ping() -> impl IntoResponse {
    let now = chrono::Utc::now();

    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
            timestamp: now.timestamp(),
        }),
    )
}
