use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::gateway::RemoteError;
use crate::validation::Violation;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid argument: {}", .fields.join(", "))]
    InvalidArgument { fields: Vec<String> },
    #[error("FB error: {0}")]
    Remote(#[from] RemoteError),
}

impl AppError {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        AppError::InvalidArgument {
            fields: violations.into_iter().map(|v| v.property_path).collect(),
        }
    }
}

#[derive(Serialize)]
struct InvalidArgumentResponse {
    error: &'static str,
    fields: Vec<String>,
}

#[derive(Serialize)]
struct RemoteErrorResponse {
    error: &'static str,
    message: String,
    trace: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidArgument { fields } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(InvalidArgumentResponse {
                    error: "invalid argument",
                    fields,
                }),
            )
                .into_response(),
            AppError::Remote(err) => {
                let trace = err.formatted_trace();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(RemoteErrorResponse {
                        error: "FB error",
                        message: err.message,
                        trace,
                    }),
                )
                    .into_response()
            }
        }
    }
}
