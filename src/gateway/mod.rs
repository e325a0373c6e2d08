mod account;
mod graph;

use async_trait::async_trait;
use serde_json::{Number, Value};
use thiserror::Error;

pub use account::{AccountRef, Credentials, GatewayInitError};
pub use graph::GraphApiGateway;

/// Spend snapshot of the remote account, both amounts in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendFigures {
    pub amount_spent: i64,
    pub spend_cap: i64,
}

impl SpendFigures {
    /// Remaining headroom in dollars.
    ///
    /// Computed in `f64`: both amounts come straight from the remote and
    /// their `i64` difference can overflow.
    pub fn available_limit(&self) -> f64 {
        (self.spend_cap as f64 - self.amount_spent as f64) / 100.0
    }
}

/// Any failure talking to the remote platform.
///
/// `trace` is a JSON array of the calls that led to the failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    pub trace: Value,
}

impl RemoteError {
    pub fn new(message: impl Into<String>, trace: Value) -> Self {
        Self {
            message: message.into(),
            trace,
        }
    }

    pub fn formatted_trace(&self) -> String {
        serde_json::to_string_pretty(&self.trace).unwrap_or_else(|_| self.trace.to_string())
    }
}

#[async_trait]
pub trait AdAccountGateway: Send + Sync {
    async fn fetch_spend_figures(&self) -> Result<SpendFigures, RemoteError>;

    /// Sets the remote spend cap to `spend_cap` exactly as given.
    async fn update_spend_cap(&self, spend_cap: &Number) -> Result<(), RemoteError>;
}
