#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Number, Value, json};
use spend_limit::{
    AppState,
    config::Config,
    gateway::{AdAccountGateway, RemoteError, SpendFigures},
};
use tower::ServiceExt;

pub fn test_config(api_base_uri: &str) -> Config {
    Config {
        app_id: "app".into(),
        app_secret: "secret".into(),
        access_token: "token".into(),
        ad_account_id: "act_1".into(),
        graph_api_url: "http://127.0.0.1:1".into(),
        graph_api_version: "v19.0".into(),
        graph_api_timeout_secs: None,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: api_base_uri.into(),
    }
}

/// Scripted gateway recording every spend cap update it receives.
#[derive(Default)]
pub struct MockGateway {
    pub figures: Option<SpendFigures>,
    pub fail_with: Option<String>,
    pub updates: Mutex<Vec<Number>>,
}

impl MockGateway {
    pub fn with_figures(spend_cap: i64, amount_spent: i64) -> Self {
        Self {
            figures: Some(SpendFigures {
                amount_spent,
                spend_cap,
            }),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn updates(&self) -> Vec<Number> {
        self.updates.lock().unwrap().clone()
    }

    fn failure(&self, operation: &str) -> Option<RemoteError> {
        self.fail_with
            .as_ref()
            .map(|m| RemoteError::new(m.clone(), json!([{ "operation": operation }])))
    }
}

#[async_trait]
impl AdAccountGateway for MockGateway {
    async fn fetch_spend_figures(&self) -> Result<SpendFigures, RemoteError> {
        if let Some(err) = self.failure("read") {
            return Err(err);
        }
        Ok(self.figures.unwrap_or(SpendFigures {
            amount_spent: 0,
            spend_cap: 0,
        }))
    }

    async fn update_spend_cap(&self, spend_cap: &Number) -> Result<(), RemoteError> {
        self.updates.lock().unwrap().push(spend_cap.clone());
        match self.failure("update") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn router(gateway: Arc<MockGateway>, api_base_uri: &str) -> Router {
    spend_limit::app(AppState {
        config: test_config(api_base_uri),
        gateway,
    })
}

pub async fn call(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}
