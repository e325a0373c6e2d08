use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{Number, Value, json};

use super::{AccountRef, AdAccountGateway, GatewayInitError, RemoteError, SpendFigures};
use crate::{config::Config, utils::appsecret_proof};

const FIELD_AMOUNT_SPENT: &str = "amount_spent";
const FIELD_SPEND_CAP: &str = "spend_cap";
const MAX_UPSTREAM_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<i64>,
    error_subcode: Option<i64>,
    fbtrace_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpendFields {
    amount_spent: Option<Value>,
    spend_cap: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UpdateResult {
    #[serde(default)]
    success: bool,
}

/// One call against the Graph API, recorded for error traces.
struct CallFrame {
    operation: &'static str,
    method: Method,
    endpoint: String,
}

impl CallFrame {
    fn trace(&self, status: Option<StatusCode>, graph: Option<&GraphError>) -> Value {
        let mut frame = json!({
            "operation": self.operation,
            "method": self.method.as_str(),
            "endpoint": self.endpoint,
        });
        if let Some(status) = status {
            frame["status"] = json!(status.as_u16());
        }
        if let Some(graph) = graph {
            frame["type"] = json!(graph.kind);
            frame["code"] = json!(graph.code);
            frame["error_subcode"] = json!(graph.error_subcode);
            frame["fbtrace_id"] = json!(graph.fbtrace_id);
        }
        json!([frame])
    }

    fn fail(&self, message: impl Into<String>, status: Option<StatusCode>) -> RemoteError {
        RemoteError::new(message, self.trace(status, None))
    }
}

/// Ad account gateway backed by the Facebook Graph API.
#[derive(Debug, Clone)]
pub struct GraphApiGateway {
    client: Client,
    base_url: String,
    version: String,
    account: AccountRef,
    proof: String,
}

impl GraphApiGateway {
    pub fn new(
        account: AccountRef,
        base_url: &str,
        version: &str,
        client: Client,
    ) -> Self {
        let creds = account.credentials();
        let proof = appsecret_proof(&creds.access_token, &creds.app_secret);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.trim_matches('/').to_string(),
            account,
            proof,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayInitError> {
        let account = AccountRef::from_config(config)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.graph_api_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayInitError::Client(e.to_string()))?;

        Ok(Self::new(
            account,
            &config.graph_api_url,
            &config.graph_api_version,
            client,
        ))
    }

    pub fn account(&self) -> &AccountRef {
        &self.account
    }

    fn frame(&self, operation: &'static str, method: Method) -> CallFrame {
        CallFrame {
            operation,
            method,
            endpoint: format!("/{}/{}", self.version, self.account.account_id()),
        }
    }

    fn auth_params(&self) -> [(&'static str, &str); 2] {
        [
            ("access_token", self.account.credentials().access_token.as_str()),
            ("appsecret_proof", self.proof.as_str()),
        ]
    }

    async fn send(
        &self,
        frame: &CallFrame,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, RemoteError> {
        tracing::debug!(
            "Graph API {} {} ({})",
            frame.method,
            frame.endpoint,
            frame.operation
        );

        let response = request.send().await.map_err(|e| {
            // reqwest includes the URL, and with it the token, in its Display.
            frame.fail(e.without_url().to_string(), None)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| frame.fail(e.without_url().to_string(), Some(status)))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<GraphErrorEnvelope>(&body) {
                Ok(envelope) => RemoteError::new(
                    envelope.error.message.clone(),
                    frame.trace(Some(status), Some(&envelope.error)),
                ),
                Err(_) => frame.fail(
                    format!(
                        "HTTP {} from Graph API: {}",
                        status.as_u16(),
                        truncate_chars(&body, MAX_UPSTREAM_BODY_CHARS)
                    ),
                    Some(status),
                ),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            frame.fail(format!("undecodable Graph API response: {e}"), Some(status))
        })
    }
}

/// Upstream error pages (proxy or CDN HTML) can be arbitrarily large.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Amounts arrive as numeric strings, occasionally as plain numbers.
fn parse_amount(field: &str, value: Option<&Value>) -> Result<i64, String> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("{field} is not an integer amount: {s:?}")),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("{field} is not an integer amount: {n}")),
        Some(other) => Err(format!("{field} is not an integer amount: {other}")),
    }
}

fn parse_figures(body: Value) -> Result<SpendFigures, String> {
    let fields: SpendFields =
        serde_json::from_value(body).map_err(|e| format!("unexpected account payload: {e}"))?;
    Ok(SpendFigures {
        amount_spent: parse_amount(FIELD_AMOUNT_SPENT, fields.amount_spent.as_ref())?,
        spend_cap: parse_amount(FIELD_SPEND_CAP, fields.spend_cap.as_ref())?,
    })
}

#[async_trait]
impl AdAccountGateway for GraphApiGateway {
    async fn fetch_spend_figures(&self) -> Result<SpendFigures, RemoteError> {
        let frame = self.frame("read", Method::GET);
        let request = self
            .client
            .get(format!("{}{}", self.base_url, frame.endpoint))
            .query(&[("fields", format!("{FIELD_AMOUNT_SPENT},{FIELD_SPEND_CAP}"))])
            .query(&self.auth_params());

        let body = self.send(&frame, request).await?;
        parse_figures(body).map_err(|message| frame.fail(message, Some(StatusCode::OK)))
    }

    async fn update_spend_cap(&self, spend_cap: &Number) -> Result<(), RemoteError> {
        let frame = self.frame("update", Method::POST);
        let spend_cap = spend_cap.to_string();
        let auth = self.auth_params();
        let form = [
            (FIELD_SPEND_CAP, spend_cap.as_str()),
            auth[0],
            auth[1],
        ];
        let request = self
            .client
            .post(format!("{}{}", self.base_url, frame.endpoint))
            .form(&form);

        let body = self.send(&frame, request).await?;
        let result: UpdateResult = serde_json::from_value(body)
            .map_err(|e| frame.fail(format!("unexpected update payload: {e}"), Some(StatusCode::OK)))?;
        if !result.success {
            return Err(frame.fail("Graph API did not apply the update", Some(StatusCode::OK)));
        }

        tracing::info!(
            "Spend cap of {} set to {}",
            self.account.account_id(),
            spend_cap
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figures_parse_from_numeric_strings() {
        let figures =
            parse_figures(json!({ "amount_spent": "2500", "spend_cap": "10000", "id": "act_1" }))
                .unwrap();
        assert_eq!(
            figures,
            SpendFigures {
                amount_spent: 2500,
                spend_cap: 10000
            }
        );
    }

    #[test]
    fn figures_accept_numbers_and_missing_fields() {
        let figures = parse_figures(json!({ "amount_spent": 120 })).unwrap();
        assert_eq!(figures.amount_spent, 120);
        assert_eq!(figures.spend_cap, 0);
    }

    #[test]
    fn non_integer_amount_is_an_error() {
        let err = parse_figures(json!({ "amount_spent": "12.5", "spend_cap": "0" })).unwrap_err();
        assert!(err.contains("amount_spent"));

        let err = parse_figures(json!({ "amount_spent": "1", "spend_cap": true })).unwrap_err();
        assert!(err.contains("spend_cap"));
    }

    #[test]
    fn upstream_body_is_truncated() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abécd", 3), "abé...");
        assert_eq!(truncate_chars(&"x".repeat(2000), 512).len(), 515);
    }

    #[test]
    fn trace_frame_carries_graph_details() {
        let frame = CallFrame {
            operation: "read",
            method: Method::GET,
            endpoint: "/v19.0/act_1".into(),
        };
        let graph = GraphError {
            message: "Invalid OAuth access token.".into(),
            kind: Some("OAuthException".into()),
            code: Some(190),
            error_subcode: None,
            fbtrace_id: Some("AbC".into()),
        };
        let trace = frame.trace(Some(StatusCode::BAD_REQUEST), Some(&graph));
        assert_eq!(trace[0]["operation"], "read");
        assert_eq!(trace[0]["method"], "GET");
        assert_eq!(trace[0]["status"], 400);
        assert_eq!(trace[0]["type"], "OAuthException");
        assert_eq!(trace[0]["code"], 190);
        assert_eq!(trace[0]["fbtrace_id"], "AbC");
    }
}
