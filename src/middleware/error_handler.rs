use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

const MAX_LOGGED_BODY: usize = 4 * 1024;

/// Logs every 4xx/5xx response together with its body.
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    // Error bodies are built in-process, so the whole body is buffered and
    // handed back; only the logged copy is cut short.
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read error response body: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };
    let body_str = logged_prefix(&bytes);

    if status.is_server_error() {
        error!(
            "Server error occurred - {} {} - Status: {}, Body: {}",
            method, uri, status, body_str
        );
    } else {
        warn!(
            "Request rejected - {} {} - Status: {}, Body: {}",
            method, uri, status, body_str
        );
    }

    // Rebuild the response around the buffered body.
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

fn logged_prefix(bytes: &[u8]) -> String {
    if bytes.len() <= MAX_LOGGED_BODY {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    format!(
        "{}... ({} bytes total)",
        String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY]),
        bytes.len()
    )
}
