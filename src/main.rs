use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use spend_limit::{AppState, config::Config, gateway::GraphApiGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // The ad platform is only contacted on the first request.
    let gateway = match GraphApiGateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!("Failed to initialise ad account gateway: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Serving ad account {} via {}/{}",
        gateway.account().account_id(),
        config.graph_api_url,
        config.graph_api_version
    );

    let state = AppState {
        config: config.clone(),
        gateway: Arc::new(gateway),
    };
    let app = spend_limit::app(state);

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
