//! exchange-hub server
//!
//! WebSocket chat hub. Any peer can type `exchange` (or
//! `exchange <days> <CODE...>`) to fetch historical exchange rates, which are
//! broadcast to every connected peer as a text table.

mod config;
mod handlers;
mod hub;
mod names;
mod registry;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_core::{PrivatBankClient, RateFetcher};

use crate::config::HubConfig;
use crate::handlers::{chat_socket_handler, health_check};
use crate::hub::Hub;
use crate::registry::PeerRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = HubConfig::from_env();

    // Upstream source with one client per egress route
    let routes = config.source.route_pool();
    let source = Arc::new(PrivatBankClient::from_config(&config.source)?);
    tracing::info!("Rate source: {}", config.source.base_url);
    for route in routes.routes() {
        tracing::info!("  Route: {}", route);
    }

    let registry = Arc::new(PeerRegistry::new());
    let fetcher = RateFetcher::new(source, routes);
    let state = AppState::new(Hub::new(registry, fetcher, config.defaults.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(chat_socket_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("exchange-hub listening on ws://{}", config.bind_addr);
    tracing::info!("  GET /       - WebSocket chat");
    tracing::info!("  GET /health - Health check");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
