//! Snake-Mint Server
//!
//! Serves the snake game over WebSocket and the redemption-code API over
//! HTTP; minting runs against a mock wallet provider.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snake_mint::api::{generate_code, health, validate_code};
use snake_mint::codes::store::CodeStore;
use snake_mint::config;
use snake_mint::state::AppState;
use snake_mint::wallet::{mock::MockProvider, WalletSession};
use snake_mint::ws::ws_handler;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake_mint=debug,tower_http=debug".into()),
        )
        .init();

    // Open the code store
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| config::DEFAULT_DATABASE_URL.to_string());
    let store = CodeStore::connect(&database_url).await.unwrap();

    // Wallet session over the mock provider; swap the provider to go on-chain
    let wallet = WalletSession::new(Arc::new(MockProvider::dev()));

    // Create shared state
    let state = Arc::new(AppState::new(store, wallet));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/generate-code", post(generate_code))
        .route("/api/validate-code", post(validate_code))
        .route("/ws/game", get(ws_handler))
        .layer(cors)
        .with_state(state);

    // Start the server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config::SERVER_PORT);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("🐍 snake-mint server running on http://{}", addr);
    info!("   WebSocket endpoint: ws://localhost:{}/ws/game", port);

    axum::serve(listener, app).await.unwrap();
}
