//! Main Entrypoint for the Avatar Demo API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the avatar and generation provider clients.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use avatar_demo_api::{
    config::Config,
    router::{ENDPOINTS, create_router},
    state::AppState,
};
use avatar_demo_core::{
    avatar::{AvatarProvider, HeyGenClient},
    generation::{GeminiClient, GenerationProvider},
    orchestrator::Orchestrator,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Provider Clients ---
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let avatar: Arc<dyn AvatarProvider> =
        Arc::new(HeyGenClient::from_config(http.clone(), &config.providers.avatar));
    let generator: Arc<dyn GenerationProvider> =
        Arc::new(GeminiClient::from_config(http, &config.providers.generation));

    let app_state = Arc::new(AppState::new(Orchestrator::new(
        avatar,
        generator,
        config.delivery,
    )));

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        avatar_id = %config.providers.avatar.avatar_id,
        model = %config.providers.generation.model,
        delivery = ?config.delivery,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    for (route, description) in ENDPOINTS {
        info!(route, description, "Endpoint");
    }
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
