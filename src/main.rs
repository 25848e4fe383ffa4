//! Scene Tiler Engine - Embeds whole scenes as tiles inside other scenes
//!
//! The Engine is the backend server that:
//! - Creates scene tiles showing a source scene inside the target scene
//! - Copies a source scene's objects onto a tile, moved, scaled and rotated
//! - Removes exactly the objects a tile created when it is cleared
//! - Steps through stacks of tiles such as the floors of a building

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::hooks::log_placement_events;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_tiler_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Scene Tiler Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    if let Some(path) = &config.scenes_file {
        tracing::info!("  Scenes file: {}", path.display());
    }
    if let Some(limit) = config.max_batch {
        tracing::info!("  Max objects per tile: {}", limit);
    }

    // Initialize application state
    let (state, events) = AppState::new(config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");
    let port = state.config.server_port;

    let event_log = tokio::spawn(async move {
        tracing::info!("Starting placement event log");
        log_placement_events(events).await;
    });

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            event_log.abort();
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
