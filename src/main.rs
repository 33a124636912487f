mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use routes::create_app;
use services::CloudinaryClient;
use state::AppState;
use utils::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up CLOUDINARY_* from a local .env when present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "media_gateway=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting media gateway...");
    tracing::info!("Configuration: {:?}", settings);

    let missing = settings.cloudinary.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(
            "Cloudinary credentials not set: {}; provider calls will be rejected",
            missing.join(", ")
        );
    }

    let provider = CloudinaryClient::new(settings.cloudinary.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create Cloudinary client: {}", e))?;
    tracing::info!("Cloudinary client ready for folder {}", provider.folder());

    let staging_dir = settings.upload.staging_dir();
    tokio::fs::create_dir_all(&staging_dir).await?;

    let app_state = AppState::new(Arc::new(provider), staging_dir);
    let app = create_app(app_state, settings.upload.body_limit_bytes());

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
