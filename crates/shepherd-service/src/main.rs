//! Shepherd Service - metering gate for tutoring features
//!
//! This is the main entry point for the shepherd service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shepherd_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shepherd=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shepherd Service");

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        fermata_configured = config.has_fermata(),
        failure_policy = %config.failure_policy,
        firebase_url = %config.firebase_database_url,
        "Service configuration loaded"
    );

    let state = AppState::new(config.clone());
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
