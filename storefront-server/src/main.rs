//! storefront-server: print shop storefront and back-office API
//!
//! Long-running service that:
//! - Serves the public, localized catalog (tr / en / de) and the mega-menu
//! - Renders product forms from category template schemas and prices quotes
//! - Provides the JWT-protected admin API for catalog and content management

mod api;
mod auth;
mod catalog;
mod config;
mod db;
mod error;
mod logger;
mod pricing;
mod state;
mod template;
mod util;
mod validation;

use std::net::SocketAddr;

use config::Config;
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    logger::init_logger(
        config.log_format.as_deref() == Some("json"),
        config.log_dir.as_deref(),
    );

    tracing::info!("Starting storefront-server (env: {})", config.environment);
    if !config.is_development() && config.cors_allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS is empty; any origin is allowed");
    }

    let state = AppState::new(&config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::create_router(state, &config.cors_allowed_origins);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("storefront-server HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("storefront-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
