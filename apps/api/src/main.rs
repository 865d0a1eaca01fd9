mod config;
mod errors;
mod interview;
mod llm_client;
mod news;
mod routes;
mod serde_ext;
mod state;
mod study;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::ProviderResolver;
use crate::routes::build_router;
use crate::state::AppState;
use crate::study::scraper::WebScraper;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InsightMatrix API v{}", env!("CARGO_PKG_VERSION"));

    // Provider clients are built once and shared read-only
    let resolver = ProviderResolver::from_config(&config)
        .context("Failed to build provider HTTP client")?;
    info!(
        "Provider resolver initialized ({} of {} providers available)",
        resolver.available().len(),
        llm_client::Provider::ALL.len()
    );

    let scraper = WebScraper::new().context("Failed to build scraper HTTP client")?;

    let state = AppState {
        resolver: Arc::new(resolver),
        scraper,
    };

    // The browser frontend calls from another origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
