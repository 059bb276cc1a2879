mod analytics;
mod auth;
mod config;
mod db;
mod errors;
mod identity;
mod models;
mod recommendations;
mod routes;
mod state;
mod survey;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::cache::ResponseCache;
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::identity::IdentityClient;
use crate::recommendations::{seed, tables::RecommendationTables};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and ensure the collections exist
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;
    seed::seed_if_empty(&db).await?;

    // Lookup tables are loaded once; edits to the backing collection take
    // effect on the next boot
    let tables = Arc::new(RecommendationTables::load(&db).await?);

    // Identity provider client
    let identity = IdentityClient::new(
        config.identity_api_key.clone(),
        config.identity_base_url.clone(),
    );
    info!("Identity client initialized");

    let analytics_cache = Arc::new(ResponseCache::new(Duration::from_secs(
        config.analytics_cache_ttl_secs,
    )));

    // Build app state
    let state = AppState {
        db,
        identity,
        tables,
        analytics_cache,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
