use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod dispatch;
mod error;
mod handlers;
mod hooks;
mod metrics;
mod models;
mod seed;
mod store;

use crate::config::Config;
use crate::metrics::CounterSet;
use crate::store::Store;

/// Shared application state — cheap to clone (all heap behind Arc).
///
/// The store is the single process-wide mutable structure; every mutation
/// goes through its write lock, so id assignment and the analytics
/// aggregate update cannot race. The counters are atomics beside it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub counters: Arc<CounterSet>,
    pub started_at: Instant,
}

impl AppState {
    fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::with_catalog(seed::starting_catalog()))),
            counters: Arc::new(CounterSet::new()),
            started_at: Instant::now(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cms_plugin_service=debug".parse().unwrap()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CMS Plugin Service  —  Rust + Axum  ║");
    info!("╚══════════════════════════════════════╝");
    info!(
        slug = handlers::PLUGIN_SLUG,
        version = env!("CARGO_PKG_VERSION"),
        "Plugin initialized"
    );

    let state = AppState::new();
    info!(
        products = state.store.read().await.product_count(),
        "Starting catalog seeded"
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);
    info!("Health endpoint: /health — actions discovery: /actions");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Liveness + discovery ────────────────────────────────────────────
        .route("/health", get(handlers::health))
        .route("/actions", get(handlers::list_actions))
        .route("/ping", get(handlers::ping).post(handlers::ping))

        // ── Webhook hooks ───────────────────────────────────────────────────
        .route("/actions/product", post(handlers::webhooks::product_action))
        .route("/actions/order", post(handlers::webhooks::order_action))
        .route(
            "/actions/analytics",
            post(handlers::webhooks::analytics_action),
        )

        // ── Benchmarking + generic execution ────────────────────────────────
        .route("/benchmark", get(handlers::benchmark::run).post(handlers::benchmark::run))
        .route("/execute", post(handlers::execute::execute))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
