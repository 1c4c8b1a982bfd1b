pub mod benchmark;
pub mod execute;
pub mod webhooks;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::json;

use crate::hooks;
use crate::AppState;

/// Identifier this plugin registers with the CMS host.
pub const PLUGIN_SLUG: &str = "rust-performance";

// ── GET /health ───────────────────────────────────────────────────────────────

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let requests_served = state.counters.bump_requests();

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "plugin_slug": PLUGIN_SLUG,
            "version": env!("CARGO_PKG_VERSION"),
            "requests_served": requests_served,
            "uptime_seconds": state.started_at.elapsed().as_secs(),
            "counters": state.counters.snapshot(),
        })),
    )
}

// ── GET/POST /ping ────────────────────────────────────────────────────────────

pub async fn ping() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "message": "pong",
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

// ── GET /actions ──────────────────────────────────────────────────────────────

/// Static capability document the CMS host reads to discover which hooks
/// this plugin handles and where to deliver them.
pub async fn list_actions() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "plugin_slug": PLUGIN_SLUG,
            "actions": {
                "product_created": {
                    "name": "Product Created Handler",
                    "description": "Handles product creation events",
                    "hooks": hooks::PRODUCT_HOOKS,
                    "method": "POST",
                    "endpoint": "/actions/product",
                    "priority": 10,
                },
                "order_processing": {
                    "name": "Order Processing Handler",
                    "description": "Handles order processing events",
                    "hooks": hooks::ORDER_HOOKS,
                    "method": "POST",
                    "endpoint": "/actions/order",
                    "priority": 5,
                },
                "analytics_calculation": {
                    "name": "Analytics Calculator",
                    "description": "Calculates analytics and metrics",
                    "hooks": hooks::ANALYTICS_HOOKS,
                    "method": "POST",
                    "endpoint": "/actions/analytics",
                    "priority": 1,
                },
            },
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
