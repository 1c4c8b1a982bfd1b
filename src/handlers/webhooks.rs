use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::hooks::{self, HookError, HookReply, WebhookRequest};
use crate::metrics::elapsed_ms;
use crate::AppState;

/// A missing or malformed body is treated as an empty webhook envelope, so
/// the hook-dispatch layer answers with its supported-hooks list instead
/// of a transport-level rejection.
fn unpack(body: Option<Json<WebhookRequest>>) -> WebhookRequest {
    body.map(|Json(req)| req).unwrap_or_default()
}

fn success_body(reply: HookReply, start: Instant) -> Value {
    let mut body = json!({
        "success": true,
        "hook": reply.hook,
        "processing_time_ms": elapsed_ms(start),
        "timestamp": Utc::now().to_rfc3339(),
    });
    let obj = body.as_object_mut().unwrap();
    if let Some(message) = reply.message {
        obj.insert("message".to_string(), json!(message));
    }
    if let Some(data) = reply.data {
        obj.insert("data".to_string(), data);
    }
    body
}

/// Failure variants → status codes: unsupported hooks answer 400 inline
/// (with the supported list); payload validation failures go through
/// `AppError::BadRequest`.
fn failure(err: HookError) -> AppResult<(StatusCode, Json<Value>)> {
    match err {
        HookError::Unsupported { hook, supported } => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": format!("Unsupported hook: {hook}"),
                "supported_hooks": supported,
            })),
        )),
        HookError::InvalidPayload(message) => Err(AppError::BadRequest(message)),
    }
}

// ── POST /actions/product ─────────────────────────────────────────────────────

pub async fn product_action(
    State(state): State<AppState>,
    body: Option<Json<WebhookRequest>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start = Instant::now();
    state.counters.bump_requests();
    let req = unpack(body);
    info!(hook = %req.hook, "Processing product action");

    match hooks::handle_product_hook(&state.store, req).await {
        Ok(reply) => Ok((StatusCode::OK, Json(success_body(reply, start)))),
        Err(err) => failure(err),
    }
}

// ── POST /actions/order ───────────────────────────────────────────────────────

pub async fn order_action(
    State(state): State<AppState>,
    body: Option<Json<WebhookRequest>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start = Instant::now();
    state.counters.bump_requests();
    let req = unpack(body);
    info!(hook = %req.hook, "Processing order action");

    match hooks::handle_order_hook(&state.store, req).await {
        Ok(reply) => Ok((StatusCode::OK, Json(success_body(reply, start)))),
        Err(err) => failure(err),
    }
}

// ── POST /actions/analytics ───────────────────────────────────────────────────

pub async fn analytics_action(
    State(state): State<AppState>,
    body: Option<Json<WebhookRequest>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start = Instant::now();
    state.counters.bump_calculations();
    let req = unpack(body);
    info!(hook = %req.hook, "Processing analytics action");

    match hooks::handle_analytics_hook(&state.store, &state.counters, req).await {
        Ok(reply) => Ok((StatusCode::OK, Json(success_body(reply, start)))),
        Err(err) => failure(err),
    }
}
