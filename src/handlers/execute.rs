use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::dispatch::{self, ActionError, ExecuteRequest};
use crate::error::{AppError, AppResult};
use crate::metrics::elapsed_ms;
use crate::AppState;

const PLUGIN_TYPE: &str = "rust";

// ── POST /execute ─────────────────────────────────────────────────────────────

/// Generic action endpoint: `{action, data}` dispatched per the action
/// vocabulary, with the result merged into a common response envelope.
pub async fn execute(
    State(state): State<AppState>,
    body: Option<Json<ExecuteRequest>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start = Instant::now();
    state.counters.bump_requests();
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let action = req.action.clone();
    info!(action = %action, "Processing action");

    match dispatch::dispatch(&state.store, &state.counters, req).await {
        Ok(reply) => {
            let mut body = serde_json::to_value(reply).map_err(anyhow::Error::from)?;
            let obj = body
                .as_object_mut()
                .ok_or_else(|| anyhow::anyhow!("action reply must be a JSON object"))?;
            obj.insert("success".to_string(), json!(true));
            obj.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
            obj.insert("processing_time_ms".to_string(), json!(elapsed_ms(start)));
            obj.insert(
                "total_requests".to_string(),
                json!(state.counters.requests()),
            );
            obj.insert("plugin_type".to_string(), json!(PLUGIN_TYPE));

            info!(action = %action, elapsed_ms = %elapsed_ms(start), "Action completed");
            Ok((StatusCode::OK, Json(body)))
        }

        // Unexpected faults take the shared 500 path; everything else is a
        // request-shaped failure answered as 400 with the structured body.
        Err(ActionError::Internal(err)) => Err(AppError::Internal(err)),
        Err(err) => {
            let mut body = err.body();
            let obj = body.as_object_mut().unwrap();
            obj.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));
            obj.insert("processing_time_ms".to_string(), json!(elapsed_ms(start)));
            obj.insert("plugin_type".to_string(), json!(PLUGIN_TYPE));
            Ok((StatusCode::BAD_REQUEST, Json(body)))
        }
    }
}
