use std::time::Duration;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::metrics::CounterSet;
use crate::store::Store;

/// The full action vocabulary of the `/execute` endpoint. Anything else is
/// answered with this list.
pub const AVAILABLE_ACTIONS: [&str; 6] = [
    "list_products",
    "create_order",
    "get_analytics",
    "calculate_fibonacci",
    "simulate_delay",
    "random_data",
];

/// Upper bound on the fibonacci input; naive recursion above this takes
/// unreasonably long.
const FIB_INPUT_MAX: i64 = 35;

/// Upper bound on the simulated delay.
const DELAY_MS_MAX: u64 = 2_000;

// ── Request / reply types ─────────────────────────────────────────────────────

/// Body of `POST /execute`. A missing body or missing fields fall back to
/// defaults, mirroring the tolerant webhook contract.
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

/// Successful dispatch result. The HTTP layer merges this with the common
/// response envelope (timestamp, processing time, request counter).
#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub action: &'static str,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionReply {
    fn new(action: &'static str, data: Value) -> Self {
        Self {
            action,
            data,
            count: None,
            message: None,
        }
    }
}

/// Dispatch failure. Everything except `Internal` is a request-shaped
/// error the HTTP layer reports as 400.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("{message}")]
    InvalidPayload {
        action: &'static str,
        message: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActionError {
    /// Client-facing failure body. `Internal` never reaches this — the
    /// handler converts it to the shared 500 response instead.
    pub fn body(&self) -> Value {
        match self {
            ActionError::UnknownAction(requested) => json!({
                "action": requested,
                "error": format!("Unknown action: {requested}"),
                "available_actions": AVAILABLE_ACTIONS,
                "success": false,
            }),
            ActionError::ProductNotFound => json!({
                "action": "create_order",
                "error": "Product not found",
                "success": false,
            }),
            ActionError::InvalidPayload { action, message } => json!({
                "action": action,
                "error": message,
                "success": false,
            }),
            ActionError::Internal(err) => json!({
                "error": err.to_string(),
                "success": false,
            }),
        }
    }
}

// ── Per-action payloads ───────────────────────────────────────────────────────

fn default_product_id() -> u64 {
    1
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct CreateOrderParams {
    #[serde(default = "default_product_id")]
    product_id: u64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_fib_n() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
struct FibonacciParams {
    #[serde(default = "default_fib_n")]
    n: i64,
}

fn default_delay_ms() -> u64 {
    100
}

#[derive(Debug, Deserialize)]
struct DelayParams {
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
}

/// Deserialize the action payload, treating an absent/null `data` field as
/// an empty object so per-field defaults apply. A payload of the wrong
/// shape becomes an `InvalidPayload` failure, never a propagated fault.
fn parse_params<T: DeserializeOwned>(action: &'static str, data: Value) -> Result<T, ActionError> {
    let data = if data.is_null() { json!({}) } else { data };
    serde_json::from_value(data).map_err(|err| ActionError::InvalidPayload {
        action,
        message: err.to_string(),
    })
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Map an `(action, payload)` pair onto the store. Read-only actions take
/// the read lock; `create_order` performs its lookup, append, and
/// analytics update inside one write-lock scope.
pub async fn dispatch(
    store: &RwLock<Store>,
    counters: &CounterSet,
    req: ExecuteRequest,
) -> Result<ActionReply, ActionError> {
    match req.action.as_str() {
        "list_products" => {
            counters.bump_queries();
            let store = store.read().await;
            let products: Vec<_> = store.products().collect();
            let count = products.len();
            let mut reply = ActionReply::new("list_products", json!(products));
            reply.count = Some(count);
            Ok(reply)
        }

        "create_order" => {
            let params: CreateOrderParams = parse_params("create_order", req.data)?;
            let mut store = store.write().await;
            let order = store
                .place_product_order(params.product_id, params.quantity)
                .ok_or(ActionError::ProductNotFound)?;
            let mut reply = ActionReply::new("create_order", json!(order));
            reply.message = Some("Order created successfully".to_string());
            Ok(reply)
        }

        "get_analytics" => {
            let store = store.read().await;
            let analytics = store.analytics();
            Ok(ActionReply::new(
                "get_analytics",
                json!({
                    "total_products": store.product_count(),
                    "total_orders": store.order_count(),
                    "total_revenue": analytics.total_revenue,
                    "average_order_value": analytics.average_order_value(),
                    "recent_orders": store.recent_orders(5),
                }),
            ))
        }

        "calculate_fibonacci" => {
            let params: FibonacciParams = parse_params("calculate_fibonacci", req.data)?;
            let calculations = counters.bump_calculations();
            let n = params.n.min(FIB_INPUT_MAX);

            // Exponential-time on purpose (CPU benchmark workload). Runs on
            // the blocking pool so async workers keep serving.
            let result = tokio::task::spawn_blocking(move || fibonacci(n))
                .await
                .map_err(anyhow::Error::from)?;

            Ok(ActionReply::new(
                "calculate_fibonacci",
                json!({
                    "input": n,
                    "result": result,
                    "calculations_performed": calculations,
                }),
            ))
        }

        "simulate_delay" => {
            let params: DelayParams = parse_params("simulate_delay", req.data)?;
            let delay_ms = params.delay_ms.min(DELAY_MS_MAX);

            // Suspends only this request; concurrent requests are unaffected.
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;

            Ok(ActionReply::new(
                "simulate_delay",
                json!({
                    "requested_delay_ms": delay_ms,
                    "message": format!("Simulated {delay_ms}ms delay"),
                }),
            ))
        }

        "random_data" => {
            let numbers: Vec<u32> = {
                let mut rng = rand::thread_rng();
                (0..10).map(|_| rng.gen_range(1..=100)).collect()
            };
            let sum: u32 = numbers.iter().sum();
            let max = numbers.iter().max().copied().unwrap_or(0);
            let min = numbers.iter().min().copied().unwrap_or(0);

            Ok(ActionReply::new(
                "random_data",
                json!({
                    "random_numbers": numbers,
                    "sum": sum,
                    "average": f64::from(sum) / numbers.len() as f64,
                    "max": max,
                    "min": min,
                }),
            ))
        }

        other => Err(ActionError::UnknownAction(other.to_string())),
    }
}

fn fibonacci(n: i64) -> i64 {
    if n <= 1 {
        n
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}
