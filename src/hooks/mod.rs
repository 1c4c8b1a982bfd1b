use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::metrics::CounterSet;
use crate::models::NewProduct;
use crate::store::Store;

pub const PRODUCT_HOOKS: [&str; 2] = ["product.created", "product.updated"];
pub const ORDER_HOOKS: [&str; 3] = ["order.created", "order.updated", "order.paid"];
pub const ANALYTICS_HOOKS: [&str; 2] = ["analytics.calculate", "report.generate"];

fn default_hook() -> String {
    "unknown".to_string()
}

/// Body of the three webhook endpoints: `{hook, payload}`, both optional
/// on the wire.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    #[serde(default = "default_hook")]
    pub hook: String,
    #[serde(default)]
    pub payload: Value,
}

impl Default for WebhookRequest {
    fn default() -> Self {
        Self {
            hook: default_hook(),
            payload: Value::Null,
        }
    }
}

#[derive(Debug)]
pub struct HookReply {
    pub hook: String,
    pub message: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Unsupported hook: {hook}")]
    Unsupported {
        hook: String,
        supported: &'static [&'static str],
    },

    #[error("{0}")]
    InvalidPayload(String),
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, HookError> {
    let payload = if payload.is_null() { json!({}) } else { payload };
    serde_json::from_value(payload).map_err(|err| HookError::InvalidPayload(err.to_string()))
}

// ── Product hooks ─────────────────────────────────────────────────────────────

/// `product.created` appends to the catalog; `product.updated` is accepted
/// but applies nothing — existing products are immutable by contract.
pub async fn handle_product_hook(
    store: &RwLock<Store>,
    req: WebhookRequest,
) -> Result<HookReply, HookError> {
    match req.hook.as_str() {
        "product.created" => {
            let new: NewProduct = parse_payload(req.payload)?;
            if new.price < 0.0 {
                return Err(HookError::InvalidPayload("price must be >= 0".to_string()));
            }
            let product = store.write().await.insert_product(new);
            Ok(HookReply {
                message: Some(format!(
                    "Processed product.created for product {}",
                    product.name
                )),
                hook: req.hook,
                data: None,
            })
        }
        "product.updated" => {
            let name = req
                .payload
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown Product")
                .to_string();
            Ok(HookReply {
                message: Some(format!("Processed product.updated for product {name}")),
                hook: req.hook,
                data: None,
            })
        }
        _ => Err(HookError::Unsupported {
            hook: req.hook,
            supported: &PRODUCT_HOOKS,
        }),
    }
}

// ── Order hooks ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OrderEventPayload {
    /// Upstream order reference, echoed in the acknowledgment. Any JSON
    /// scalar is accepted.
    #[serde(default)]
    id: Value,
    #[serde(default)]
    total: f64,
}

fn order_ref(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Only `order.created` mutates the store; `order.updated` and
/// `order.paid` are acknowledged no-ops and never touch `Order.status`.
pub async fn handle_order_hook(
    store: &RwLock<Store>,
    req: WebhookRequest,
) -> Result<HookReply, HookError> {
    if !ORDER_HOOKS.contains(&req.hook.as_str()) {
        return Err(HookError::Unsupported {
            hook: req.hook,
            supported: &ORDER_HOOKS,
        });
    }

    let event: OrderEventPayload = parse_payload(req.payload)?;

    if req.hook == "order.created" {
        if event.total < 0.0 {
            return Err(HookError::InvalidPayload("total must be >= 0".to_string()));
        }
        store.write().await.record_external_order(event.total);
    }

    Ok(HookReply {
        message: Some(format!(
            "Processed {} for order {}",
            req.hook,
            order_ref(&event.id)
        )),
        hook: req.hook,
        data: None,
    })
}

// ── Analytics hooks ───────────────────────────────────────────────────────────

/// Both analytics hooks recompute and return the aggregate snapshot;
/// neither mutates the store.
pub async fn handle_analytics_hook(
    store: &RwLock<Store>,
    counters: &CounterSet,
    req: WebhookRequest,
) -> Result<HookReply, HookError> {
    if !ANALYTICS_HOOKS.contains(&req.hook.as_str()) {
        return Err(HookError::Unsupported {
            hook: req.hook,
            supported: &ANALYTICS_HOOKS,
        });
    }

    let store = store.read().await;
    let analytics = store.analytics();
    Ok(HookReply {
        data: Some(json!({
            "total_products": store.product_count(),
            "total_orders": store.order_count(),
            "total_revenue": analytics.total_revenue,
            "average_order_value": analytics.average_order_value(),
            "calculations_performed": counters.calculations(),
            "calculated_at": Utc::now().to_rfc3339(),
        })),
        hook: req.hook,
        message: None,
    })
}
