use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state fixed at creation time. `order.paid` / `order.updated`
/// hooks are acknowledged without re-evaluating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order received through the webhook path, not yet confirmed.
    Processing,
    /// Order placed through the `create_order` action against the catalog.
    Confirmed,
}

/// An order record. Two creation paths produce two shapes: the
/// `create_order` action links a catalog product (all optional fields set),
/// while the `order.created` webhook carries only a total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Processing).unwrap(),
            serde_json::json!("processing")
        );
        assert_eq!(
            serde_json::to_value(OrderStatus::Confirmed).unwrap(),
            serde_json::json!("confirmed")
        );
    }

    #[test]
    fn webhook_shape_omits_product_linkage() {
        let order = Order {
            id: 1,
            product_id: None,
            product_name: None,
            quantity: None,
            unit_price: None,
            total_price: 125.50,
            created_at: Utc::now(),
            status: OrderStatus::Processing,
        };
        let v = serde_json::to_value(&order).unwrap();
        assert!(v.get("product_id").is_none());
        assert!(v.get("quantity").is_none());
        assert_eq!(v["total_price"], 125.50);
        assert_eq!(v["status"], "processing");
    }

    #[test]
    fn catalog_shape_carries_full_linkage() {
        let order = Order {
            id: 2,
            product_id: Some(3),
            product_name: Some("Code Editor".to_string()),
            quantity: Some(2),
            unit_price: Some(99.99),
            total_price: 199.98,
            created_at: Utc::now(),
            status: OrderStatus::Confirmed,
        };
        let v = serde_json::to_value(&order).unwrap();
        assert_eq!(v["product_id"], 3);
        assert_eq!(v["unit_price"], 99.99);
        assert_eq!(v["status"], "confirmed");
    }
}
