use serde::{Deserialize, Serialize};

/// Core product entity. Ids are small integers assigned by the store in
/// insertion order (1-based); products are never mutated or deleted once
/// created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Price in decimal dollars (e.g. 29.99), as carried on the wire.
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

// ── Request payloads ─────────────────────────────────────────────────────────

fn default_name() -> String {
    "Unknown Product".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

/// Payload of a `product.created` webhook. Every field is optional on the
/// wire; absent fields fall back to the documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
}

impl NewProduct {
    pub fn new(name: &str, price: f64, category: &str, stock: u32) -> Self {
        Self {
            name: name.to_string(),
            price,
            category: category.to_string(),
            stock,
        }
    }
}
