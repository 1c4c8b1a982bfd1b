use crate::models::NewProduct;

/// Demo catalog installed at startup, so the service answers
/// `list_products` and `create_order` usefully before any webhook arrives.
/// Ids 1..=3 are assigned by the store in this order.
pub fn starting_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Rust Book", 29.99, "books", 50),
        NewProduct::new("Axum Guide", 39.99, "books", 25),
        NewProduct::new("Code Editor", 99.99, "software", 100),
    ]
}
