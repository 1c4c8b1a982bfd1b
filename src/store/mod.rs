use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

use crate::metrics::round2;
use crate::models::{NewProduct, Order, OrderStatus, Product};

/// Running revenue aggregate, updated in the same call that appends an
/// order. Invariant: `total_revenue == Σ order.total_price` and
/// `orders_count == orders.len()` at all times.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Analytics {
    pub total_revenue: f64,
    pub orders_count: u64,
}

impl Analytics {
    /// Average order value rounded to cents. The denominator is floored
    /// at 1 so an empty order book yields 0 rather than a
    /// division-by-zero fault.
    pub fn average_order_value(&self) -> f64 {
        round2(self.total_revenue / self.orders_count.max(1) as f64)
    }
}

/// In-memory catalog and order book for the plugin's process lifetime.
///
/// The catalog is an `IndexMap` keyed by id: O(1) lookup for
/// `create_order`, insertion-order iteration for `list_products`. Ids come
/// from explicit monotonic counters, never from collection length. All
/// entities are append-only; nothing is ever mutated or deleted.
#[derive(Debug, Default)]
pub struct Store {
    products: IndexMap<u64, Product>,
    orders: Vec<Order>,
    analytics: Analytics,
    next_product_id: u64,
    next_order_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            next_product_id: 1,
            next_order_id: 1,
            ..Self::default()
        }
    }

    /// A store pre-populated with a starting catalog (ids 1..=n).
    pub fn with_catalog(catalog: impl IntoIterator<Item = NewProduct>) -> Self {
        let mut store = Self::new();
        for item in catalog {
            store.insert_product(item);
        }
        store
    }

    // ── Products ──────────────────────────────────────────────────────────────

    pub fn insert_product(&mut self, new: NewProduct) -> Product {
        let id = self.next_product_id;
        self.next_product_id += 1;

        let product = Product {
            id,
            name: new.name,
            price: new.price,
            category: new.category,
            stock: new.stock,
        };
        self.products.insert(id, product.clone());
        product
    }

    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.get(&id)
    }

    /// All products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    // ── Orders ────────────────────────────────────────────────────────────────

    /// Place an order against a catalog product (`create_order` action).
    /// Returns `None` without touching any state when the product id is
    /// unknown. On success the order append and the analytics update happen
    /// together, inside the caller's single lock scope.
    pub fn place_product_order(&mut self, product_id: u64, quantity: u32) -> Option<Order> {
        let product = self.products.get(&product_id)?;
        let total_price = product.price * f64::from(quantity);

        let order = Order {
            id: self.next_order_id,
            product_id: Some(product_id),
            product_name: Some(product.name.clone()),
            quantity: Some(quantity),
            unit_price: Some(product.price),
            total_price,
            created_at: Utc::now(),
            status: OrderStatus::Confirmed,
        };
        Some(self.push_order(order))
    }

    /// Record an order announced by the `order.created` webhook: a bare
    /// total with no product linkage.
    pub fn record_external_order(&mut self, total: f64) -> Order {
        let order = Order {
            id: self.next_order_id,
            product_id: None,
            product_name: None,
            quantity: None,
            unit_price: None,
            total_price: total,
            created_at: Utc::now(),
            status: OrderStatus::Processing,
        };
        self.push_order(order)
    }

    fn push_order(&mut self, order: Order) -> Order {
        self.next_order_id += 1;
        self.analytics.total_revenue += order.total_price;
        self.analytics.orders_count += 1;
        self.orders.push(order.clone());
        order
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// The most recent `limit` orders, oldest first.
    pub fn recent_orders(&self, limit: usize) -> &[Order] {
        let start = self.orders.len().saturating_sub(limit);
        &self.orders[start..]
    }

    // ── Analytics ─────────────────────────────────────────────────────────────

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn seeded() -> Store {
        Store::with_catalog(seed::starting_catalog())
    }

    // ── Product insertion ──────────────────────────────────────────────────────

    #[test]
    fn seeded_catalog_has_sequential_one_based_ids() {
        let store = seeded();
        let ids: Vec<u64> = store.products().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn insert_product_continues_id_sequence() {
        let mut store = seeded();
        let p = store.insert_product(NewProduct::new("Keyboard", 49.99, "hardware", 10));
        assert_eq!(p.id, 4);
        assert_eq!(store.product_count(), 4);
    }

    #[test]
    fn products_iterate_in_insertion_order() {
        let mut store = Store::new();
        for name in ["Zebra", "Alpha", "Mango"] {
            store.insert_product(NewProduct::new(name, 1.0, "test", 1));
        }
        let names: Vec<&str> = store.products().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Alpha", "Mango"]);
    }

    #[test]
    fn product_lookup_by_id() {
        let store = seeded();
        assert_eq!(store.product(2).unwrap().id, 2);
        assert!(store.product(99).is_none());
    }

    // ── Orders + analytics invariant ───────────────────────────────────────────

    #[test]
    fn place_product_order_computes_total_from_catalog() {
        let mut store = seeded();
        let unit_price = store.product(1).unwrap().price;
        let order = store.place_product_order(1, 3).unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.product_id, Some(1));
        assert_eq!(order.quantity, Some(3));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!((order.total_price - unit_price * 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_product_order_mutates_nothing() {
        let mut store = seeded();
        assert!(store.place_product_order(42, 1).is_none());
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.analytics().orders_count, 0);
        assert_eq!(store.analytics().total_revenue, 0.0);
    }

    #[test]
    fn analytics_aggregate_tracks_every_order_path() {
        let mut store = seeded();
        let a = store.place_product_order(1, 2).unwrap();
        let b = store.record_external_order(150.0);
        let c = store.place_product_order(3, 1).unwrap();

        let expected = a.total_price + b.total_price + c.total_price;
        assert_eq!(store.analytics().orders_count, 3);
        assert_eq!(store.order_count(), 3);
        assert!((store.analytics().total_revenue - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn order_ids_are_monotonic_across_both_paths() {
        let mut store = seeded();
        let a = store.record_external_order(10.0);
        let b = store.place_product_order(1, 1).unwrap();
        let c = store.record_external_order(5.0);
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn external_order_has_no_product_linkage() {
        let mut store = Store::new();
        let order = store.record_external_order(99.5);
        assert_eq!(order.product_id, None);
        assert_eq!(order.unit_price, None);
        assert_eq!(order.status, OrderStatus::Processing);
        assert!((order.total_price - 99.5).abs() < f64::EPSILON);
    }

    // ── Average order value ───────────────────────────────────────────────────

    #[test]
    fn empty_order_book_average_is_zero_not_a_fault() {
        let store = seeded();
        assert_eq!(store.analytics().average_order_value(), 0.0);
    }

    #[test]
    fn average_order_value_is_rounded_to_cents() {
        let mut store = Store::new();
        store.record_external_order(10.0);
        store.record_external_order(10.0);
        store.record_external_order(5.0);
        // 25 / 3 = 8.333... → 8.33
        assert_eq!(store.analytics().average_order_value(), 8.33);
    }

    #[test]
    fn recent_orders_caps_at_limit_and_keeps_call_order() {
        let mut store = Store::new();
        for i in 1..=7 {
            store.record_external_order(f64::from(i));
        }
        let recent = store.recent_orders(5);
        assert_eq!(recent.len(), 5);
        let ids: Vec<u64> = recent.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn recent_orders_returns_fewer_when_store_holds_fewer() {
        let mut store = Store::new();
        store.record_external_order(1.0);
        assert_eq!(store.recent_orders(5).len(), 1);
    }
}
