//! The persisted order list.

use std::sync::Arc;

use shophub_core::Order;

use crate::storage::{self, Storage, StorageError, StorageKeys};

/// Append-only list of completed orders.
#[derive(Debug, Clone)]
pub struct OrderBook {
    storage: Arc<dyn Storage>,
    keys: StorageKeys,
}

impl OrderBook {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// All orders, oldest first. A corrupt list is discarded.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        storage::load_json(
            self.storage.as_ref(),
            &self.keys.orders,
            Some(StorageKeys::LEGACY_ORDERS),
        )
    }

    /// Append an order and persist the list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or written. Unlike
    /// the cart, this is surfaced so checkout never loses an order silently.
    /// A list that cannot be read is left untouched.
    pub fn append(&self, order: &Order) -> Result<(), StorageError> {
        let mut orders: Vec<Order> = storage::try_load_json(
            self.storage.as_ref(),
            &self.keys.orders,
            Some(StorageKeys::LEGACY_ORDERS),
        )?;
        orders.push(order.clone());
        storage::store_json(self.storage.as_ref(), &self.keys.orders, &orders)?;
        tracing::debug!(order_id = %order.id(), count = orders.len(), "Appended order");
        Ok(())
    }

    /// Look up an order by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Order> {
        self.list().into_iter().find(|order| order.id().as_str() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shophub_core::{
        Address, Cart, CustomerContact, Email, OrderId, PricingPolicy, ProductId, Quantity,
    };

    use super::*;
    use crate::cart_store::tests::test_catalog;
    use crate::storage::MemoryStorage;
    use crate::storage::tests::FlakyReads;

    fn order(id: &str) -> Order {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), Quantity::ONE);
        Order::snapshot(
            OrderId::new(id),
            Utc::now(),
            CustomerContact {
                full_name: "Grace Hopper".to_string(),
                email: Email::parse("grace@example.com").unwrap(),
                phone: "5551234567".to_string(),
                address: Address {
                    street: "1 Harbor Rd".to_string(),
                    city: "Arlington".to_string(),
                    state: "VA".to_string(),
                    zip: "22201".to_string(),
                    country: "US".to_string(),
                },
            },
            &cart,
            &test_catalog(),
            &PricingPolicy::default(),
        )
    }

    fn book(storage: &MemoryStorage) -> OrderBook {
        OrderBook::new(Arc::new(storage.clone()), StorageKeys::default())
    }

    #[test]
    fn test_append_list_find() {
        let storage = MemoryStorage::new();
        let orders = book(&storage);
        assert!(orders.list().is_empty());

        orders.append(&order("ORD-1")).unwrap();
        orders.append(&order("ORD-2")).unwrap();

        let ids: Vec<String> = orders
            .list()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-2"]);
        assert_eq!(orders.find("ORD-2").unwrap().id().as_str(), "ORD-2");
        assert!(orders.find("ORD-3").is_none());
        assert!(storage.get("shophub.orders").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_list_resets() {
        let storage = MemoryStorage::new();
        storage.set("shophub.orders", "[{\"id\": 1}]").unwrap();
        let orders = book(&storage);

        assert!(orders.list().is_empty());
        assert_eq!(storage.get("shophub.orders").unwrap(), None);

        orders.append(&order("ORD-9")).unwrap();
        assert_eq!(orders.list().len(), 1);
    }

    #[test]
    fn test_append_read_failure_keeps_history() {
        let storage = Arc::new(FlakyReads::default());
        let shared: Arc<dyn Storage> = Arc::clone(&storage) as _;
        let orders = OrderBook::new(shared, StorageKeys::default());
        orders.append(&order("ORD-1")).unwrap();
        orders.append(&order("ORD-2")).unwrap();

        storage.arm();
        let result = orders.append(&order("ORD-3"));
        assert!(matches!(result, Err(StorageError::Io { .. })));

        let ids: Vec<String> = orders
            .list()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-2"]);
    }
}
