//! Order capability consumed by the engine, plus an in-memory service.

use crate::basket::Basket;
use crate::error::OrderError;
use log::info;
use std::sync::{Arc, Mutex};

/// Allocates order numbers and records finished baskets.
pub trait OrderProcessor {
    /// Allocates a fresh order number.
    fn unique_number(&self) -> Result<u32, OrderError>;

    /// Records a finished basket as a new order.
    fn new_order(&self, basket: Basket) -> Result<(), OrderError>;
}

impl<T: OrderProcessor + ?Sized> OrderProcessor for Arc<T> {
    fn unique_number(&self) -> Result<u32, OrderError> {
        (**self).unique_number()
    }

    fn new_order(&self, basket: Basket) -> Result<(), OrderError> {
        (**self).new_order(basket)
    }
}

#[derive(Debug, Default)]
struct OrderBook {
    last_number: u32,
    orders: Vec<Basket>,
}

/// Order service that keeps committed baskets in memory.
///
/// Order numbers start at 1 and increase by one per allocation.
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    book: Mutex<OrderBook>,
}

impl InMemoryOrders {
    /// Creates an order service with no orders and no numbers allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns committed orders in commit order.
    pub fn orders(&self) -> Result<Vec<Basket>, OrderError> {
        let book = self
            .book
            .lock()
            .map_err(|_| OrderError::Unavailable("order book lock poisoned".to_string()))?;
        Ok(book.orders.clone())
    }
}

impl OrderProcessor for InMemoryOrders {
    fn unique_number(&self) -> Result<u32, OrderError> {
        let mut book = self
            .book
            .lock()
            .map_err(|_| OrderError::Unavailable("order book lock poisoned".to_string()))?;
        book.last_number = book
            .last_number
            .checked_add(1)
            .ok_or_else(|| OrderError::Unavailable("order numbers exhausted".to_string()))?;
        Ok(book.last_number)
    }

    fn new_order(&self, basket: Basket) -> Result<(), OrderError> {
        let mut book = self
            .book
            .lock()
            .map_err(|_| OrderError::Unavailable("order book lock poisoned".to_string()))?;

        if book.orders.iter().any(|o| o.order_num() == basket.order_num()) {
            return Err(OrderError::Rejected {
                order_num: basket.order_num(),
                reason: "already recorded".to_string(),
            });
        }

        info!(
            "Recorded order {} ({} line(s), total {})",
            basket.order_num(),
            basket.len(),
            basket.grand_total()
        );
        book.orders.push(basket);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_numbers_increase() {
        let orders = InMemoryOrders::new();
        assert_eq!(orders.unique_number().unwrap(), 1);
        assert_eq!(orders.unique_number().unwrap(), 2);
    }

    #[test]
    fn test_new_order_is_recorded() {
        let orders = InMemoryOrders::new();
        let num = orders.unique_number().unwrap();
        orders.new_order(Basket::new(num)).unwrap();

        let recorded = orders.orders().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].order_num(), num);
    }

    #[test]
    fn test_same_order_number_rejected_twice() {
        let orders = InMemoryOrders::new();
        orders.new_order(Basket::new(1)).unwrap();
        let err = orders.new_order(Basket::new(1)).unwrap_err();
        assert!(matches!(err, OrderError::Rejected { order_num: 1, .. }));
    }
}
