//! Obtains service handles once per session.

use crate::error::{OrderError, StockError};
use crate::order::OrderProcessor;
use crate::stock::StockReadWriter;
use std::sync::Arc;

/// Produces the stock and order capabilities a session runs against.
pub trait ServiceFactory {
    type Stock: StockReadWriter;
    type Orders: OrderProcessor;

    fn make_stock_read_writer(&self) -> Result<Self::Stock, StockError>;

    fn make_order_processor(&self) -> Result<Self::Orders, OrderError>;
}

/// Hands out shared handles to services living in this process.
#[derive(Debug)]
pub struct LocalServiceFactory<S, O> {
    stock: Arc<S>,
    orders: Arc<O>,
}

impl<S, O> LocalServiceFactory<S, O> {
    /// Wraps already-shared services.
    pub fn new(stock: Arc<S>, orders: Arc<O>) -> Self {
        LocalServiceFactory { stock, orders }
    }

    /// The shared stock service.
    pub fn stock(&self) -> &Arc<S> {
        &self.stock
    }

    /// The shared order service.
    pub fn orders(&self) -> &Arc<O> {
        &self.orders
    }
}

impl<S, O> ServiceFactory for LocalServiceFactory<S, O>
where
    S: StockReadWriter,
    O: OrderProcessor,
{
    type Stock = Arc<S>;
    type Orders = Arc<O>;

    fn make_stock_read_writer(&self) -> Result<Self::Stock, StockError> {
        Ok(Arc::clone(&self.stock))
    }

    fn make_order_processor(&self) -> Result<Self::Orders, OrderError> {
        Ok(Arc::clone(&self.orders))
    }
}
