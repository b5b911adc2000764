//! Error types for the checkout engine and the services it talks to.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for session and setup operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures reported by a stock service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The backing store could not be reached
    #[error("Stock service unavailable: {0}")]
    Unavailable(String),

    /// The product number has no stock record
    #[error("Unknown product number {0}")]
    UnknownProduct(String),

    /// A stock record carries a negative or out-of-range price
    #[error("Invalid price {price} for product {product_num}")]
    InvalidPrice { product_num: String, price: Money },

    /// Adding units would overflow the stock level
    #[error("Stock level for {product_num} cannot exceed {max}")]
    StockLimit { product_num: String, max: u32 },
}

/// Failures reported by an order service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The backing store could not be reached
    #[error("Order service unavailable: {0}")]
    Unavailable(String),

    /// The order could not be recorded
    #[error("Order {order_num} rejected: {reason}")]
    Rejected { order_num: u32, reason: String },
}

/// Errors that can occur while setting up or driving a session.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid stock or command record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing stock file argument
    #[error("Missing stock file argument. Usage: cashier <stock.csv> [script.csv]")]
    MissingArgument,

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Order(#[from] OrderError),
}
