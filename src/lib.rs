//! # Checkout Engine
//!
//! The transaction engine behind a point-of-sale till: a clerk checks a
//! product, buys it into the customer's basket, and finalizes the basket
//! into an order, with promotions, tips and undo along the way.
//!
//! ## Design Principles
//!
//! - **Narrow capabilities**: the engine talks to stock and order services
//!   only through the [`StockReadWriter`] and [`OrderProcessor`] traits
//! - **Status, not errors**: every till command answers with an [`Update`];
//!   validation and service failures become status text
//! - **Fixed-point money**: two decimal places via `rust_decimal`
//! - **Value snapshots**: undo restores copies, never shared references
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use checkout_engine::{CashierEngine, InMemoryOrders, InMemoryStock, Money, Product, PromotionConfig};
//!
//! let stock = Arc::new(InMemoryStock::with_products([
//!     Product::new("0001", "Toaster", Money::from_cents(300), 5),
//! ]));
//! let orders = Arc::new(InMemoryOrders::new());
//! let mut engine = CashierEngine::new(stock, orders, PromotionConfig::default());
//!
//! assert!(engine.check("0001").message.contains("3.00"));
//! assert_eq!(engine.buy().message, "Purchased Toaster");
//! assert_eq!(engine.finalize().message, "Next customer");
//! ```

pub mod basket;
pub mod engine;
pub mod error;
pub mod factory;
pub mod money;
pub mod order;
pub mod product;
pub mod promotion;
pub mod restock;
pub mod script;
pub mod session;
pub mod stock;

pub use basket::Basket;
pub use engine::{CashierEngine, State, Update};
pub use error::{EngineError, OrderError, Result, StockError};
pub use factory::{LocalServiceFactory, ServiceFactory};
pub use money::Money;
pub use order::{InMemoryOrders, OrderProcessor};
pub use product::{LineItem, Product};
pub use promotion::PromotionConfig;
pub use restock::RestockClient;
pub use script::{Command, CommandRecord};
pub use session::Session;
pub use stock::{InMemoryStock, StockReadWriter, StockReader};
