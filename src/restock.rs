//! Back-office restock client.
//!
//! Queries and tops up stock records. Unlike the till there is no state
//! machine and no undo; every call reports a status line and nothing more.

use crate::error::StockError;
use crate::product::Product;
use crate::stock::StockReadWriter;
use log::{error, info, warn};

/// Stock maintenance for the back office.
pub struct RestockClient<S> {
    stock: S,
}

impl<S: StockReadWriter> RestockClient<S> {
    /// Creates a client over a stock service handle.
    pub fn new(stock: S) -> Self {
        RestockClient { stock }
    }

    /// Reports the stock record for `product_num`.
    pub fn query(&self, product_num: &str) -> String {
        let pn = product_num.trim();
        match self.details(pn) {
            Ok(Some(product)) => product.to_string(),
            Ok(None) => format!("Unknown product number {}", pn),
            Err(e) => {
                error!("query {}: {}", pn, e);
                e.to_string()
            }
        }
    }

    /// Adds units to a product's stock.
    ///
    /// `quantity` is the clerk's raw input and must be a positive whole number.
    pub fn restock(&self, product_num: &str, quantity: &str) -> String {
        let pn = product_num.trim();
        let amount = match quantity.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return format!("Invalid quantity {}", quantity.trim()),
        };

        let result = self
            .details(pn)
            .and_then(|found| match found {
                Some(_) => self.stock.add_stock(pn, amount),
                None => Err(StockError::UnknownProduct(pn.to_string())),
            })
            .and_then(|()| self.stock.get_details(pn));

        match result {
            Ok(product) => {
                info!("Restocked {} by {} to {}", pn, amount, product.stock_level);
                format!(
                    "Restocked {}: {} now in stock",
                    product.description, product.stock_level
                )
            }
            Err(StockError::UnknownProduct(pn)) => format!("Unknown product number {}", pn),
            Err(e @ StockError::StockLimit { .. }) => {
                warn!("restock {} by {}: {}", pn, amount, e);
                e.to_string()
            }
            Err(e) => {
                error!("restock {}: {}", pn, e);
                e.to_string()
            }
        }
    }

    /// Inserts or replaces a whole stock record.
    pub fn modify(&self, product: &Product) -> String {
        match self.stock.modify_stock(product) {
            Ok(()) => {
                info!("Modified stock record {}", product.product_num);
                format!("Updated {}", product)
            }
            Err(e @ StockError::InvalidPrice { .. }) => {
                warn!("modify {}: {}", product.product_num, e);
                e.to_string()
            }
            Err(e) => {
                error!("modify {}: {}", product.product_num, e);
                e.to_string()
            }
        }
    }

    /// Blank status line for the cleared display.
    pub fn clear(&self) -> String {
        String::new()
    }

    fn details(&self, pn: &str) -> Result<Option<Product>, StockError> {
        if !self.stock.exists(pn)? {
            return Ok(None);
        }
        self.stock.get_details(pn).map(Some)
    }
}
