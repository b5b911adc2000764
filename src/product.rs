//! Stock records and basket line items.
//!
//! A stock record's quantity is stock on hand; a line item's quantity is how
//! many units the customer is buying. They are kept as separate types so the
//! two meanings never mix.

use crate::error::StockError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A product as held by the stock service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable product key, e.g. `"0001"`.
    #[serde(rename = "product")]
    pub product_num: String,

    pub description: String,

    /// Unit price, within `0..=Money::max_amount()`. See [`Product::validate`].
    pub price: Money,

    /// Units on hand.
    #[serde(rename = "stock")]
    pub stock_level: u32,
}

impl Product {
    /// Creates a stock record.
    pub fn new(
        product_num: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock_level: u32,
    ) -> Self {
        Product {
            product_num: product_num.into(),
            description: description.into(),
            price,
            stock_level,
        }
    }

    /// Rejects a record whose price is negative or above `Money::max_amount()`.
    pub fn validate(&self) -> Result<(), StockError> {
        if !self.price.is_valid_amount() {
            return Err(StockError::InvalidPrice {
                product_num: self.product_num.clone(),
                price: self.price,
            });
        }
        Ok(())
    }

    /// Returns `true` if at least `quantity` units are on hand.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock_level >= quantity
    }
}

impl fmt::Display for Product {
    /// Clerk display line: `description : price (stock)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {:>7} ({:>2})",
            self.description, self.price, self.stock_level
        )
    }
}

/// One line of a basket.
///
/// Price and description are frozen when the line is created, so later
/// changes to the stock record do not alter a basket in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_num: String,
    pub description: String,
    pub price: Money,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item from a stock record for `quantity` units.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        LineItem {
            product_num: product.product_num.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity,
        }
    }

    /// Unit price x quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toaster() -> Product {
        Product::new("0001", "Toaster", Money::from_cents(300), 5)
    }

    #[test]
    fn test_display_matches_clerk_format() {
        assert_eq!(toaster().to_string(), "Toaster :    3.00 ( 5)");
    }

    #[test]
    fn test_validate_rejects_bad_prices() {
        assert!(toaster().validate().is_ok());

        let refund = Product::new("0009", "Refund", Money::from_cents(-500), 3);
        assert_eq!(
            refund.validate(),
            Err(StockError::InvalidPrice {
                product_num: "0009".to_string(),
                price: Money::from_cents(-500),
            })
        );

        let gold = Product::new("0010", "Gold", Money::from_cents(Money::MAX_CENTS + 1), 1);
        assert!(gold.validate().is_err());
    }

    #[test]
    fn test_has_stock_for() {
        let p = toaster();
        assert!(p.has_stock_for(1));
        assert!(p.has_stock_for(5));
        assert!(!p.has_stock_for(6));
    }

    #[test]
    fn test_line_item_freezes_product_fields() {
        let mut p = toaster();
        let item = LineItem::from_product(&p, 2);
        p.price = Money::from_cents(999);

        assert_eq!(item.product_num, "0001");
        assert_eq!(item.price, Money::from_cents(300));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total().to_string(), "6.00");
    }
}
