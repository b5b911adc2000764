//! The customer's basket: line items pending finalization into an order.

use crate::money::Money;
use crate::product::LineItem;
use rust_decimal::Decimal;
use std::fmt;

/// An in-progress order.
///
/// # Invariants
///
/// - `order_num` is fixed at creation
/// - Line items keep insertion order; the same product may appear on
///   several lines
/// - `tip` is replaced, never accumulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basket {
    order_num: u32,
    items: Vec<LineItem>,
    sale_applied: bool,
    tip: Money,
}

impl Basket {
    /// Creates an empty basket for an allocated order number.
    pub fn new(order_num: u32) -> Self {
        Basket {
            order_num,
            items: Vec::new(),
            sale_applied: false,
            tip: Money::ZERO,
        }
    }

    /// Order number allocated when the basket was opened.
    pub fn order_num(&self) -> u32 {
        self.order_num
    }

    /// Lines in the order they were bought.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a line item.
    pub fn add(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Sum of price x quantity over all lines. Excludes the tip.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Line total plus tip.
    pub fn grand_total(&self) -> Money {
        self.total() + self.tip
    }

    /// Current tip; zero when none was given.
    pub fn tip(&self) -> Money {
        self.tip
    }

    /// Replaces the tip.
    pub fn set_tip(&mut self, tip: Money) {
        self.tip = tip;
    }

    /// Returns `true` once a promotion has discounted this basket.
    pub fn sale_applied(&self) -> bool {
        self.sale_applied
    }

    /// Reduces every line price by `rate` and marks the basket as discounted.
    ///
    /// Returns the amount saved on the line total. Calling this again
    /// compounds the discount; callers decide whether that is allowed.
    pub fn apply_discount(&mut self, rate: Decimal) -> Money {
        let before = self.total();
        let factor = Decimal::ONE - rate;
        for item in &mut self.items {
            item.price = item.price.scale_by(factor);
        }
        self.sale_applied = true;
        before - self.total()
    }
}

impl fmt::Display for Basket {
    /// Receipt-style rendering for the clerk's order panel.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order number: {:03}", self.order_num)?;
        for item in &self.items {
            writeln!(
                f,
                "{:<6} {:<20} ({:>2}) {:>7}",
                item.product_num,
                item.description,
                item.quantity,
                item.line_total()
            )?;
        }
        writeln!(f, "{:-<40}", "")?;
        if self.sale_applied {
            writeln!(f, "{:<33}{:>7}", "Promotion applied", "")?;
        }
        if !self.tip.is_zero() {
            writeln!(f, "{:<33}{:>7}", "Tip", self.tip)?;
        }
        write!(f, "{:<33}{:>7}", "Total", self.grand_total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;

    fn item(num: &str, cents: i64) -> LineItem {
        LineItem::from_product(&Product::new(num, "Item", Money::from_cents(cents), 10), 1)
    }

    #[test]
    fn test_new_basket_is_empty() {
        let basket = Basket::new(7);
        assert_eq!(basket.order_num(), 7);
        assert!(basket.is_empty());
        assert_eq!(basket.total(), Money::ZERO);
        assert!(!basket.sale_applied());
    }

    #[test]
    fn test_duplicates_kept_as_separate_lines() {
        let mut basket = Basket::new(1);
        basket.add(item("0001", 300));
        basket.add(item("0001", 300));
        basket.add(item("0002", 150));

        assert_eq!(basket.len(), 3);
        assert_eq!(basket.items()[2].product_num, "0002");
        assert_eq!(basket.total().to_string(), "7.50");
    }

    #[test]
    fn test_tip_replaces_previous_value() {
        let mut basket = Basket::new(1);
        basket.add(item("0001", 300));
        basket.set_tip(Money::from_cents(100));
        basket.set_tip(Money::from_cents(50));

        assert_eq!(basket.tip().to_string(), "0.50");
        assert_eq!(basket.grand_total().to_string(), "3.50");
    }

    #[test]
    fn test_discount_rewrites_every_price() {
        let mut basket = Basket::new(1);
        basket.add(item("0001", 300));
        basket.add(item("0002", 1000));

        let saved = basket.apply_discount(Decimal::new(10, 2));

        assert_eq!(saved.to_string(), "1.30");
        assert_eq!(basket.items()[0].price.to_string(), "2.70");
        assert_eq!(basket.items()[1].price.to_string(), "9.00");
        assert!(basket.sale_applied());
    }

    #[test]
    fn test_discount_compounds_when_repeated() {
        let mut basket = Basket::new(1);
        basket.add(item("0001", 1000));
        basket.apply_discount(Decimal::new(10, 2));
        basket.apply_discount(Decimal::new(10, 2));

        assert_eq!(basket.items()[0].price.to_string(), "8.10");
    }

    #[test]
    fn test_display_lists_lines_and_total() {
        let mut basket = Basket::new(4);
        basket.add(item("0001", 300));
        basket.set_tip(Money::from_cents(100));

        let text = basket.to_string();
        assert!(text.starts_with("Order number: 004"));
        assert!(text.contains("0001"));
        assert!(text.contains("Tip"));
        assert!(text.ends_with("4.00"));
    }
}
