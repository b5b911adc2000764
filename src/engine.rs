//! Core checkout engine.
//!
//! Drives one till through check -> buy -> finalize against the stock and
//! order services. Every command runs to completion and answers with an
//! [`Update`]: the status text for the clerk plus a copy of the basket.
//!
//! # States
//!
//! - `Process`: resting state; nothing is awaiting purchase
//! - `Checked`: a product has been looked up and is held for `buy`
//!
//! Any `buy`, successful or not, returns the engine to `Process`.
//!
//! # Undo
//!
//! Each command that changes engine state first pushes a snapshot of the
//! state it is about to change. `undo` pops the latest snapshot and restores
//! it. Undo is local: stock already decremented and orders already committed
//! stay as they are in the services.

use crate::basket::Basket;
use crate::error::{Result, StockError};
use crate::factory::ServiceFactory;
use crate::money::Money;
use crate::order::OrderProcessor;
use crate::product::{LineItem, Product};
use crate::promotion::PromotionConfig;
use crate::stock::StockReadWriter;
use log::{debug, error, info};

/// Units requested by each check.
pub const UNITS_PER_CHECK: u32 = 1;

/// Where the till is in the check/buy cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Process,
    Checked,
}

/// What a command reports back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Status line for the clerk.
    pub message: String,

    /// The basket after the command, if one exists.
    pub basket: Option<Basket>,
}

impl Update {
    /// Text for the order panel; a placeholder when there is no basket.
    pub fn basket_view(&self) -> String {
        match &self.basket {
            Some(basket) => basket.to_string(),
            None => "Customers order".to_string(),
        }
    }
}

/// Point-in-time copy of the engine's mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    state: State,
    checked: Option<LineItem>,
    basket: Option<Basket>,
    product_num: String,
}

/// The checkout state machine for a single till.
///
/// One engine serves one clerk; concurrent checkouts each need their own.
pub struct CashierEngine<S, O> {
    stock: S,
    orders: O,
    promotion: PromotionConfig,

    state: State,
    /// Product held for purchase while `Checked`, fixed at one unit.
    checked: Option<LineItem>,
    basket: Option<Basket>,
    /// Last product number looked up.
    product_num: String,

    history: Vec<Snapshot>,
}

impl<S, O> CashierEngine<S, O>
where
    S: StockReadWriter,
    O: OrderProcessor,
{
    /// Creates an idle engine with no basket and empty history.
    pub fn new(stock: S, orders: O, promotion: PromotionConfig) -> Self {
        CashierEngine {
            stock,
            orders,
            promotion,
            state: State::Process,
            checked: None,
            basket: None,
            product_num: String::new(),
            history: Vec::new(),
        }
    }

    /// Creates an engine with services obtained from `factory`.
    pub fn from_factory<F>(factory: &F, promotion: PromotionConfig) -> Result<Self>
    where
        F: ServiceFactory<Stock = S, Orders = O>,
    {
        let stock = factory.make_stock_read_writer()?;
        let orders = factory.make_order_processor()?;
        Ok(Self::new(stock, orders, promotion))
    }

    /// Initial update shown when a display first attaches.
    pub fn welcome(&self) -> Update {
        self.update("Welcome")
    }

    /// Looks up a product and, if one unit is available, holds it for `buy`.
    pub fn check(&mut self, product_num: &str) -> Update {
        self.save_snapshot();

        self.state = State::Process;
        self.checked = None;
        self.product_num = product_num.trim().to_string();
        let pn = self.product_num.clone();

        let message = match self.lookup(&pn) {
            Ok(Some(product)) if product.has_stock_for(UNITS_PER_CHECK) => {
                let message = product.to_string();
                self.checked = Some(LineItem::from_product(&product, UNITS_PER_CHECK));
                self.state = State::Checked;
                debug!("Checked {} -> {:?}", pn, self.state);
                message
            }
            Ok(Some(product)) => format!("{} not in stock", product.description),
            Ok(None) => format!("Unknown product number {}", pn),
            Err(e) => {
                error!("check {}: {}", pn, e);
                e.to_string()
            }
        };

        self.update(message)
    }

    /// Buys the checked product and adds it to the basket.
    ///
    /// Rejected unless the engine is `Checked`. Always leaves the engine in
    /// `Process`.
    pub fn buy(&mut self) -> Update {
        self.save_snapshot();

        let message = match (self.state, self.checked.take()) {
            (State::Checked, Some(item)) => self.purchase(item),
            _ => "Check if OK with customer first".to_string(),
        };

        self.state = State::Process;
        self.update(message)
    }

    /// Commits a non-empty basket as an order and moves to the next customer.
    ///
    /// The basket is cleared whether or not the commit succeeds.
    pub fn finalize(&mut self) -> Update {
        self.save_snapshot();

        let message = match self.basket.take() {
            Some(basket) if !basket.is_empty() => {
                let order_num = basket.order_num();
                match self.orders.new_order(basket) {
                    Ok(()) => {
                        info!("Committed order {}", order_num);
                        "Next customer".to_string()
                    }
                    Err(e) => {
                        error!("finalize order {}: {}", order_num, e);
                        e.to_string()
                    }
                }
            }
            _ => "Next customer".to_string(),
        };

        self.state = State::Process;
        self.checked = None;
        self.update(message)
    }

    /// Redeems a promotion code against the current basket.
    pub fn apply_promotion(&mut self, code: &str) -> Update {
        let code = code.trim();
        if !self.promotion.matches(code) {
            return self.update(format!("Invalid promotion code {}", code));
        }

        let mut basket = match &self.basket {
            None => return self.update("No basket to apply a promotion to"),
            Some(basket) if basket.sale_applied() && !self.promotion.stackable() => {
                let message = format!(
                    "Promotion already applied to order {}",
                    basket.order_num()
                );
                return self.update(message);
            }
            Some(basket) => basket.clone(),
        };

        let saved = basket.apply_discount(self.promotion.rate());
        debug!("Order {}: discount {} applied", basket.order_num(), saved);
        let message = format!(
            "{}% off: saved {}, new total {}",
            self.promotion.percent(),
            saved,
            basket.total()
        );

        self.save_snapshot();
        self.basket = Some(basket);
        self.update(message)
    }

    /// Sets the tip on the current basket, replacing any earlier tip.
    ///
    /// Tips must lie in `0..=Money::max_amount()`.
    pub fn apply_tip(&mut self, amount: Money) -> Update {
        if amount.is_negative() {
            return self.update(format!("Tip cannot be negative: {}", amount));
        }
        if !amount.is_valid_amount() {
            return self.update(format!(
                "Tip cannot exceed {}: {}",
                Money::max_amount(),
                amount
            ));
        }

        let mut basket = match &self.basket {
            Some(basket) => basket.clone(),
            None => return self.update("No basket to add a tip to"),
        };
        basket.set_tip(amount);
        let message = format!("Tip of {} added to order {}", amount, basket.order_num());

        self.save_snapshot();
        self.basket = Some(basket);
        self.update(message)
    }

    /// Restores the state saved before the most recent command.
    ///
    /// Returns `None`, changing nothing, when there is no history.
    pub fn undo(&mut self) -> Option<Update> {
        let snapshot = self.history.pop()?;
        debug!(
            "Undo -> {:?}, {} snapshot(s) left",
            snapshot.state,
            self.history.len()
        );

        self.state = snapshot.state;
        self.checked = snapshot.checked;
        self.basket = snapshot.basket;
        self.product_num = snapshot.product_num;

        Some(self.update("Undo"))
    }

    /// Current position in the check/buy cycle.
    pub fn state(&self) -> State {
        self.state
    }

    /// The basket in progress, if anything has been bought.
    pub fn basket(&self) -> Option<&Basket> {
        self.basket.as_ref()
    }

    /// The line held for `buy` while `Checked`.
    pub fn checked(&self) -> Option<&LineItem> {
        self.checked.as_ref()
    }

    /// Product number from the most recent check.
    pub fn last_product_num(&self) -> &str {
        &self.product_num
    }

    /// Number of snapshots available to `undo`.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The promotion this till redeems.
    pub fn promotion(&self) -> &PromotionConfig {
        &self.promotion
    }

    /// Fetches a product, refusing records the till cannot price.
    fn lookup(&self, pn: &str) -> std::result::Result<Option<Product>, StockError> {
        if !self.stock.exists(pn)? {
            return Ok(None);
        }
        let product = self.stock.get_details(pn)?;
        product.validate()?;
        Ok(Some(product))
    }

    /// Decrements stock for `item` and appends it to the basket.
    fn purchase(&mut self, item: LineItem) -> String {
        // Allocate the order number first so a failure here leaves stock untouched.
        let mut basket = match self.basket.take() {
            Some(basket) => basket,
            None => match self.orders.unique_number() {
                Ok(order_num) => Basket::new(order_num),
                Err(e) => {
                    error!("allocate order number: {}", e);
                    return e.to_string();
                }
            },
        };

        let message = match self.stock.buy_stock(&item.product_num, item.quantity) {
            Ok(true) => {
                debug!("Order {}: added {}", basket.order_num(), item.product_num);
                let message = format!("Purchased {}", item.description);
                basket.add(item);
                message
            }
            Ok(false) => "!!! Not in stock".to_string(),
            Err(e) => {
                error!("buy {}: {}", item.product_num, e);
                e.to_string()
            }
        };

        // A basket only exists once something has been bought.
        if !basket.is_empty() {
            self.basket = Some(basket);
        }
        message
    }

    fn save_snapshot(&mut self) {
        self.history.push(Snapshot {
            state: self.state,
            checked: self.checked.clone(),
            basket: self.basket.clone(),
            product_num: self.product_num.clone(),
        });
    }

    fn update(&self, message: impl Into<String>) -> Update {
        Update {
            message: message.into(),
            basket: self.basket.clone(),
        }
    }
}
