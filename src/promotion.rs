//! Promotion configuration.
//!
//! The code and rate are injected into the engine rather than compiled in,
//! so a session (or a test) can run with any promotion.

use crate::error::{EngineError, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Environment variable holding the promotion code.
pub const ENV_CODE: &str = "CASHIER_PROMO_CODE";
/// Environment variable holding the discount rate, e.g. `0.10`.
pub const ENV_RATE: &str = "CASHIER_PROMO_RATE";
/// Environment variable allowing a promotion to be applied more than once.
pub const ENV_STACKABLE: &str = "CASHIER_PROMO_STACKABLE";

/// The promotion a cashier may redeem against a basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionConfig {
    code: String,
    rate: Decimal,
    stackable: bool,
}

impl PromotionConfig {
    pub const DEFAULT_CODE: &'static str = "SALE10";

    /// Builds a promotion, validating that `rate` lies in `(0, 1]` and the
    /// code is not blank.
    pub fn new(code: impl Into<String>, rate: Decimal, stackable: bool) -> Result<Self> {
        let code: String = code.into();
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(EngineError::InvalidConfig(
                "promotion code must not be empty".to_string(),
            ));
        }
        if rate <= Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::InvalidConfig(format!(
                "promotion rate {} must be greater than 0 and at most 1",
                rate
            )));
        }
        Ok(PromotionConfig {
            code,
            rate,
            stackable,
        })
    }

    /// Reads the promotion from `CASHIER_PROMO_*` variables, using defaults
    /// for any that are unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let code = lookup(ENV_CODE).unwrap_or(defaults.code);
        let rate = match lookup(ENV_RATE) {
            Some(raw) => Decimal::from_str(raw.trim()).map_err(|e| {
                EngineError::InvalidConfig(format!("{}={:?}: {}", ENV_RATE, raw, e))
            })?,
            None => defaults.rate,
        };
        let stackable = match lookup(ENV_STACKABLE) {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(EngineError::InvalidConfig(format!(
                        "{}={:?}: expected true or false",
                        ENV_STACKABLE, raw
                    )))
                }
            },
            None => defaults.stackable,
        };

        Self::new(code, rate, stackable)
    }

    /// The promotion code as configured.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fraction taken off each price, e.g. `0.10` for 10% off.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Whether the promotion may be redeemed again on an already discounted basket.
    pub fn stackable(&self) -> bool {
        self.stackable
    }

    /// Trimmed, ASCII case-insensitive code comparison.
    pub fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// The rate as a whole percentage for display, e.g. `10`.
    pub fn percent(&self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }
}

impl Default for PromotionConfig {
    fn default() -> Self {
        PromotionConfig {
            code: Self::DEFAULT_CODE.to_string(),
            rate: Decimal::new(10, 2),
            stackable: false,
        }
    }
}
