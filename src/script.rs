//! Till command records for CSV parsing and their typed representation.

use crate::money::Money;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Raw command record as read from CSV.
///
/// Header: `command,arg,quantity`. `arg` carries the product number, promotion
/// code or tip amount; `quantity` is only used by `restock`.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    pub command: String,

    #[serde(default)]
    pub arg: Option<String>,

    #[serde(default)]
    pub quantity: Option<String>,
}

/// A parsed command ready to run against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up a product and hold it for purchase.
    Check(String),

    /// Buy the checked product.
    Buy,

    /// Commit the basket and move to the next customer.
    Finalize,

    /// Revert the last state change.
    Undo,

    /// Redeem a promotion code.
    Promotion(String),

    /// Set the tip on the basket.
    Tip(Money),

    /// Back office: show a stock record.
    Query(String),

    /// Back office: add units to a product. The quantity is validated by the
    /// restock client.
    Restock { product_num: String, quantity: String },

    /// Back office: clear the display.
    Clear,
}

impl CommandRecord {
    /// Parses the raw CSV record into a typed command.
    ///
    /// Returns `None` if the record is invalid (unknown command, missing or
    /// malformed argument).
    pub fn parse(&self) -> Option<Command> {
        let command = self.command.trim().to_lowercase();

        match command.as_str() {
            "check" => Some(Command::Check(self.required_arg()?)),
            "buy" => Some(Command::Buy),
            "finalize" | "bought" | "next" => Some(Command::Finalize),
            "undo" => Some(Command::Undo),
            "promo" | "promotion" | "sale" => Some(Command::Promotion(self.required_arg()?)),
            "tip" => {
                let amount = Money::from_str(&self.required_arg()?).ok()?;
                Some(Command::Tip(amount))
            }
            "query" => Some(Command::Query(self.required_arg()?)),
            "restock" => Some(Command::Restock {
                product_num: self.required_arg()?,
                quantity: non_empty(self.quantity.as_deref())?,
            }),
            "clear" => Some(Command::Clear),
            _ => None,
        }
    }

    fn required_arg(&self) -> Option<String> {
        non_empty(self.arg.as_deref())
    }
}

fn non_empty(field: Option<&str>) -> Option<String> {
    let trimmed = field?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Check(pn) => write!(f, "check {}", pn),
            Command::Buy => write!(f, "buy"),
            Command::Finalize => write!(f, "finalize"),
            Command::Undo => write!(f, "undo"),
            Command::Promotion(code) => write!(f, "promo {}", code),
            Command::Tip(amount) => write!(f, "tip {}", amount),
            Command::Query(pn) => write!(f, "query {}", pn),
            Command::Restock {
                product_num,
                quantity,
            } => write!(f, "restock {} {}", product_num, quantity),
            Command::Clear => write!(f, "clear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(command: &str, arg: Option<&str>, quantity: Option<&str>) -> CommandRecord {
        CommandRecord {
            command: command.to_string(),
            arg: arg.map(str::to_string),
            quantity: quantity.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_check() {
        let parsed = record("check", Some(" 0001 "), None).parse().unwrap();
        assert_eq!(parsed, Command::Check("0001".to_string()));
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(record("BUY", None, None).parse(), Some(Command::Buy));
        assert_eq!(record("bought", None, None).parse(), Some(Command::Finalize));
        assert_eq!(record(" undo ", None, None).parse(), Some(Command::Undo));
        assert_eq!(record("clear", None, None).parse(), Some(Command::Clear));
    }

    #[test]
    fn test_parse_tip() {
        let parsed = record("tip", Some("2.5"), None).parse().unwrap();
        assert_eq!(parsed, Command::Tip(Money::from_cents(250)));
    }

    #[test]
    fn test_parse_restock() {
        let parsed = record("restock", Some("0001"), Some("10")).parse().unwrap();
        assert_eq!(
            parsed,
            Command::Restock {
                product_num: "0001".to_string(),
                quantity: "10".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        assert!(record("check", None, None).parse().is_none());
        assert!(record("check", Some("  "), None).parse().is_none());
        assert!(record("promo", None, None).parse().is_none());
        assert!(record("restock", Some("0001"), None).parse().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_tip_and_unknown_command() {
        assert!(record("tip", Some("lots"), None).parse().is_none());
        assert!(record("refund", Some("0001"), None).parse().is_none());
    }

    #[test]
    fn test_display_round_trips_for_transcript() {
        assert_eq!(Command::Check("0001".to_string()).to_string(), "check 0001");
        assert_eq!(Command::Tip(Money::from_cents(100)).to_string(), "tip 1.00");
    }
}
