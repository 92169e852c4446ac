//! Open positions and realized trade records.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

/// An open, unrealized trade commitment. Exists from open to close; on close
/// it is consumed into a [`TradeRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub side: Side,
    pub size: i64,
    pub stop_loss: f64,
    pub target: f64,
    pub entry_commission: f64,
}

impl Position {
    /// Stop breach check against the close price. For a long the stop sits
    /// below, for a short above.
    pub fn stop_hit(&self, close: f64) -> bool {
        match self.side {
            Side::Long => close <= self.stop_loss,
            Side::Short => close >= self.stop_loss,
        }
    }

    /// Target reach check against the close price.
    pub fn target_hit(&self, close: f64) -> bool {
        match self.side {
            Side::Long => close >= self.target,
            Side::Short => close <= self.target,
        }
    }

    pub fn should_exit(&self, close: f64) -> bool {
        self.target_hit(close) || self.stop_hit(close)
    }
}

/// Immutable realized outcome of a closed position. `commission` is the sum
/// of the entry and exit legs.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: i64,
    pub side: Side,
    pub pnl: f64,
    pub commission: f64,
}
