//! Account state: cash balance, open position set, realized trade ledger.

use std::collections::HashMap;

use super::position::{Position, Side, TradeRecord};

/// Owns all balance-mutating state for one simulation run. At most one open
/// position per side, so the open set is keyed by [`Side`].
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub cash: f64,
    pub initial_balance: f64,
    pub commission_paid: f64,
    pub positions: HashMap<Side, Position>,
    pub trades: Vec<TradeRecord>,
}

impl Account {
    pub fn new(initial_balance: f64) -> Self {
        Account {
            cash: initial_balance,
            initial_balance,
            commission_paid: 0.0,
            positions: HashMap::new(),
            trades: Vec::new(),
        }
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.insert(position.side, position);
    }

    pub fn get_position(&self, side: Side) -> Option<&Position> {
        self.positions.get(&side)
    }

    pub fn has_position(&self, side: Side) -> bool {
        self.positions.contains_key(&side)
    }

    pub fn remove_position(&mut self, side: Side) -> Option<Position> {
        self.positions.remove(&side)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Sides currently open, in a deterministic order for the exit pass.
    pub fn open_sides(&self) -> Vec<Side> {
        let mut sides: Vec<Side> = self.positions.keys().copied().collect();
        sides.sort_by_key(|s| matches!(s, Side::Short));
        sides
    }

    pub fn record_trade(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }
}
