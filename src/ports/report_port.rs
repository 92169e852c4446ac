//! Report generation port trait.

use crate::domain::error::BandtraderError;
use crate::domain::position::TradeRecord;

/// Port for writing the trade ledger of a completed backtest.
pub trait ReportPort {
    fn write(&self, trades: &[TradeRecord], output_path: &str) -> Result<(), BandtraderError>;
}
