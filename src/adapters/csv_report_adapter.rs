//! CSV trade-ledger report adapter implementing ReportPort.

use crate::domain::error::BandtraderError;
use crate::domain::position::TradeRecord;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, trades: &[TradeRecord], output_path: &str) -> Result<(), BandtraderError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to open {}: {}", output_path, e),
        })?;

        wtr.write_record([
            "entry_time",
            "exit_time",
            "side",
            "size",
            "entry_price",
            "exit_price",
            "pnl",
            "commission",
        ])
        .map_err(|e| BandtraderError::Data {
            reason: format!("failed to write trade log: {}", e),
        })?;

        for trade in trades {
            wtr.write_record([
                trade.entry_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                trade.exit_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                trade.side.to_string(),
                trade.size.to_string(),
                format!("{:.4}", trade.entry_price),
                format!("{:.4}", trade.exit_price),
                format!("{:.4}", trade.pnl),
                format!("{:.4}", trade.commission),
            ])
            .map_err(|e| BandtraderError::Data {
                reason: format!("failed to write trade log: {}", e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}
