//! CSV file data adapter.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BandtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| BandtraderError::Data {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp =
                NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT).map_err(|e| {
                    BandtraderError::Data {
                        reason: format!("invalid timestamp format: {}", e),
                    }
                })?;

            let open: f64 = record
                .get(1)
                .ok_or_else(|| BandtraderError::Data {
                    reason: "missing open column".into(),
                })?
                .parse()
                .map_err(|e| BandtraderError::Data {
                    reason: format!("invalid open value: {}", e),
                })?;

            let high: f64 = record
                .get(2)
                .ok_or_else(|| BandtraderError::Data {
                    reason: "missing high column".into(),
                })?
                .parse()
                .map_err(|e| BandtraderError::Data {
                    reason: format!("invalid high value: {}", e),
                })?;

            let low: f64 = record
                .get(3)
                .ok_or_else(|| BandtraderError::Data {
                    reason: "missing low column".into(),
                })?
                .parse()
                .map_err(|e| BandtraderError::Data {
                    reason: format!("invalid low value: {}", e),
                })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| BandtraderError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| BandtraderError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn data_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, BandtraderError> {
        let bars = self.fetch_bars()?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.timestamp, last.timestamp, bars.len()))),
            _ => Ok(None),
        }
    }
}
