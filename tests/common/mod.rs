#![allow(dead_code)]

use bandtrader::domain::backtest::EngineConfig;
pub use bandtrader::domain::bar::Bar;
use bandtrader::domain::error::BandtraderError;
use bandtrader::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ts(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(2024, 1, day).and_hms_opt(hour, minute, 0).unwrap()
}

/// Flat bar: all four prices equal to `close`.
pub fn flat_bar(day: u32, hour: u32, minute: u32, close: f64) -> Bar {
    Bar {
        timestamp: ts(day, hour, minute),
        open: close,
        high: close,
        low: close,
        close,
    }
}

/// Minute bars on one day starting at 09:00, one per close value.
pub fn session_bars(day: u32, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| flat_bar(day, 9, i as u32, close))
        .collect()
}

/// Zero-commission, full-risk config so sizing is simply floor(balance/price).
pub fn sample_config(window_size: usize) -> EngineConfig {
    EngineConfig {
        window_size,
        session_start: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        session_end: NaiveTime::from_hms_opt(14, 59, 0).unwrap(),
        initial_balance: 100_000.0,
        commission_rate: 0.0,
        max_trade_risk: 1.0,
    }
}

pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError> {
        if let Some(reason) = &self.error {
            return Err(BandtraderError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.bars.clone();
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
