//! Intraday OHLC bar representation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// Calendar date of the bar, used for session partitioning.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Time of day, used for the intraday trading window.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// True when every price field is a finite number.
    pub fn is_well_formed(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}
