//! Rolling mean/standard-deviation bands over closing prices.
//!
//! Bands consist of:
//! - Mean: arithmetic mean of the trailing `window` closes
//! - Upper: Mean + (2 × StdDev)
//! - Lower: Mean - (2 × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! The window ends at the current bar, inclusive.
//!
//! Warmup: the first (window-1) points are invalid and carry no signal.

use chrono::NaiveDateTime;

use super::bar::Bar;

const BAND_WIDTH_STDDEVS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BandPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub mean: f64,
    pub stddev: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub window: usize,
    pub points: Vec<BandPoint>,
}

impl BandSeries {
    /// Band point aligned with bar index `i`, or None during warmup.
    pub fn at(&self, i: usize) -> Option<&BandPoint> {
        self.points.get(i).filter(|p| p.valid)
    }
}

pub fn calculate_bands(bars: &[Bar], window: usize) -> BandSeries {
    let mut points = Vec::with_capacity(bars.len());
    let warmup = window.saturating_sub(1);

    for i in 0..bars.len() {
        let timestamp = bars[i].timestamp;
        let valid = window > 0 && i >= warmup;

        let (mean, stddev, upper, lower) = if valid {
            let start = i + 1 - window;
            let closes = &bars[start..=i];

            let mean: f64 = closes.iter().map(|b| b.close).sum::<f64>() / window as f64;
            let variance: f64 = closes
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / window as f64;
            let stddev = variance.sqrt();

            (
                mean,
                stddev,
                mean + BAND_WIDTH_STDDEVS * stddev,
                mean - BAND_WIDTH_STDDEVS * stddev,
            )
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };

        points.push(BandPoint {
            timestamp,
            valid,
            mean,
            stddev,
            upper,
            lower,
        });
    }

    BandSeries { window, points }
}
