//! Per-bar signal evaluation: mean-reversion entries, target/stop exits.
//!
//! Order of evaluation within a bar is fixed: exits run first against the
//! set of sides open at bar start, then entries. A position opened on a bar
//! is never closed by the same bar. The close price alone decides triggers;
//! intrabar high/low are not consulted.

use super::account::Account;
use super::bands::BandPoint;
use super::bar::Bar;
use super::error::BandtraderError;
use super::execution::{close_by_side, open_position, position_size};
use super::position::{Side, TradeRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub commission_rate: f64,
    pub risk_fraction: f64,
}

/// Evaluate one bar: close any position whose target or stop has been
/// reached, then check both entry conditions against the band snapshot.
///
/// `band` is `None` during indicator warmup; warmup bars produce no entries
/// but exits still run so an open position can always reach its stop.
///
/// Returns the trades closed on this bar. `Err` only on a close of a side
/// with no holdings, which cannot happen unless the evaluator itself is
/// broken.
pub fn evaluate_bar(
    account: &mut Account,
    bar: &Bar,
    band: Option<&BandPoint>,
    params: &SignalParams,
) -> Result<Vec<TradeRecord>, BandtraderError> {
    let close = bar.close;
    let mut trades = Vec::new();

    // Exit pass over a snapshot of the sides open at bar start.
    for side in account.open_sides() {
        let triggered = account
            .get_position(side)
            .is_some_and(|p| p.should_exit(close));
        if triggered {
            let trade = close_by_side(
                account,
                side,
                bar.timestamp,
                close,
                params.commission_rate,
            )
            .ok_or(BandtraderError::NoHoldings { side })?;
            trades.push(trade);
        }
    }

    let Some(band) = band else {
        return Ok(trades);
    };

    if close <= band.lower && !account.has_position(Side::Long) {
        let size = position_size(account.cash, close, params.risk_fraction, params.commission_rate);
        if size > 0 {
            open_position(
                account,
                bar.timestamp,
                Side::Long,
                close,
                size,
                band.lower,
                band.mean,
                params.commission_rate,
            );
        }
    }

    if close >= band.upper && !account.has_position(Side::Short) {
        let size = position_size(account.cash, close, params.risk_fraction, params.commission_rate);
        if size > 0 {
            open_position(
                account,
                bar.timestamp,
                Side::Short,
                close,
                size,
                band.upper,
                band.mean,
                params.commission_rate,
            );
        }
    }

    Ok(trades)
}
