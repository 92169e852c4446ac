//! Session driver: calendar-day partitioning, intraday windowing, forced
//! end-of-session liquidation.

use chrono::{NaiveDate, NaiveTime};

use super::account::Account;
use super::bands::BandSeries;
use super::bar::Bar;
use super::error::BandtraderError;
use super::execution::close_all;
use super::signal::{evaluate_bar, SignalParams};

/// One calendar day's worth of bars. `offset` is the position of the first
/// bar within the full series, so band points stay index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<'a> {
    pub date: NaiveDate,
    pub offset: usize,
    pub bars: &'a [Bar],
}

/// Split a timestamp-ordered bar series into per-day sessions, ascending.
pub fn partition_sessions(bars: &[Bar]) -> Vec<Session<'_>> {
    let mut sessions = Vec::new();
    let mut start = 0;

    for i in 1..=bars.len() {
        if i == bars.len() || bars[i].date() != bars[start].date() {
            sessions.push(Session {
                date: bars[start].date(),
                offset: start,
                bars: &bars[start..i],
            });
            start = i;
        }
    }

    sessions
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed { date: NaiveDate, ending_balance: f64 },
    Skipped { date: NaiveDate, reason: String },
}

/// Run one session against the account.
///
/// A session containing any malformed bar is rejected before evaluation
/// starts, so a bad session can never leave a position open. Otherwise only
/// bars inside the `[window_start, window_end]` time-of-day window reach the
/// evaluator, and every position still open after the last bar is
/// force-closed at that bar's close. No position survives a session.
pub fn run_session(
    account: &mut Account,
    session: &Session<'_>,
    bands: &BandSeries,
    params: &SignalParams,
    window_start: NaiveTime,
    window_end: NaiveTime,
) -> Result<SessionOutcome, BandtraderError> {
    if let Some(bad) = session.bars.iter().find(|b| !b.is_well_formed()) {
        return Ok(SessionOutcome::Skipped {
            date: session.date,
            reason: format!("non-finite price at {}", bad.timestamp),
        });
    }

    for (i, bar) in session.bars.iter().enumerate() {
        let time = bar.time();
        if time < window_start || time > window_end {
            continue;
        }
        evaluate_bar(account, bar, bands.at(session.offset + i), params)?;
    }

    if let Some(last) = session.bars.last() {
        close_all(account, last.timestamp, last.close, params.commission_rate);
    }
    debug_assert_eq!(account.position_count(), 0);

    Ok(SessionOutcome::Completed {
        date: session.date,
        ending_balance: account.cash,
    })
}
