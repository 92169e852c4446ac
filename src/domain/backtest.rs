//! Backtest engine configuration and the one-pass simulation loop.

use chrono::{NaiveDate, NaiveTime};

use super::account::Account;
use super::bands::calculate_bands;
use super::bar::Bar;
use super::error::BandtraderError;
use super::session::{partition_sessions, run_session, SessionOutcome};
use super::signal::SignalParams;

pub const DEFAULT_WINDOW_SIZE: usize = 20;
pub const DEFAULT_COMMISSION_RATE: f64 = 0.0005;
pub const DEFAULT_MAX_TRADE_RISK: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub window_size: usize,
    pub session_start: NaiveTime,
    pub session_end: NaiveTime,
    pub initial_balance: f64,
    pub commission_rate: f64,
    pub max_trade_risk: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub account: Account,
    /// End-of-session balance per completed session, in session order.
    pub session_balances: Vec<(NaiveDate, f64)>,
    /// Sessions abandoned for malformed data, with the cause.
    pub skipped_sessions: Vec<(NaiveDate, String)>,
}

/// Walk the bar series session by session, in time order, carrying the cash
/// balance forward. Bars must be sorted by timestamp.
///
/// Band statistics are computed once over the full series (windows may span
/// session boundaries, matching the strategy's definition). Malformed
/// sessions are recorded and skipped; the run continues.
pub fn run_backtest(
    bars: &[Bar],
    config: &EngineConfig,
) -> Result<BacktestResult, BandtraderError> {
    let bands = calculate_bands(bars, config.window_size);
    let params = SignalParams {
        commission_rate: config.commission_rate,
        risk_fraction: config.max_trade_risk,
    };

    let mut account = Account::new(config.initial_balance);
    let mut session_balances = Vec::new();
    let mut skipped_sessions = Vec::new();

    for session in partition_sessions(bars) {
        let outcome = run_session(
            &mut account,
            &session,
            &bands,
            &params,
            config.session_start,
            config.session_end,
        )?;
        match outcome {
            SessionOutcome::Completed {
                date,
                ending_balance,
            } => session_balances.push((date, ending_balance)),
            SessionOutcome::Skipped { date, reason } => skipped_sessions.push((date, reason)),
        }
    }

    Ok(BacktestResult {
        account,
        session_balances,
        skipped_sessions,
    })
}
