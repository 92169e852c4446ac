//! Summary performance statistics over the realized trade ledger.

use super::position::TradeRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub final_balance: f64,
    pub total_pnl: f64,
    /// Most negative point of the running cumulative P&L; 0 when the
    /// cumulative sum never goes negative.
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub win_rate_pct: f64,
    /// mean(pnl) / sample stddev(pnl); 0 with fewer than 2 trades or zero
    /// variance.
    pub risk_adjusted_ratio: f64,
}

/// Report outcome: an empty ledger is a valid terminal state, reported
/// distinctly so nothing downstream divides by a zero trade count.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    NoTrades { final_balance: f64 },
    Summary(Summary),
}

impl Report {
    pub fn compute(trades: &[TradeRecord], final_balance: f64) -> Self {
        if trades.is_empty() {
            return Report::NoTrades { final_balance };
        }

        let mut total_pnl = 0.0_f64;
        let mut running = 0.0_f64;
        let mut max_drawdown = 0.0_f64;
        let mut trades_won = 0usize;

        for trade in trades {
            total_pnl += trade.pnl;
            running += trade.pnl;
            if running < max_drawdown {
                max_drawdown = running;
            }
            if trade.pnl > 0.0 {
                trades_won += 1;
            }
        }

        let total_trades = trades.len();
        let win_rate_pct = trades_won as f64 / total_trades as f64 * 100.0;

        let risk_adjusted_ratio = if total_trades < 2 {
            0.0
        } else {
            let n = total_trades as f64;
            let mean = total_pnl / n;
            let variance = trades
                .iter()
                .map(|t| (t.pnl - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            let stddev = variance.sqrt();
            if stddev > 0.0 { mean / stddev } else { 0.0 }
        };

        Report::Summary(Summary {
            final_balance,
            total_pnl,
            max_drawdown,
            total_trades,
            trades_won,
            win_rate_pct,
            risk_adjusted_ratio,
        })
    }
}
