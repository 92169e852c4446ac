//! Trade execution: commissions, risk-based sizing, open/close settlement.

use chrono::NaiveDateTime;

use super::account::Account;
use super::position::{Position, Side, TradeRecord};

/// Commission for one leg: size × price × rate.
pub fn calculate_commission(size: i64, price: f64, commission_rate: f64) -> f64 {
    size as f64 * price * commission_rate
}

/// Risk-based position sizing.
///
/// The risk budget is `balance × risk_fraction`; the raw share count divides
/// that budget by `price × commission_rate` (the rate-based divisor is the
/// documented behavior of this strategy, not a risk-per-stop model). With a
/// zero commission rate the budget imposes no cap and the raw size is
/// `floor(balance / price)`.
///
/// The raw size is floored at 1 share, then rejected to 0 if the full cost
/// including commission would exceed the balance. The result is therefore
/// always affordable or zero.
pub fn position_size(balance: f64, price: f64, risk_fraction: f64, commission_rate: f64) -> i64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }

    let raw = if commission_rate > 0.0 {
        ((balance * risk_fraction) / (price * commission_rate)).floor()
    } else {
        (balance / price).floor()
    };

    let size = if raw.is_finite() && raw > 1.0 {
        raw as i64
    } else {
        1
    };

    if size as f64 * price * (1.0 + commission_rate) > balance {
        return 0;
    }
    size
}

/// Result of an open attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { size: i64, commission: f64 },
    InsufficientFunds,
}

/// Open a position, escrowing the entry notional plus commission.
///
/// Refused with no state change when the total cost exceeds available cash;
/// the cash balance never goes negative through an open.
pub fn open_position(
    account: &mut Account,
    entry_time: NaiveDateTime,
    side: Side,
    price: f64,
    size: i64,
    stop_loss: f64,
    target: f64,
    commission_rate: f64,
) -> EntryResult {
    let commission = calculate_commission(size, price, commission_rate);
    let total_cost = size as f64 * price + commission;

    if total_cost > account.cash {
        return EntryResult::InsufficientFunds;
    }

    account.cash -= total_cost;
    account.commission_paid += commission;
    account.add_position(Position {
        entry_time,
        entry_price: price,
        side,
        size,
        stop_loss,
        target,
        entry_commission: commission,
    });

    EntryResult::Entered { size, commission }
}

/// Settle a position already removed from the open set.
///
/// Realized P&L nets out both commission legs. Cash settlement: a long
/// credits the sale proceeds minus commission; a short returns the escrowed
/// entry notional plus the short profit, minus commission. Either way the
/// cash delta over a round trip equals the trade's realized P&L.
pub fn close_position(
    account: &mut Account,
    position: Position,
    exit_time: NaiveDateTime,
    exit_price: f64,
    commission_rate: f64,
) -> TradeRecord {
    let exit_commission = calculate_commission(position.size, exit_price, commission_rate);
    let exit_value = position.size as f64 * exit_price;

    let price_pnl = match position.side {
        Side::Long => (exit_price - position.entry_price) * position.size as f64,
        Side::Short => (position.entry_price - exit_price) * position.size as f64,
    };
    let pnl = price_pnl - position.entry_commission - exit_commission;

    match position.side {
        Side::Long => {
            account.cash += exit_value - exit_commission;
        }
        Side::Short => {
            let entry_notional = position.size as f64 * position.entry_price;
            let short_profit = entry_notional - exit_value;
            account.cash += entry_notional + short_profit - exit_commission;
        }
    }
    account.commission_paid += exit_commission;

    let trade = TradeRecord {
        entry_time: position.entry_time,
        exit_time,
        entry_price: position.entry_price,
        exit_price,
        size: position.size,
        side: position.side,
        pnl,
        commission: position.entry_commission + exit_commission,
    };
    account.record_trade(trade.clone());
    trade
}

/// Close the open position on `side`, if any.
pub fn close_by_side(
    account: &mut Account,
    side: Side,
    exit_time: NaiveDateTime,
    exit_price: f64,
    commission_rate: f64,
) -> Option<TradeRecord> {
    let position = account.remove_position(side)?;
    Some(close_position(
        account,
        position,
        exit_time,
        exit_price,
        commission_rate,
    ))
}

/// Close every open position at the given price. Session boundaries only.
pub fn close_all(
    account: &mut Account,
    exit_time: NaiveDateTime,
    exit_price: f64,
    commission_rate: f64,
) -> Vec<TradeRecord> {
    let sides = account.open_sides();
    let mut closed = Vec::with_capacity(sides.len());
    for side in sides {
        if let Some(trade) = close_by_side(account, side, exit_time, exit_price, commission_rate) {
            closed.push(trade);
        }
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const RATE: f64 = 0.0005;

    #[test]
    fn commission_basic() {
        assert_relative_eq!(calculate_commission(100, 50.0, RATE), 2.5);
    }

    #[test]
    fn commission_zero_rate() {
        assert_relative_eq!(calculate_commission(100, 50.0, 0.0), 0.0);
    }

    #[test]
    fn sizing_rejects_unaffordable() {
        // budget = 1000; divisor = 100 * 0.0005 = 0.05 -> raw 20_000 shares,
        // which would cost 2_001_000 against a 100_000 balance
        assert_eq!(position_size(100_000.0, 100.0, 0.01, RATE), 0);
    }

    #[test]
    fn sizing_affordable_with_higher_rate() {
        // budget = 1000; divisor = 100 * 0.05 = 5 -> 200 shares
        // cost = 200 * 100 * 1.05 = 21_000 <= 100_000
        assert_eq!(position_size(100_000.0, 100.0, 0.01, 0.05), 200);
    }

    #[test]
    fn sizing_floors_at_one_share() {
        // budget = 10, divisor = 10 * 0.5 = 5 -> raw 2... use smaller budget:
        // budget = 100 * 0.001 = 0.1; divisor = 10 * 0.5 = 5 -> raw 0 -> 1
        // cost = 1 * 10 * 1.5 = 15 <= 100
        assert_eq!(position_size(100.0, 10.0, 0.001, 0.5), 1);
    }

    #[test]
    fn sizing_forced_single_share_still_affordable_or_zero() {
        // raw floors to 1 but 1 share at 150% of price exceeds the balance
        assert_eq!(position_size(10.0, 10.0, 0.001, 0.5), 0);
    }

    #[test]
    fn sizing_zero_rate_caps_by_affordability() {
        let size = position_size(100_000.0, 94.0, 1.0, 0.0);
        assert_eq!(size, 1063);
        assert!(size as f64 * 94.0 <= 100_000.0);
    }

    #[test]
    fn sizing_zero_price_is_rejected() {
        assert_eq!(position_size(100_000.0, 0.0, 0.01, RATE), 0);
        assert_eq!(position_size(100_000.0, f64::NAN, 0.01, RATE), 0);
    }

    #[test]
    fn open_long_debits_cost_and_commission() {
        let mut account = Account::new(100_000.0);
        let result = open_position(
            &mut account,
            ts(9, 30),
            Side::Long,
            100.0,
            100,
            95.0,
            105.0,
            RATE,
        );

        let commission = 100.0 * 100.0 * RATE;
        assert_eq!(
            result,
            EntryResult::Entered {
                size: 100,
                commission,
            }
        );
        assert_relative_eq!(account.cash, 100_000.0 - 10_000.0 - commission);
        assert_relative_eq!(account.commission_paid, commission);

        let pos = account.get_position(Side::Long).unwrap();
        assert_relative_eq!(pos.entry_price, 100.0);
        assert_relative_eq!(pos.stop_loss, 95.0);
        assert_relative_eq!(pos.target, 105.0);
    }

    #[test]
    fn open_refused_on_insufficient_funds() {
        let mut account = Account::new(50.0);
        let result = open_position(
            &mut account,
            ts(9, 30),
            Side::Long,
            100.0,
            10,
            95.0,
            105.0,
            RATE,
        );

        assert_eq!(result, EntryResult::InsufficientFunds);
        assert_relative_eq!(account.cash, 50.0);
        assert!(!account.has_position(Side::Long));
    }

    #[test]
    fn long_round_trip_cash_matches_pnl() {
        let mut account = Account::new(100_000.0);
        open_position(
            &mut account,
            ts(9, 30),
            Side::Long,
            100.0,
            100,
            95.0,
            105.0,
            RATE,
        );
        let trade = close_by_side(&mut account, Side::Long, ts(10, 0), 105.0, RATE).unwrap();

        let entry_commission = 100.0 * 100.0 * RATE;
        let exit_commission = 100.0 * 105.0 * RATE;
        let expected_pnl = 5.0 * 100.0 - entry_commission - exit_commission;
        assert_relative_eq!(trade.pnl, expected_pnl, max_relative = 1e-12);
        assert_relative_eq!(trade.commission, entry_commission + exit_commission);
        assert_relative_eq!(
            account.cash,
            100_000.0 + expected_pnl,
            max_relative = 1e-12
        );
        assert!(!account.has_position(Side::Long));
    }

    #[test]
    fn short_round_trip_cash_matches_pnl() {
        let mut account = Account::new(100_000.0);
        open_position(
            &mut account,
            ts(9, 30),
            Side::Short,
            100.0,
            100,
            105.0,
            95.0,
            RATE,
        );
        let trade = close_by_side(&mut account, Side::Short, ts(10, 0), 95.0, RATE).unwrap();

        let entry_commission = 100.0 * 100.0 * RATE;
        let exit_commission = 100.0 * 95.0 * RATE;
        let expected_pnl = 5.0 * 100.0 - entry_commission - exit_commission;
        assert_relative_eq!(trade.pnl, expected_pnl, max_relative = 1e-12);
        assert_relative_eq!(
            account.cash,
            100_000.0 + expected_pnl,
            max_relative = 1e-12
        );
    }

    #[test]
    fn short_losing_round_trip_reduces_cash() {
        let mut account = Account::new(100_000.0);
        open_position(
            &mut account,
            ts(9, 30),
            Side::Short,
            100.0,
            100,
            105.0,
            95.0,
            RATE,
        );
        let trade = close_by_side(&mut account, Side::Short, ts(10, 0), 110.0, RATE).unwrap();

        assert!(trade.pnl < 0.0);
        assert!(account.cash < 100_000.0);
    }

    #[test]
    fn flat_round_trip_zero_commission_is_breakeven() {
        let mut account = Account::new(100_000.0);
        open_position(
            &mut account,
            ts(9, 30),
            Side::Long,
            100.0,
            100,
            95.0,
            105.0,
            0.0,
        );
        let trade = close_by_side(&mut account, Side::Long, ts(10, 0), 100.0, 0.0).unwrap();

        assert_relative_eq!(trade.pnl, 0.0);
        assert_relative_eq!(account.cash, 100_000.0);
    }

    #[test]
    fn close_by_side_nonexistent_returns_none() {
        let mut account = Account::new(100_000.0);
        assert!(close_by_side(&mut account, Side::Long, ts(10, 0), 100.0, RATE).is_none());
    }

    #[test]
    fn close_all_empties_open_set() {
        let mut account = Account::new(100_000.0);
        open_position(
            &mut account,
            ts(9, 30),
            Side::Long,
            100.0,
            50,
            95.0,
            105.0,
            RATE,
        );
        open_position(
            &mut account,
            ts(9, 31),
            Side::Short,
            100.0,
            50,
            105.0,
            95.0,
            RATE,
        );

        let closed = close_all(&mut account, ts(14, 59), 102.0, RATE);
        assert_eq!(closed.len(), 2);
        assert_eq!(account.position_count(), 0);
        assert_eq!(account.trades.len(), 2);
    }

    #[test]
    fn close_all_on_empty_account_is_noop() {
        let mut account = Account::new(100_000.0);
        let closed = close_all(&mut account, ts(14, 59), 102.0, RATE);
        assert!(closed.is_empty());
        assert_relative_eq!(account.cash, 100_000.0);
    }

    proptest! {
        // The sizing result's full cost including commission never exceeds
        // the balance at evaluation time.
        #[test]
        fn sizing_never_exceeds_balance(
            balance in 1.0..1_000_000.0f64,
            price in 0.01..10_000.0f64,
            risk in 0.0..1.0f64,
            rate in 0.0..0.1f64,
        ) {
            let size = position_size(balance, price, risk, rate);
            prop_assert!(size >= 0);
            if size > 0 {
                prop_assert!(size as f64 * price * (1.0 + rate) <= balance);
            }
        }
    }
}
