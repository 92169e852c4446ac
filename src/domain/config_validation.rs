//! Configuration validation.
//!
//! All configuration-level problems are fatal and reported before any
//! simulation begins; nothing here is recoverable mid-run.

use chrono::NaiveTime;

use crate::domain::error::BandtraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    validate_initial_balance(config)?;
    validate_commission_rate(config)?;
    validate_max_trade_risk(config)?;
    validate_window_size(config)?;
    validate_session_window(config)?;
    Ok(())
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "initial_balance", 0.0);
    if value <= 0.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_balance".to_string(),
            reason: "initial_balance must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "commission_rate", 0.0);
    if value < 0.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_max_trade_risk(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_double("backtest", "max_trade_risk", 0.01);
    if value <= 0.0 || value > 1.0 {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_trade_risk".to_string(),
            reason: "max_trade_risk must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_window_size(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let value = config.get_int("backtest", "window_size", 20);
    if value < 1 {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "window_size".to_string(),
            reason: "window_size must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_session_window(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    let start = parse_time(config, "session_start")?;
    let end = parse_time(config, "session_end")?;

    if start >= end {
        return Err(BandtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "session_start".to_string(),
            reason: "session_start must be before session_end".to_string(),
        });
    }
    Ok(())
}

pub fn parse_time(config: &dyn ConfigPort, key: &str) -> Result<NaiveTime, BandtraderError> {
    match config.get_string("backtest", key) {
        None => Err(BandtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
        Some(s) => NaiveTime::parse_from_str(&s, "%H:%M:%S").map_err(|_| {
            BandtraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected HH:MM:SS", key),
            }
        }),
    }
}
