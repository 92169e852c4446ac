//! Domain error types.

use crate::domain::position::Side;

/// Top-level error type for bandtrader.
///
/// Recoverable conditions (an entry refused for insufficient funds, a
/// malformed session skipped mid-run, an empty trade ledger) are modeled as
/// ordinary return values, not errors; everything here either aborts the run
/// or fails a command before the run starts.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("no open {side} position to close")]
    NoHoldings { side: Side },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::Data { .. } | BandtraderError::InsufficientData { .. } => 3,
            BandtraderError::NoHoldings { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
