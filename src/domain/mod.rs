//! Core domain types and logic.

pub mod bar;
pub mod bands;
pub mod position;
pub mod account;
pub mod execution;
pub mod signal;
pub mod session;
pub mod report;
pub mod backtest;
pub mod config_validation;
pub mod error;
