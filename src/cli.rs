//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    self as backtest_engine, EngineConfig, DEFAULT_COMMISSION_RATE, DEFAULT_MAX_TRADE_RISK,
    DEFAULT_WINDOW_SIZE,
};
use crate::domain::config_validation::{parse_time, validate_engine_config};
use crate::domain::error::BandtraderError;
use crate::domain::report::Report;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Intraday band mean-reversion backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the trade ledger to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the bar count and time range of the configured data file
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BandtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, BandtraderError> {
    Ok(EngineConfig {
        window_size: adapter.get_int("backtest", "window_size", DEFAULT_WINDOW_SIZE as i64)
            as usize,
        session_start: parse_time(adapter, "session_start")?,
        session_end: parse_time(adapter, "session_end")?,
        initial_balance: adapter.get_double("backtest", "initial_balance", 0.0),
        commission_rate: adapter.get_double("backtest", "commission_rate", DEFAULT_COMMISSION_RATE),
        max_trade_risk: adapter.get_double("backtest", "max_trade_risk", DEFAULT_MAX_TRADE_RISK),
    })
}

fn bars_csv_path(adapter: &dyn ConfigPort) -> Result<PathBuf, BandtraderError> {
    adapter
        .get_string("data", "bars_csv")
        .map(PathBuf::from)
        .ok_or_else(|| BandtraderError::ConfigMissing {
            section: "data".into(),
            key: "bars_csv".into(),
        })
}

fn run_backtest(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let engine_config = match build_engine_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Fetch bars
    let data_path = match bars_csv_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Loading bars from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path);
    let bars = match data_port.fetch_bars() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if bars.is_empty() {
        let err = BandtraderError::InsufficientData {
            bars: 0,
            minimum: 1,
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    // Stage 3: Run the simulation
    eprintln!(
        "Running backtest: {} bars, {} to {}",
        bars.len(),
        bars[0].timestamp,
        bars[bars.len() - 1].timestamp,
    );

    let result = match backtest_engine::run_backtest(&bars, &engine_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Print console summary to stderr
    for (date, reason) in &result.skipped_sessions {
        eprintln!("warning: skipped session {} ({})", date, reason);
    }

    eprintln!("\n=== Session Balances ===");
    for (date, balance) in &result.session_balances {
        eprintln!("  {}: {:.2}", date, balance);
    }

    eprintln!("\n=== Aggregate Results ===");
    match Report::compute(&result.account.trades, result.account.cash) {
        Report::NoTrades { final_balance } => {
            eprintln!("No trades executed");
            eprintln!("Final Balance:    {:.2}", final_balance);
        }
        Report::Summary(summary) => {
            eprintln!("Final Balance:    {:.2}", summary.final_balance);
            eprintln!("Total P&L:        {:.2}", summary.total_pnl);
            eprintln!("Max Drawdown:     {:.2}", summary.max_drawdown);
            eprintln!("Total Trades:     {}", summary.total_trades);
            eprintln!("Trades Won:       {}", summary.trades_won);
            eprintln!("Win Rate:         {:.1}%", summary.win_rate_pct);
            eprintln!("Risk-Adj Ratio:   {:.2}", summary.risk_adjusted_ratio);
            eprintln!("Commission Paid:  {:.2}", result.account.commission_paid);
        }
    }

    // Stage 5: Write the trade ledger
    if let Some(output) = output_path {
        let report_port = CsvReportAdapter::new();
        let output_str = output.display().to_string();
        match report_port.write(&result.account.trades, &output_str) {
            Ok(()) => eprintln!("\nTrade log written to: {}", output_str),
            Err(e) => {
                eprintln!("error: failed to write trade log: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let engine_config = match build_engine_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nEngine parameters:");
    eprintln!("  window_size:     {}", engine_config.window_size);
    eprintln!(
        "  session window:  {} to {}",
        engine_config.session_start, engine_config.session_end
    );
    eprintln!("  initial_balance: {:.2}", engine_config.initial_balance);
    eprintln!("  commission_rate: {}", engine_config.commission_rate);
    eprintln!("  max_trade_risk:  {}", engine_config.max_trade_risk);

    match bars_csv_path(&adapter) {
        Ok(path) => eprintln!("  bars_csv:        {}", path.display()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match bars_csv_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(data_path.clone());
    match data_port.data_range() {
        Ok(Some((first, last, count))) => {
            println!(
                "{}: {} bars, {} to {}",
                data_path.display(),
                count,
                first,
                last
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", data_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
