//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::holiday_calendar::HolidayCalendar;
use crate::domain::config_validation::{
    read_date_range, read_evaluation_config, read_holidays, validate_run_config,
};
use crate::domain::error::BreakscanError;
use crate::domain::evaluation::{evaluate, Evaluation, EvaluationConfig, EvaluationReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TRADES_OUTPUT: &str = "trades.csv";
const DEFAULT_SERIES_OUTPUT: &str = "series.csv";

#[derive(Parser, Debug)]
#[command(
    name = "breakscan",
    about = "Volume breakout and SMA crossover strategy evaluator"
)]
pub struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate every configured strategy and write the trade log
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Write the per-date indicator and signal series
    Series {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols with a price file in the data directory
    ListSymbols {
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

/// Everything a single-symbol run needs, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub symbol: String,
    pub data_dir: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub evaluation: EvaluationConfig,
    pub calendar: HolidayCalendar,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);
    match cli.command {
        Command::Run {
            config,
            symbol,
            data_dir,
            output,
        } => run_evaluate(&config, symbol.as_deref(), data_dir, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Series {
            config,
            symbol,
            data_dir,
            output,
        } => run_series(&config, symbol.as_deref(), data_dir, output.as_ref()),
        Command::ListSymbols { data_dir } => run_list_symbols(data_dir),
    }
}

/// Diagnostics go to stderr; repeated calls keep the first subscriber.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BreakscanError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    symbol_override
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| config.get_trimmed("data", "symbol"))
        .map(|s| s.to_uppercase())
}

pub fn build_run_settings(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> Result<RunSettings, BreakscanError> {
    validate_run_config(config)?;

    let symbol = resolve_symbol(symbol_override, config)
        .ok_or_else(|| BreakscanError::missing("data", "symbol"))?;
    let data_dir = data_dir_override
        .or_else(|| config.get_trimmed("data", "data_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let (start_date, end_date) = read_date_range(config)?;

    Ok(RunSettings {
        symbol,
        data_dir,
        start_date,
        end_date,
        evaluation: read_evaluation_config(config)?,
        calendar: HolidayCalendar::new(read_holidays(config)?),
    })
}

/// Fetches the symbol's bars and evaluates them. An empty series is reported
/// as [`BreakscanError::NoData`].
pub fn evaluate_symbol(
    data_port: &dyn DataPort,
    settings: &RunSettings,
) -> Result<EvaluationReport, BreakscanError> {
    let bars = data_port.fetch_bars(&settings.symbol, settings.start_date, settings.end_date)?;
    debug!(symbol = %settings.symbol, bars = bars.len(), "bars fetched");
    match evaluate(
        &settings.symbol,
        bars,
        &settings.evaluation,
        &settings.calendar,
    )? {
        Evaluation::Completed(report) => Ok(report),
        Evaluation::NoData { symbol } => Err(BreakscanError::NoData { symbol }),
    }
}

/// `<dir>/<stem>_metrics.csv` next to the trade log.
pub fn metrics_path(trades_path: &Path) -> PathBuf {
    let stem = trades_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trades".to_string());
    trades_path.with_file_name(format!("{}_metrics.csv", stem))
}

fn prepare(
    config_path: &Path,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> Result<(FileConfigAdapter, RunSettings), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let settings =
        build_run_settings(&adapter, symbol_override, data_dir_override).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?;
    Ok((adapter, settings))
}

fn evaluate_from_csv(settings: &RunSettings) -> Result<EvaluationReport, ExitCode> {
    eprintln!(
        "Evaluating {} from {} ({} strategies)",
        settings.symbol,
        settings.data_dir.display(),
        settings.evaluation.strategies.len()
    );
    let data_port = CsvAdapter::new(settings.data_dir.clone());
    evaluate_symbol(&data_port, settings).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_evaluate(
    config_path: &Path,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, settings) = match prepare(config_path, symbol_override, data_dir_override) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let report = match evaluate_from_csv(&settings) {
        Ok(r) => r,
        Err(code) => return code,
    };

    print_summary(&report);

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_trimmed("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRADES_OUTPUT));
    let metrics_output = metrics_path(&output);

    match write_reports(&CsvReportAdapter, &report, &output, &metrics_output) {
        Ok(()) => {
            eprintln!("\nTrades written to: {}", output.display());
            eprintln!("Metrics written to: {}", metrics_output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

pub fn write_reports(
    report_port: &dyn ReportPort,
    report: &EvaluationReport,
    trades_path: &Path,
    metrics_path: &Path,
) -> Result<(), BreakscanError> {
    report_port.write_trades(report, &trades_path.to_string_lossy())?;
    report_port.write_metrics(report, &metrics_path.to_string_lossy())
}

fn print_summary(report: &EvaluationReport) {
    let data = &report.data;
    if let (Some(first), Some(last)) = (data.first_date(), data.last_date()) {
        eprintln!("  {} bars, {} to {}", data.bar_count(), first, last);
    }

    if let Some(outcome) = &report.classifier {
        eprintln!("\n=== Classifier ===");
        eprintln!("Training rows:    {}", outcome.training_rows);
        eprintln!("Breakout labels:  {}", outcome.positive_labels);
        eprintln!("Predicted dates:  {}", outcome.signals.len());
        if let Some(accuracy) = outcome.holdout_accuracy {
            eprintln!("Holdout accuracy: {:.1}%", accuracy * 100.0);
        }
    }

    eprintln!("\n=== Strategy Results ===");
    for strategy in &report.strategies {
        let m = &strategy.metrics;
        eprintln!("{} ({})", strategy.spec.name, strategy.spec.exit_policy);
        eprintln!(
            "  Signals: {}  Trades: {}  Closed: {}",
            strategy.signals.len(),
            m.total_trades,
            m.closed_trades
        );
        eprintln!(
            "  Win Rate: {:.1}%  Avg Return: {:.2}%  Max Drawdown: {:.2}%  Sharpe: {:.2}",
            m.win_rate, m.avg_return, m.max_drawdown, m.sharpe_ratio
        );
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let evaluation = match read_evaluation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ind = &evaluation.indicators;
    eprintln!("\nIndicators:");
    eprintln!(
        "  SMA {}/{}, volume window {}{}, RSI {}, MACD {}/{}/{}",
        ind.sma_fast,
        ind.sma_slow,
        ind.volume_window,
        if ind.lagged_volume { " (lagged)" } else { "" },
        ind.rsi_period,
        ind.macd_fast,
        ind.macd_slow,
        ind.macd_signal
    );
    let b = &evaluation.breakout;
    eprintln!(
        "  Breakout: volume threshold {}% ({:?}), price change > {}%",
        b.volume_threshold_pct, b.mode, b.price_change_pct
    );

    eprintln!("\nStrategies:");
    for spec in &evaluation.strategies {
        eprintln!("  {}: {} signals, {}", spec.name, spec.signal, spec.exit_policy);
    }

    if let Some(symbol) = resolve_symbol(None, &adapter) {
        eprintln!("\nSymbol: {}", symbol);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_series(
    config_path: &Path,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let (adapter, settings) = match prepare(config_path, symbol_override, data_dir_override) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let report = match evaluate_from_csv(&settings) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_trimmed("report", "series_output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SERIES_OUTPUT));

    match CsvReportAdapter.write_series(&report, &output.to_string_lossy()) {
        Ok(()) => {
            eprintln!("Series written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write series: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(data_dir: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.clone());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No price files found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
