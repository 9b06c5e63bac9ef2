//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{CsvSeriesAdapter, DEFAULT_DATE_FORMAT};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, run_batch, BacktestResult, BatchJob};
use crate::domain::config_validation::{build_regime_labels, build_regime_names, validate_config};
use crate::domain::error::RegimeTraderError;
use crate::domain::metrics::RegimeResult;
use crate::domain::regime::{regime_segments, RegimeLabels, RegimeNames};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SeriesPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "regimetrader", about = "Regime-driven strategy backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over one price/regime series
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the same labels over many series in parallel
    Batch {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
    /// Print contiguous regime runs of a series
    Segments {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Runs one subcommand without touching logging or exit codes.
pub fn dispatch(command: Command) -> Result<(), RegimeTraderError> {
    match command {
        Command::Backtest {
            config,
            input,
            output,
        } => run_backtest_command(&config, input.as_deref(), output.as_deref()),
        Command::Batch { config, input } => run_batch_command(&config, &input),
        Command::Segments { config, input } => run_segments_command(&config, input.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if result.is_err() {
        warn!("tracing subscriber already initialised");
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RegimeTraderError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Command-line path wins over `[input] path`.
pub fn resolve_input(
    input_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, RegimeTraderError> {
    if let Some(p) = input_override {
        return Ok(p.to_path_buf());
    }
    config
        .get_string("input", "path")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| RegimeTraderError::ConfigMissing {
            section: "input".into(),
            key: "path".into(),
        })
}

/// Command-line path wins over `[output] trades`; `None` means no report file.
pub fn resolve_output(output_override: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    output_override.map(Path::to_path_buf).or_else(|| {
        config
            .get_string("output", "trades")
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
    })
}

pub fn build_series_adapter(config: &dyn ConfigPort) -> CsvSeriesAdapter {
    let date_format = config
        .get_string("input", "date_format")
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
    CsvSeriesAdapter::new(PathBuf::from(".")).with_date_format(date_format)
}

/// Load, run, optionally persist. Returns the result for printing.
pub fn run_backtest_pipeline(
    series_port: &dyn SeriesPort,
    report_port: &dyn ReportPort,
    labels: &RegimeLabels,
    names: &RegimeNames,
    input: &Path,
    output: Option<&Path>,
) -> Result<BacktestResult, RegimeTraderError> {
    let source = input.to_string_lossy();
    let series = series_port.load_series(&source)?;
    info!(
        "Running backtest: {} steps, {} to {}",
        series.len(),
        series.first_date().map(|d| d.to_string()).unwrap_or_default(),
        series.last_date().map(|d| d.to_string()).unwrap_or_default(),
    );

    let result = run_backtest(&series, labels);

    if let Some(path) = output {
        report_port.write(&result, names, &path.to_string_lossy())?;
    }

    Ok(result)
}

pub fn format_summary(result: &BacktestResult, names: &RegimeNames) -> String {
    let m = &result.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "=== Results ===");
    let _ = writeln!(out, "Total Return:          {:.2}%", m.total_return * 100.0);
    let _ = writeln!(out, "Average Trade Return:  {:.2}%", m.average_trade_return * 100.0);
    let _ = writeln!(out, "Win Rate:              {:.1}%", m.win_rate * 100.0);
    let _ = writeln!(out, "Sharpe Ratio:          {:.2}", m.sharpe_ratio);
    let _ = writeln!(out, "Max Drawdown:          {:.2}%", m.max_drawdown * 100.0);
    let _ = writeln!(out, "Accuracy:              {:.1}%", m.accuracy * 100.0);
    let _ = writeln!(out, "Number of Trades:      {}", m.trade_count);

    let per_regime = RegimeResult::compute_per_regime(&result.ledger);
    if !per_regime.is_empty() {
        let _ = writeln!(out, "\n=== Per-Regime Summary ===");
        for r in &per_regime {
            let _ = writeln!(
                out,
                "  {}:  {} trades, {:.1}% win rate, {:+.2}% compounded",
                names.name(r.regime),
                r.trade_count,
                r.win_rate * 100.0,
                r.total_return * 100.0,
            );
        }
    }
    out
}

fn run_backtest_command(
    config_path: &Path,
    input_override: Option<&Path>,
    output_override: Option<&Path>,
) -> Result<(), RegimeTraderError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;

    let labels = build_regime_labels(&config)?;
    let names = build_regime_names(&config)?;
    let input = resolve_input(input_override, &config)?;
    let output = resolve_output(output_override, &config);
    let adapter = build_series_adapter(&config);

    let result = run_backtest_pipeline(
        &adapter,
        &CsvReportAdapter,
        &labels,
        &names,
        &input,
        output.as_deref(),
    )?;

    if result.ledger.is_empty() {
        warn!("No trades were closed; metrics are all zero");
    }
    print!("{}", format_summary(&result, &names));
    Ok(())
}

fn run_batch_command(config_path: &Path, inputs: &[PathBuf]) -> Result<(), RegimeTraderError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let labels = build_regime_labels(&config)?;
    let adapter = build_series_adapter(&config);

    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.to_string_lossy().into_owned();
        let series = adapter.load_series(&name)?;
        jobs.push(BatchJob {
            name,
            series,
            labels,
        });
    }

    for outcome in run_batch(&jobs) {
        let m = &outcome.result.metrics;
        println!(
            "{}: {} trades, total {:+.2}%, win rate {:.1}%, sharpe {:.2}, \
             max dd {:.2}%, accuracy {:.1}%",
            outcome.name,
            m.trade_count,
            m.total_return * 100.0,
            m.win_rate * 100.0,
            m.sharpe_ratio,
            m.max_drawdown * 100.0,
            m.accuracy * 100.0,
        );
    }
    Ok(())
}

fn run_segments_command(
    config_path: &Path,
    input_override: Option<&Path>,
) -> Result<(), RegimeTraderError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let names = build_regime_names(&config)?;
    let input = resolve_input(input_override, &config)?;
    let series = build_series_adapter(&config).load_series(&input.to_string_lossy())?;

    let segments = regime_segments(&series);
    for seg in &segments {
        println!(
            "{} to {}  {:>5} steps  {}",
            seg.start_date,
            seg.end_date,
            seg.len(),
            names.name(seg.regime)
        );
    }
    info!("{} segments over {} steps", segments.len(), series.len());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), RegimeTraderError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let labels = build_regime_labels(&config)?;
    let names = build_regime_names(&config)?;

    println!("Labels:");
    println!("  bull: {} ({})", labels.bull, names.name(labels.bull));
    println!("  bear: {} ({})", labels.bear, names.name(labels.bear));
    println!("  side: {} ({})", labels.side, names.name(labels.side));
    println!("Configuration is valid.");
    Ok(())
}
