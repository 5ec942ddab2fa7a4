//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use crate::adapters::csv_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::chart_svg::Histogram;
use crate::adapters::typst_report::{TypstReportAdapter, DEFAULT_HISTOGRAM_BINS};
use crate::domain::analysis::Analysis;
use crate::domain::error::TradeLensError;
use crate::domain::filter::FilterCriteria;
use crate::domain::ledger::Ledger;
use crate::domain::metrics::{self, DailySummary, EquityPoint, Summary};
use crate::domain::selection::{validate_report_config, FilterSelection, MAX_HISTOGRAM_BINS};
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port;
use crate::ports::report_port::ReportPort;

const DEFAULT_LEDGER_PATH: &str = "trades_log.csv";
const DEFAULT_REPORT_PATH: &str = "report.typ";

#[derive(Parser, Debug)]
#[command(name = "tradelens", about = "Analytics over a historical trade log")]
pub struct Cli {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Trade log CSV (default: [ledger] path, then trades_log.csv)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// First entry date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub start: Option<NaiveDate>,
    /// Last exit date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub end: Option<NaiveDate>,
    /// Side to include; repeat for several
    #[arg(long = "side", global = true)]
    pub sides: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Headline figures: trades, net PnL, win rate, max drawdown
    Summary,
    /// PnL per exit date and the winning days
    Daily,
    /// Trade journal, most recent entry first (CSV)
    Trades,
    /// Cumulative equity curve (CSV)
    Equity,
    /// Binned distribution of PnL or duration
    Histogram {
        #[arg(long, value_enum, default_value_t = HistogramKind::Pnl)]
        kind: HistogramKind,
        /// Number of bins (default: [report] histogram_bins, then 30)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=MAX_HISTOGRAM_BINS as i64))]
        bins: Option<u16>,
    },
    /// Ledger size, default date range and sides
    Info,
    /// Write a Typst report
    Report {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HistogramKind {
    Pnl,
    Duration,
}

/// Loaded configuration, ledger and the resolved filter for one run.
pub struct Session {
    pub config: FileConfigAdapter,
    pub ledger: Ledger,
    pub criteria: FilterCriteria,
}

impl Session {
    pub fn analysis(&self) -> Analysis {
        Analysis::compute(&self.ledger, &self.criteria)
    }
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let session = match open_session(&cli.selection) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&cli.command, &session, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, TradeLensError> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
    }
}

pub fn resolve_ledger_path(args: &SelectionArgs, config: &dyn ConfigPort) -> PathBuf {
    args.ledger
        .clone()
        .or_else(|| {
            config
                .get_string("ledger", "path")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH))
}

pub fn open_session(args: &SelectionArgs) -> Result<Session, TradeLensError> {
    let config = load_config(args.config.as_ref())?;
    validate_report_config(&config)?;

    let selection =
        FilterSelection::from_config(&config)?.with_overrides(args.start, args.end, &args.sides);

    let path = resolve_ledger_path(args, &config);
    let ledger = ledger_port::load(&CsvLedgerAdapter::new(path))?;
    let criteria = selection.resolve(&ledger);
    tracing::info!(
        start = %criteria.start_date,
        end = %criteria.end_date,
        sides = criteria.sides.len(),
        "filter resolved"
    );

    Ok(Session {
        config,
        ledger,
        criteria,
    })
}

pub fn execute(command: &Command, session: &Session, out: &mut dyn Write) -> Result<(), TradeLensError> {
    match command {
        Command::Summary => {
            let view = session.criteria.apply(&session.ledger);
            write_summary(out, &metrics::summary(&view))
        }
        Command::Daily => {
            let view = session.criteria.apply(&session.ledger);
            write_daily(out, &metrics::daily_summary(&view))
        }
        Command::Trades => {
            let view = session.criteria.apply(&session.ledger);
            write_trades(out, &view.journal())
        }
        Command::Equity => {
            let view = session.criteria.apply(&session.ledger);
            write_equity(out, &metrics::equity_curve(&view))
        }
        Command::Histogram { kind, bins } => {
            let view = session.criteria.apply(&session.ledger);
            let values = match kind {
                HistogramKind::Pnl => metrics::pnl_histogram_data(&view),
                HistogramKind::Duration => metrics::duration_histogram_data(&view),
            };
            let bins = bins
                .map(usize::from)
                .unwrap_or_else(|| configured_bins(&session.config));
            write_histogram(out, &Histogram::from_values(&values, bins))
        }
        Command::Info => write_info(out, &session.ledger),
        Command::Report { output, template } => {
            let output = output
                .clone()
                .or_else(|| session.config.get_string("report", "output").map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
            let template = template.clone().or_else(|| {
                session
                    .config
                    .get_string("report", "template_path")
                    .map(PathBuf::from)
            });
            write_report(session, &output, template.as_deref())?;
            writeln!(out, "Report written to: {}", output.display())?;
            Ok(())
        }
    }
}

fn configured_bins(config: &dyn ConfigPort) -> usize {
    let bins = config.get_int("report", "histogram_bins", DEFAULT_HISTOGRAM_BINS as i64);
    usize::try_from(bins)
        .unwrap_or(DEFAULT_HISTOGRAM_BINS)
        .clamp(1, MAX_HISTOGRAM_BINS)
}

pub fn write_report(
    session: &Session,
    output: &Path,
    template: Option<&Path>,
) -> Result<(), TradeLensError> {
    let mut adapter = TypstReportAdapter::new().with_histogram_bins(configured_bins(&session.config));
    if let Some(title) = session.config.get_string("report", "title") {
        adapter = adapter.with_title(title);
    }
    if let Some(path) = template {
        adapter = adapter.with_template_file(path)?;
    }
    adapter.write(&session.analysis(), output)
}

pub fn write_summary(out: &mut dyn Write, summary: &Summary) -> Result<(), TradeLensError> {
    writeln!(out, "Total trades:     {}", summary.total_trades)?;
    writeln!(out, "Net PnL (USD):    {:.2}", summary.net_pnl)?;
    writeln!(out, "Win rate:         {:.1}%", summary.win_rate)?;
    writeln!(out, "Max drawdown:     {:.2} USD", summary.max_drawdown)?;
    Ok(())
}

pub fn write_daily(out: &mut dyn Write, daily: &DailySummary) -> Result<(), TradeLensError> {
    writeln!(out, "=== Daily PnL ===")?;
    for (date, pnl) in &daily.daily_pnl {
        writeln!(out, "{}  {:>12.2}", date, pnl)?;
    }
    writeln!(out, "\n=== Winning Days: {} ===", daily.winning_day_count())?;
    for (date, pnl) in daily.winning_days_desc() {
        writeln!(out, "{}  {:>12.2}", date, pnl)?;
    }
    Ok(())
}

pub fn write_trades(out: &mut dyn Write, trades: &[&Trade]) -> Result<(), TradeLensError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "entry_time",
        "exit_time",
        "side",
        "entry_price",
        "exit_price",
        "size",
        "pnl",
    ])
    .map_err(csv_error)?;
    for trade in trades {
        wtr.write_record([
            trade.entry_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            trade.exit_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            trade.side.to_string(),
            trade.entry_price.to_string(),
            trade.exit_price.to_string(),
            trade.size.to_string(),
            trade.pnl.to_string(),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_equity(out: &mut dyn Write, curve: &[EquityPoint]) -> Result<(), TradeLensError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["time", "cumulative_pnl", "drawdown"])
        .map_err(csv_error)?;
    for point in curve {
        wtr.write_record([
            point.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", point.cumulative_pnl),
            format!("{:.2}", point.drawdown),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_histogram(out: &mut dyn Write, hist: &Histogram) -> Result<(), TradeLensError> {
    if hist.is_empty() {
        writeln!(out, "No data in the selection.")?;
        return Ok(());
    }
    for (i, count) in hist.counts.iter().enumerate() {
        writeln!(
            out,
            "[{:>12.2}, {:>12.2}{}  {}",
            hist.edges[i],
            hist.edges[i + 1],
            if i + 1 == hist.counts.len() { "]" } else { ")" },
            count
        )?;
    }
    Ok(())
}

pub fn write_info(out: &mut dyn Write, ledger: &Ledger) -> Result<(), TradeLensError> {
    writeln!(out, "Trades: {}", ledger.len())?;
    match ledger.default_date_range() {
        Some((start, end)) => writeln!(out, "Range:  {} to {}", start, end)?,
        None => writeln!(out, "Range:  (empty ledger)")?,
    }
    let sides: Vec<&str> = ledger.sides().iter().map(|s| s.as_str()).collect();
    writeln!(out, "Sides:  {}", sides.join(", "))?;
    Ok(())
}

fn csv_error(e: csv::Error) -> TradeLensError {
    TradeLensError::Io(io::Error::other(e))
}
