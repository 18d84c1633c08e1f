//! StockDash CLI: KPI summary, indicator tables, dashboard view export.
//!
//! Commands:
//! - `summary`: KPI cards for a CSV and optional date range
//! - `indicators`: augmented rows as a table, CSV or JSON
//! - `dashboard`: full dashboard view model as JSON, from a TOML config
//! - `sample`: write a deterministic synthetic CSV

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stockdash_core::data::{synthetic_series, CsvOptions};
use stockdash_core::export::{rows_to_json, write_bars_csv, write_rows_csv};
use stockdash_core::{
    Column, DashboardConfig, DashboardView, DateRange, DisplayToggles, IndicatorPipeline,
    IndicatorRow, Kpis, PipelineParams, PriceSeries, SeriesCache,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockdash", about = "StockDash CLI: OHLCV indicators and dashboard data")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print KPI cards: current price, change, high, low, total volume.
    Summary {
        /// Path to the OHLCV CSV file.
        #[arg(long)]
        csv: PathBuf,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,
    },
    /// Print the series augmented with indicator columns.
    Indicators {
        /// Path to the OHLCV CSV file.
        #[arg(long)]
        csv: PathBuf,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,

        /// Only the last N rows.
        #[arg(long)]
        tail: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Hide the fast SMA column.
        #[arg(long, default_value_t = false)]
        no_sma_fast: bool,

        /// Hide the slow SMA column.
        #[arg(long, default_value_t = false)]
        no_sma_slow: bool,

        /// Hide the RSI column.
        #[arg(long, default_value_t = false)]
        no_rsi: bool,

        /// Hide the Bollinger columns (STD, Upper, Lower).
        #[arg(long, default_value_t = false)]
        no_bollinger: bool,
    },
    /// Build the full dashboard view model and print it as JSON.
    Dashboard {
        /// Path to a TOML dashboard config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV path (overrides `[data] csv` in the config).
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Pretty-print the JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Write a deterministic synthetic OHLCV CSV.
    Sample {
        /// Output path.
        #[arg(long)]
        out: PathBuf,

        /// Number of weekday bars.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// Seed label; the same label always yields the same data.
        #[arg(long, default_value = "SAMPLE")]
        seed: String,

        /// First date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-01")]
        start: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Summary { csv, start, end } => run_summary(&csv, start, end),
        Commands::Indicators {
            csv,
            start,
            end,
            tail,
            format,
            no_sma_fast,
            no_sma_slow,
            no_rsi,
            no_bollinger,
        } => {
            let toggles = DisplayToggles {
                show_sma_fast: !no_sma_fast,
                show_sma_slow: !no_sma_slow,
                show_rsi: !no_rsi,
                show_bollinger: !no_bollinger,
            };
            run_indicators(&csv, start, end, tail, format, toggles)
        }
        Commands::Dashboard {
            config,
            csv,
            pretty,
        } => run_dashboard(config, csv, pretty),
        Commands::Sample {
            out,
            bars,
            seed,
            start,
        } => run_sample(&out, bars, &seed, start),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn parse_date(s: Option<String>, flag: &str) -> Result<Option<NaiveDate>> {
    s.as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("--{flag} must be YYYY-MM-DD"))
}

fn parse_range(start: Option<String>, end: Option<String>) -> Result<DateRange> {
    Ok(DateRange::new(
        parse_date(start, "start")?,
        parse_date(end, "end")?,
    )?)
}

fn load_filtered(csv: &Path, range: &DateRange) -> Result<PriceSeries> {
    let series = SeriesCache::global()
        .get_or_load(csv)
        .with_context(|| format!("loading {}", csv.display()))?;
    let filtered = series.filter(range);
    if filtered.is_empty() {
        bail!("no bars in the selected date range");
    }
    Ok(filtered)
}

fn run_summary(csv: &Path, start: Option<String>, end: Option<String>) -> Result<()> {
    let range = parse_range(start, end)?;
    let series = load_filtered(csv, &range)?;
    let kpis = Kpis::from_series(&series)?;
    print_kpis(&series, &kpis);
    Ok(())
}

fn run_indicators(
    csv: &Path,
    start: Option<String>,
    end: Option<String>,
    tail: Option<usize>,
    format: OutputFormat,
    toggles: DisplayToggles,
) -> Result<()> {
    let range = parse_range(start, end)?;
    let series = load_filtered(csv, &range)?;

    let frame = IndicatorPipeline::new(PipelineParams::default())?.run(&series);
    let params = frame.params();
    let rows = match tail {
        Some(n) => frame.tail_rows(n),
        None => frame.rows(),
    };
    let columns = toggles.visible_columns();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => print_table(&mut out, &rows, &columns, params)?,
        OutputFormat::Csv => write_rows_csv(&rows, &columns, params, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &rows_to_json(&rows, &columns, params))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_dashboard(config_path: Option<PathBuf>, csv: Option<PathBuf>, pretty: bool) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if csv.is_some() {
        config.data.csv = csv;
    }
    let Some(csv_path) = config.data.csv.clone() else {
        bail!("no CSV given: pass --csv or set [data] csv in the config");
    };

    let cache = SeriesCache::new(config.data.csv_options());
    let series = cache
        .get_or_load(&csv_path)
        .with_context(|| format!("loading {}", csv_path.display()))?;
    let view = DashboardView::build(&series, &config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, &view)?;
    } else {
        serde_json::to_writer(&mut out, &view)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run_sample(out: &Path, bars: usize, seed: &str, start: String) -> Result<()> {
    let start = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
        .context("--start must be YYYY-MM-DD")?;
    let series = synthetic_series(seed, start, bars)?;

    let file = std::fs::File::create(out)
        .with_context(|| format!("creating {}", out.display()))?;
    write_bars_csv(&series, file)?;

    info!(path = %out.display(), bars = series.len(), seed, "wrote synthetic sample");
    // the written file must load back
    stockdash_core::data::load_csv(out, &CsvOptions::default())
        .context("synthetic sample failed to reload")?;
    Ok(())
}

fn print_kpis(series: &PriceSeries, kpis: &Kpis) {
    let (first, last) = series
        .date_bounds()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .unwrap_or_default();

    println!();
    println!("=== Market Summary ===");
    println!("Period:         {first} to {last} ({} bars)", series.len());
    println!();
    println!(
        "Current Price:  ${:.2} ({:+.2}%)",
        kpis.current_price, kpis.change_pct
    );
    println!("Change:         {:+.2}", kpis.change);
    println!("Highest Price:  ${:.2}", kpis.highest_price);
    println!("Lowest Price:   ${:.2}", kpis.lowest_price);
    println!("Total Volume:   {}", group_thousands(kpis.total_volume));
    println!();
}

fn print_table<W: Write>(
    out: &mut W,
    rows: &[IndicatorRow],
    columns: &[Column],
    params: &PipelineParams,
) -> io::Result<()> {
    write!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    )?;
    for column in columns {
        write!(out, " {:>10}", column.label(params))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(65 + 11 * columns.len()))?;

    for row in rows {
        write!(
            out,
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            row.date.to_string(),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume
        )?;
        for &column in columns {
            let cell = match (column, row.get(column)) {
                (_, None) => "-".to_string(),
                (Column::Returns, Some(v)) => format!("{:.2}%", v * 100.0),
                (_, Some(v)) => format!("{v:.2}"),
            };
            write!(out, " {cell:>10}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
