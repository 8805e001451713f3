//! # aegis
//!
//! Command-line interface for forensic award scoring and replay.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use forensic::{
    expected_distribution, file_source, AwardSource, DetectorKind, DigitProfiler, DisplayFrame,
    ForensicConfig, ForensicConfigBuilder, ForensicEngine, Monitor, Session,
    BENFORD_CHI_SQ_CRITICAL,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "aegis")]
#[command(about = "Forensic outlier and Benford scoring of award records", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Overrides {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Expected share of outliers, in (0, 0.5]
    #[arg(long, global = true)]
    contamination: Option<f64>,

    /// Detector seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Detector (isolation_forest, robust_zscore)
    #[arg(long, global = true)]
    detector: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a batch of awards with outlier flags and leading digits
    Annotate {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare the leading-digit distribution with Benford's Law
    Benford {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Replay the batch as a live feed
    Replay {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of ticks to run (defaults to one pass over the batch)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Delay between ticks in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Write the anomaly ledger as CSV when the replay ends
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print each frame as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(overrides: &Overrides) -> CliResult<ForensicConfig> {
    let base = match &overrides.config {
        Some(path) => ForensicConfig::from_json_file(path)?,
        None => ForensicConfig::default(),
    };

    let mut builder = ForensicConfigBuilder::from_config(base);
    if let Some(rate) = overrides.contamination {
        builder = builder.contamination_rate(rate);
    }
    if let Some(seed) = overrides.seed {
        builder = builder.seed(seed);
    }
    if let Some(name) = &overrides.detector {
        builder = builder.detector(name.parse::<DetectorKind>()?);
    }
    Ok(builder.build()?)
}

fn run_annotate(config: &ForensicConfig, input: PathBuf, output: Option<PathBuf>) -> CliResult<()> {
    let source = file_source(&input);
    let awards = source.fetch()?;
    let engine = ForensicEngine::new(config.detector.clone())?;
    let annotated = engine.annotate(&awards);

    let json = serde_json::to_string_pretty(annotated.transactions())?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "{} records, {} flagged, written to {:?}",
                annotated.len(),
                annotated.outlier_count(),
                path
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_benford(config: &ForensicConfig, input: PathBuf) -> CliResult<()> {
    let awards = file_source(&input).fetch()?;
    let annotated = ForensicEngine::new(config.detector.clone())?.annotate(&awards);

    let profiler = DigitProfiler::from_digits(annotated.iter().map(|t| t.leading_digit));
    let expected = expected_distribution();
    let observed = profiler.distribution();

    println!(
        "Leading digits of {} awards ({} without a digit)",
        profiler.len(),
        profiler.zero_count()
    );
    println!("{:>5} {:>10} {:>10} {:>8}", "digit", "observed", "expected", "count");
    for ((digit, obs), count) in observed.iter().zip(profiler.counts()) {
        println!("{:>5} {:>10.4} {:>10.4} {:>8}", digit, obs, expected.get(digit), count);
    }

    let chi_squared = profiler.chi_squared(&expected);
    println!();
    println!("chi-squared: {:.3} (critical {:.3})", chi_squared, BENFORD_CHI_SQ_CRITICAL);
    println!("MAD:         {:.5}", profiler.mean_absolute_deviation(&expected));
    println!(
        "verdict:     {}",
        if profiler.conforms(&expected) { "conforms" } else { "deviates" }
    );
    Ok(())
}

fn print_frame(frame: &DisplayFrame) {
    if frame.is_empty() {
        println!("[{}] no data available", frame.clock);
        return;
    }
    let latest = frame.feed.last().map(|e| (e.status.label(), e.name.as_str()));
    let (status, name) = latest.unwrap_or(("", ""));
    println!(
        "[{}] tick {:>5} | {:<9} {:<35} | analyzed {:>20} | ledger {:>4} | chi2 {:>8.3}",
        frame.clock,
        frame.tick,
        status,
        name,
        frame.capital_display,
        frame.ledger_count,
        frame.benford_chi_squared
    );
}

fn run_replay(
    config: &ForensicConfig,
    input: PathBuf,
    ticks: Option<u64>,
    interval_ms: Option<u64>,
    export: Option<PathBuf>,
    json: bool,
) -> CliResult<()> {
    let source = file_source(&input);
    let session = Arc::new(Session::from_source(source.as_ref(), config)?);
    let ticks = ticks.unwrap_or(session.batch().len().max(1) as u64);
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.replay.interval_ms));

    tracing::info!(
        detector = config.detector.kind.name(),
        records = session.batch().len(),
        outliers = session.batch().outlier_count(),
        ticks,
        "replay starting"
    );

    let mut monitor = Monitor::new(session);
    let stdout = std::io::stdout();
    for i in 0..ticks {
        if i > 0 && !interval.is_zero() {
            thread::sleep(interval);
        }
        let frame = monitor.tick(Utc::now());
        if json {
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, frame)?;
            writeln!(out)?;
        } else {
            print_frame(frame);
        }
    }

    if let Some(path) = export {
        let ledger = &monitor.state().ledger;
        let mut writer = BufWriter::new(File::create(&path)?);
        ledger.write_csv(&mut writer)?;
        writer.flush()?;
        println!("{} ledger entries exported to {:?}", ledger.count(), path);
    }
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forensic_core=info,aegis=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.overrides)?;

    match cli.command {
        Commands::Annotate { input, output } => run_annotate(&config, input, output),
        Commands::Benford { input } => run_benford(&config, input),
        Commands::Replay {
            input,
            ticks,
            interval_ms,
            export,
            json,
        } => run_replay(&config, input, ticks, interval_ms, export, json),
    }
}
