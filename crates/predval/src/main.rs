use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use predval_core::run_validation;
use predval_parser::{read_table, ParserError, RawTable, SourceKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Validate a forecasting model's predictions against actual values over rolling time windows",
    long_about = None
)]
struct Cli {
    /// The actual values file
    actuals_file: PathBuf,
    /// The predicted values file
    predicts_file: PathBuf,
    /// The window size file
    window_file: PathBuf,
    /// The output file
    output_file: PathBuf,
    /// Print progress output (ignored when RUST_LOG is set)
    #[arg(long)]
    verbose: bool,
    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    run(&cli)
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let started = Instant::now();

    let actual = load_table(SourceKind::Actual, &cli.actuals_file)?;
    let predicted = load_table(SourceKind::Predicted, &cli.predicts_file)?;
    let window_contents =
        fs::read_to_string(&cli.window_file).with_context(|| read_failure(&cli.window_file))?;

    let summary = run_validation(&actual, &predicted, &window_contents, || {
        File::create(&cli.output_file).map(BufWriter::new)
    })
    .map_err(|err| {
        let message = if err.is_configuration() {
            format!(
                "{} must contain a single positive integer on line one.",
                cli.window_file.display()
            )
        } else {
            write_failure(&cli.output_file)
        };
        anyhow::Error::new(err).context(message)
    })?;

    for (kind, stats) in [
        (SourceKind::Actual, summary.actual_stats),
        (SourceKind::Predicted, summary.predicted_stats),
    ] {
        if stats.dropped() > 0 {
            info!(
                table = %kind,
                dropped = stats.dropped(),
                kept = stats.kept(),
                "Skipped malformed or duplicate rows"
            );
        }
    }

    info!(
        windows = summary.windows_written,
        output = %cli.output_file.display(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Total time elapsed"
    );

    Ok(())
}

fn load_table(kind: SourceKind, path: &Path) -> Result<RawTable> {
    let file = File::open(path).with_context(|| read_failure(path))?;

    read_table(kind, file).map_err(|err| {
        let message = match &err {
            ParserError::EmptyData { .. } => format!(
                "Could not parse data from file {}. Please ensure it holds time|entity|value lines.",
                path.display()
            ),
            ParserError::Csv { .. } => read_failure(path),
        };
        anyhow::Error::new(err).context(message)
    })
}

fn read_failure(path: &Path) -> String {
    format!(
        "Could not read file {}. Please ensure it exists and can be read.",
        path.display()
    )
}

fn write_failure(path: &Path) -> String {
    format!(
        "Could not write results to file {}. Please make sure this directory exists and can be written to.",
        path.display()
    )
}
