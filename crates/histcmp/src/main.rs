//! histcmp: sanity checks for cross-section histogram files
//!
//! Main entry point for the command-line tool.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use hc_compare::{DEFAULT_TOLERANCE, SummaryPolicy};
use tracing::error;

/// Exit code for unreadable input and bad arguments. Codes 0-5 belong to
/// the comparison outcome.
pub const INPUT_ERROR_CODE: u8 = 6;

/// Histogram file comparison and bookkeeping
#[derive(Parser, Debug)]
#[command(name = "histcmp")]
#[command(author, version, about = "Compare and patch histogram files", long_about = None)]
struct Args {
    /// Verbose logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two histogram files bin by bin. Exit code: 0 match, 1 contents,
    /// 2 errors, 3 missing on RHS, 4 extra on RHS, 5 shape or type, 6 bad input
    Compare(CompareArgs),

    /// Normalize one histogram by area, rows or columns
    Normalize(NormalizeArgs),

    /// Divide one histogram by another
    Ratio(RatioArgs),

    /// Copy each central value into the CV of its error bands
    SyncCv(SyncCvArgs),

    /// Remove an error band from every histogram in a file
    RemoveBand(RemoveBandArgs),

    /// Copy one object from another file
    Transplant(TransplantArgs),
}

#[derive(ClapArgs, Debug)]
struct CompareArgs {
    /// Reference file
    lhs: PathBuf,

    /// File checked against the reference
    rhs: PathBuf,

    /// Largest absolute difference treated as equal
    #[arg(default_value_t = DEFAULT_TOLERANCE, value_parser = parse_tolerance)]
    tolerance: f64,

    /// How the diagnostics collapse into the exit code (last, most-severe)
    #[arg(long, default_value_t = SummaryPolicy::Last)]
    summary: SummaryPolicy,

    /// Also compare the central histogram of banded entries
    #[arg(long)]
    central: bool,

    /// Print a summary banner after the diagnostics
    #[arg(long)]
    report: bool,

    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum NormalizeMode {
    Area,
    Row,
    Column,
}

#[derive(ClapArgs, Debug)]
struct NormalizeArgs {
    file: PathBuf,

    /// Histogram to normalize
    name: String,

    #[arg(long, value_enum, default_value_t = NormalizeMode::Area)]
    mode: NormalizeMode,

    /// Output file (default: update FILE)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct RatioArgs {
    file: PathBuf,

    /// Numerator histogram
    numerator: String,

    /// Denominator histogram
    denominator: String,

    /// Binomial errors, for efficiencies
    #[arg(long)]
    binomial: bool,

    /// Name of the result (default: NUMERATOR_over_DENOMINATOR)
    #[arg(long)]
    name: Option<String>,

    /// Output file (default: update FILE)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct SyncCvArgs {
    file: PathBuf,

    /// Output file (default: <stem>_withSyncCVHistos.json next to FILE)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct RemoveBandArgs {
    /// Error band to remove
    band: String,

    file: PathBuf,

    /// Output file (default: update FILE)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct TransplantArgs {
    /// File receiving the object
    target: PathBuf,

    /// File the object is taken from
    source: PathBuf,

    /// Object to copy
    name: String,

    /// Output file (default: <target>_withFluxFrom_<source>.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("tolerance must be a finite number >= 0, got {}", s));
    }
    Ok(value)
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("histcmp={level},hc_core={level},hc_compare={level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    // clap's own usage-error code would collide with the comparison codes
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return if e.use_stderr() {
                ExitCode::from(INPUT_ERROR_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    match commands::run(args.command) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(INPUT_ERROR_CODE)
        }
    }
}
