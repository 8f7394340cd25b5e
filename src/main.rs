use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use newcov::cancel::Cancellation;
use newcov::check::CheckOptions;
use newcov::cli::{cmd_check, parse_threshold, Style};
use newcov::diff::{DiffSource, FileDiff, StdinDiff};

/// newcov: coverage of new and changed lines inside Go functions.
///
/// Compares a Go coverage profile against a zero-context diff
/// (`git diff --unified=0`) and reports how many of the added lines that
/// fall inside function bodies were executed by tests.
#[derive(Parser)]
#[command(name = "newcov", version, about)]
struct Cli {
    /// Go coverage profile (`go test -coverprofile=cover.out`).
    cover_profile: PathBuf,

    /// Zero-context unified diff (`git diff --unified=0`), or `-` for stdin.
    diff: PathBuf,

    /// Module root containing `go.mod`.
    source_root: PathBuf,

    /// Minimum coverage percentage of new function lines (e.g. 80.0).
    #[arg(long, default_value_t = 0.0, env = "NEWCOV_MIN_COVERAGE", value_parser = parse_threshold)]
    min: f64,

    /// List uncovered lines.
    #[arg(short, long)]
    verbose: bool,

    /// Output style.
    #[arg(long, value_enum, default_value_t = Style::Text)]
    style: Style,

    /// Give up on parsing source files if it takes longer than this many
    /// seconds. Reading the profile and diff is not counted.
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let cancellation = match cli.timeout {
        Some(secs) => Cancellation::with_timeout(Duration::from_secs(secs)),
        None => Cancellation::new(),
    };
    let options = CheckOptions::new(cli.cover_profile, cli.source_root)
        .min_coverage(cli.min)
        .cancellation(cancellation);

    let diff: Box<dyn DiffSource> = if cli.diff.as_os_str() == "-" {
        Box::new(StdinDiff)
    } else {
        Box::new(FileDiff { path: cli.diff })
    };

    let output = cmd_check(&options, diff.as_ref(), cli.style, cli.verbose)?;
    print!("{}", output.report);

    Ok(if output.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
