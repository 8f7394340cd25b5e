//! Command handler for the newcov CLI.
//!
//! `cmd_check` returns its output as a `String`, making it easy to test
//! without capturing stdout.

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::check::{self, CheckOptions};
use crate::diff::DiffSource;
use crate::report::{JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};

/// Output style for the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Style {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Rendered report plus whether the threshold was met.
#[derive(Debug)]
pub struct CheckOutput {
    pub report: String,
    pub passed: bool,
}

/// Parse a `--min` threshold, rejecting NaN and infinities.
pub fn parse_threshold(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid percentage {s:?}: {e}"))?;
    if !value.is_finite() {
        return Err(format!("percentage must be a finite number, got {s:?}"));
    }
    Ok(value)
}

pub fn cmd_check(
    options: &CheckOptions,
    diff: &dyn DiffSource,
    style: Style,
    verbose: bool,
) -> Result<CheckOutput> {
    let result = check::run(options, diff).context("diff coverage check failed")?;

    let report = match style {
        Style::Text => TextFormatter { verbose }.format(&result),
        Style::Markdown => MarkdownFormatter.format(&result),
        Style::Json => JsonFormatter.format(&result),
    };

    Ok(CheckOutput {
        report,
        passed: result.passed(),
    })
}
