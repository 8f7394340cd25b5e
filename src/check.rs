//! The full pipeline: module → profile + diff → function spans → result.

use std::path::PathBuf;

use crate::cancel::Cancellation;
use crate::correlate::correlate;
use crate::diff::{parse_diff, DiffContext, DiffSource};
use crate::error::{NewcovError, Result};
use crate::functions::{extract_function_ranges, FsSourceTree, SourceTree};
use crate::language::{DeclarationParser, GoParser, SourceKind, GO};
use crate::model::{DiffCoverage, Status};
use crate::module::{read_module, Module};
use crate::parsers::gocover;

/// Inputs of one run besides the diff itself.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Go coverage profile (`go test -coverprofile`).
    pub cover_profile: PathBuf,
    /// Module root; must contain `go.mod`.
    pub source_root: PathBuf,
    /// Minimum acceptable coverage percentage.
    pub min_coverage: f64,
    pub cancellation: Cancellation,
}

impl CheckOptions {
    pub fn new(cover_profile: impl Into<PathBuf>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            cover_profile: cover_profile.into(),
            source_root: source_root.into(),
            min_coverage: 0.0,
            cancellation: Cancellation::new(),
        }
    }

    #[must_use]
    pub fn min_coverage(mut self, min_coverage: f64) -> Self {
        self.min_coverage = min_coverage;
        self
    }

    #[must_use]
    pub fn cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Measure coverage of the Go function lines added by `diff`.
///
/// I/O failures on `go.mod`, the profile or the diff abort the run. A result
/// below `min_coverage` is returned as `Ok` with a below-threshold verdict.
pub fn run(options: &CheckOptions, diff: &dyn DiffSource) -> Result<DiffCoverage> {
    let module = read_module(&options.source_root.join("go.mod"))?;

    let profile_bytes =
        std::fs::read(&options.cover_profile).map_err(|source| NewcovError::CoverProfile {
            path: options.cover_profile.clone(),
            source,
        })?;
    let profile_text = String::from_utf8_lossy(&profile_bytes);

    let diff_text = diff.fetch_diff()?;

    let tree = FsSourceTree::new(&options.source_root);
    let inputs = Inputs {
        module: &module,
        kind: &GO,
        tree: &tree,
        parser: &GoParser,
    };
    analyze(
        &inputs,
        &profile_text,
        &diff_text,
        options.min_coverage,
        &options.cancellation,
    )
}

/// Everything [`analyze`] needs besides the two texts.
#[derive(Clone, Copy)]
pub struct Inputs<'a> {
    pub module: &'a Module,
    pub kind: &'a SourceKind,
    pub tree: &'a dyn SourceTree,
    pub parser: &'a dyn DeclarationParser,
}

/// Run the pipeline on already-loaded profile and diff texts.
pub fn analyze(
    inputs: &Inputs<'_>,
    profile_text: &str,
    diff_text: &str,
    min_coverage: f64,
    cancel: &Cancellation,
) -> Result<DiffCoverage> {
    let profile = gocover::parse(profile_text, inputs.module);
    let added = parse_diff(
        diff_text,
        DiffContext {
            module: inputs.module,
            kind: inputs.kind,
        },
    );

    if added.is_empty() {
        log::debug!("no changed source files, skipping function extraction");
        return Ok(DiffCoverage::unmeasured(Status::NoChangedFiles));
    }

    let cancel = cancel.start();
    let functions = extract_function_ranges(inputs.tree, inputs.parser, added.paths(), &cancel)?;
    Ok(correlate(&profile, &added, &functions, min_coverage))
}
