//! Function boundaries of the changed files.
//!
//! Only files named by the diff are parsed, never the whole tree. A file that
//! is gone or does not parse is skipped: its changed lines then fall outside
//! every function and drop out of both sides of the ratio.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::cancel::Cancellation;
use crate::error::{NewcovError, Result};
use crate::language::DeclarationParser;
use crate::model::{FunctionRanges, LineSpan};

/// Read access to source files by module-relative path.
pub trait SourceTree: Sync {
    /// Content of `path`, or `None` when it is missing, a directory, or
    /// unreadable.
    fn read(&self, path: &str) -> Option<String>;
}

/// Source files under a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSourceTree {
    pub root: PathBuf,
}

impl FsSourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTree for FsSourceTree {
    fn read(&self, path: &str) -> Option<String> {
        let full_path = self.root.join(path);
        let metadata = std::fs::metadata(&full_path).ok()?;
        if metadata.is_dir() {
            return None;
        }
        let bytes = std::fs::read(&full_path).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Parse every candidate file and collect its function spans.
///
/// Files are independent, so they are parsed in parallel. `cancel` is
/// checked before each file.
pub fn extract_function_ranges<'a, I>(
    tree: &dyn SourceTree,
    parser: &dyn DeclarationParser,
    candidates: I,
    cancel: &Cancellation,
) -> Result<FunctionRanges>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidates: Vec<&str> = candidates.into_iter().collect();

    let parsed: Vec<Option<(String, Vec<LineSpan>)>> = candidates
        .par_iter()
        .map(|path| {
            if cancel.is_cancelled() {
                return Err(NewcovError::Cancelled);
            }
            Ok(file_ranges(tree, parser, path))
        })
        .collect::<Result<_>>()?;

    let ranges: FunctionRanges = parsed.into_iter().flatten().collect();
    log::debug!(
        "function ranges for {} of {} changed files",
        ranges.len(),
        candidates.len()
    );
    Ok(ranges)
}

fn file_ranges(
    tree: &dyn SourceTree,
    parser: &dyn DeclarationParser,
    path: &str,
) -> Option<(String, Vec<LineSpan>)> {
    let Some(source) = tree.read(path) else {
        log::debug!("skipping {path}: not readable");
        return None;
    };

    match parser.declaration_spans(&source) {
        Ok(spans) => {
            let spans = spans
                .into_iter()
                .map(|span| LineSpan::from_declaration(span.start_line, span.end_line))
                .collect();
            Some((path.to_owned(), spans))
        }
        Err(e) => {
            log::warn!("skipping {path}: {e}");
            None
        }
    }
}
