/// Parse a zero-context unified diff to extract which lines were added in
/// each source file. This is used for computing "new code coverage": what
/// percentage of newly added/modified lines inside functions are covered.
///
/// Also provides a [`DiffSource`] trait that abstracts over different
/// ways to obtain a diff (file or stdin).
use std::io::Read;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{NewcovError, Result};
use crate::language::SourceKind;
use crate::model::AddedLines;
use crate::module::Module;

// ---------------------------------------------------------------------------
// Diff sources
// ---------------------------------------------------------------------------

/// A source for obtaining a unified diff.
///
/// The diff must be generated with zero context lines (`--unified=0`);
/// context lines are not tracked and would shift every added line after them.
pub trait DiffSource {
    /// Fetch the diff text.
    fn fetch_diff(&self) -> Result<String>;
}

/// Diff read from a file on disk.
pub struct FileDiff {
    pub path: PathBuf,
}

impl DiffSource for FileDiff {
    fn fetch_diff(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path)
            .map_err(|e| NewcovError::Diff(format!("{}: {e}", self.path.display())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Diff from stdin.
pub struct StdinDiff;

impl DiffSource for StdinDiff {
    fn fetch_diff(&self) -> Result<String> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| NewcovError::Diff(format!("failed to read stdin: {e}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ---------------------------------------------------------------------------
// Diff parsing
// ---------------------------------------------------------------------------

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("hunk header regex is valid")
});

/// Fixed inputs of a parse: how paths are qualified and which files count.
#[derive(Debug, Clone, Copy)]
pub struct DiffContext<'a> {
    pub module: &'a Module,
    pub kind: &'a SourceKind,
}

/// Scan state carried from one diff line to the next.
///
/// `current_file` holds the import path (`<module>/<path>`) of the file the
/// following lines belong to; `next_added_line` is the new-file line number
/// the next `+` line will get.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffCursor {
    pub current_file: Option<String>,
    pub next_added_line: u32,
}

impl DiffCursor {
    /// Consume one diff line, returning the next state and, for an added
    /// source line, its `(relative path, line)`.
    #[must_use]
    pub fn advance(&self, line: &str, ctx: DiffContext<'_>) -> (DiffCursor, Option<(String, u32)>) {
        if let Some(rest) = line.strip_prefix("+++ ") {
            // A marker without a path leaves the current file as it was.
            let Some(path) = rest.split_whitespace().next() else {
                return (self.clone(), None);
            };
            let current_file = (path != "/dev/null")
                .then(|| ctx.module.qualify(path.strip_prefix("b/").unwrap_or(path)));
            let next = DiffCursor {
                current_file,
                next_added_line: self.next_added_line,
            };
            return (next, None);
        }

        if let Some(caps) = HUNK_HEADER.captures(line) {
            // The old range is irrelevant: removed lines are never tracked.
            if let Ok(new_start) = caps[2].parse::<u32>() {
                let next = DiffCursor {
                    current_file: self.current_file.clone(),
                    next_added_line: new_start,
                };
                return (next, None);
            }
            return (self.clone(), None);
        }

        if !line.starts_with('+') {
            return (self.clone(), None);
        }

        let Some(file) = self.current_file.as_deref() else {
            // Added line before any file header: diff preamble.
            return (self.clone(), None);
        };
        if ctx.kind.is_test_file(file) || !ctx.kind.is_source_file(file) {
            return (self.clone(), None);
        }
        // No hunk header seen yet.
        if self.next_added_line == 0 {
            return (self.clone(), None);
        }
        let Some(path) = ctx.module.relative(file) else {
            return (self.clone(), None);
        };

        let next = DiffCursor {
            current_file: self.current_file.clone(),
            next_added_line: self.next_added_line.saturating_add(1),
        };
        (next, Some((path, self.next_added_line)))
    }
}

/// Parse a zero-context unified diff (`git diff --unified=0`) into the added
/// lines of every non-test source file, keyed by module-relative path.
pub fn parse_diff(diff_text: &str, ctx: DiffContext<'_>) -> AddedLines {
    let (_, added) = diff_text.lines().fold(
        (DiffCursor::default(), AddedLines::new()),
        |(cursor, mut added), line| {
            let (next, recorded) = cursor.advance(line, ctx);
            if let Some((path, line_number)) = recorded {
                added.insert(path, line_number);
            }
            (next, added)
        },
    );

    log::debug!(
        "diff adds {} lines across {} source files",
        added.line_count(),
        added.len()
    );
    added
}
