/// Parser for Go's `-coverprofile` format.
///
/// Reference: https://go.dev/blog/cover
///
/// Format:
///   mode: set|count|atomic
///   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <count>
///
/// Each line describes a basic block with the number of statements in the
/// block and how many times it was executed. A block with a positive count
/// covers every physical line of its range; a block with count 0 marks
/// nothing.
///
/// Only files under the module's own import path are kept. Vendored or
/// generated code living under another path never shows up in the profile.
/// Malformed lines are skipped, never fatal: the profile comes from a
/// different tool than the diff and the two may disagree on edge cases.
use crate::model::CoverageProfile;
use crate::module::Module;

/// A parsed block from a single line of the coverage profile.
#[derive(Debug, PartialEq, Eq)]
struct Block<'a> {
    file: &'a str,
    start_line: u32,
    end_line: u32,
    count: i64,
}

/// Parse a Go coverage profile into the set of covered lines per file.
pub fn parse(input: &str, module: &Module) -> CoverageProfile {
    let mut profile = CoverageProfile::new();
    let mut skipped = 0usize;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("mode:") {
            continue;
        }

        let Some(block) = parse_block_line(line) else {
            skipped += 1;
            continue;
        };
        if block.count <= 0 {
            continue;
        }
        let Some(path) = module.relative(block.file) else {
            continue;
        };
        profile.mark_covered(path, block.start_line, block.end_line);
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} malformed cover profile lines");
    }
    log::debug!("cover profile has covered lines in {} files", profile.len());
    profile
}

/// Parse a single block line.
///
/// Format: `<file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>`
fn parse_block_line(line: &str) -> Option<Block<'_>> {
    let mut fields = line.split_whitespace();
    let (location, _num_stmt, count) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let (file, range) = split_exact(location, ':')?;
    let (start, end) = split_exact(range, ',')?;
    let (start_line, _start_col) = split_exact(start, '.')?;
    let (end_line, _end_col) = split_exact(end, '.')?;

    let start_line: u32 = start_line.parse().ok()?;
    let end_line: u32 = end_line.parse().ok()?;
    let count: i64 = count.parse().ok()?;

    // Line numbers are 1-indexed; a block starting at 0 is corrupt.
    if start_line == 0 {
        return None;
    }

    Some(Block {
        file,
        start_line,
        end_line,
        count,
    })
}

/// Split on `sep`, requiring exactly two parts.
fn split_exact(s: &str, sep: char) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(sep)?;
    if tail.contains(sep) {
        return None;
    }
    Some((head, tail))
}
