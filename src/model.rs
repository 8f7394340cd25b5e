//! In-memory representation of the three inputs (coverage, diff, function
//! boundaries) and of the correlated result. All path keys are relative to
//! the module root and use `/` separators.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

/// Compute a percentage, returning 100.0 when the total is zero.
///
/// Nothing to measure counts as full compliance.
#[must_use]
pub fn percent(covered: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        100.0 * covered as f64 / total as f64
    }
}

/// Lines executed at least once, per file.
///
/// Each file keeps its covered blocks as sorted, disjoint, non-adjacent
/// inclusive ranges, so a block's size never affects memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageProfile {
    files: HashMap<String, Vec<(u32, u32)>>,
}

impl CoverageProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every line of `start..=end` as covered. An inverted range marks
    /// nothing.
    pub(crate) fn mark_covered(&mut self, path: String, start: u32, end: u32) {
        if end < start {
            return;
        }
        let ranges = self.files.entry(path).or_default();

        // First range that could touch `start..=end`, and one past the last.
        let first = ranges.partition_point(|&(_, e)| e.saturating_add(1) < start);
        let last = ranges.partition_point(|&(s, _)| s <= end.saturating_add(1));

        let merged = ranges[first..last]
            .iter()
            .fold((start, end), |(lo, hi), &(s, e)| (lo.min(s), hi.max(e)));
        ranges.splice(first..last, [merged]);
    }

    #[must_use]
    pub fn is_covered(&self, path: &str, line: u32) -> bool {
        let ranges = self.covered_ranges(path);
        let idx = ranges.partition_point(|&(_, end)| end < line);
        ranges.get(idx).is_some_and(|&(start, _)| start <= line)
    }

    /// Covered ranges of `path`, sorted and merged.
    pub fn covered_ranges(&self, path: &str) -> &[(u32, u32)] {
        self.files.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of covered lines in `path`.
    pub fn covered_line_count(&self, path: &str) -> usize {
        self.covered_ranges(path)
            .iter()
            .map(|&(start, end)| (end - start) as usize + 1)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lines newly present in the revision under review, per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedLines {
    files: BTreeMap<String, BTreeSet<u32>>,
}

impl AddedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path: String, line: u32) {
        self.files.entry(path).or_default().insert(line);
    }

    /// Changed files in path order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.files.iter().map(|(path, lines)| (path.as_str(), lines))
    }

    pub fn lines(&self, path: &str) -> Option<&BTreeSet<u32>> {
        self.files.get(path)
    }

    /// Total number of added lines across all files.
    pub fn line_count(&self) -> usize {
        self.files.values().map(BTreeSet::len).sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Inclusive line span of one function body. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpan {
    start: u32,
    end: u32,
}

impl LineSpan {
    /// Build the span for a declaration covering `start..=end`.
    ///
    /// The last line of a multi-line declaration is its closing brace and is
    /// left out.
    #[must_use]
    pub fn from_declaration(start: u32, end: u32) -> Self {
        let end = if end > start { end - 1 } else { start };
        Self { start, end }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    #[must_use]
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Function spans per file, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionRanges {
    files: HashMap<String, Vec<LineSpan>>,
}

impl FunctionRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self, path: &str) -> &[LineSpan] {
        self.files.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `line` lies inside any function of `path`.
    #[must_use]
    pub fn contains(&self, path: &str, line: u32) -> bool {
        self.spans(path).iter().any(|span| span.contains(line))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, Vec<LineSpan>)> for FunctionRanges {
    fn from_iter<I: IntoIterator<Item = (String, Vec<LineSpan>)>>(iter: I) -> Self {
        let mut files: HashMap<String, Vec<LineSpan>> = HashMap::new();
        for (path, spans) in iter {
            files.entry(path).or_default().extend(spans);
        }
        Self { files }
    }
}

/// File path → sorted uncovered line numbers.
pub type UncoveredLines = BTreeMap<String, Vec<u32>>;

/// Why a result has the percentage it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The diff touched no source files.
    NoChangedFiles,
    /// Source files changed, but no changed line lies inside a function.
    NoFunctionLines,
    /// At least one changed line lies inside a function.
    Measured,
}

/// Outcome of comparing the measured coverage against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    BelowThreshold { minimum: f64 },
}

/// Result of one run: metrics plus the verdict.
///
/// A below-threshold verdict still carries the full uncovered map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffCoverage {
    pub percent: f64,
    pub covered_lines: usize,
    pub total_lines: usize,
    pub uncovered: UncoveredLines,
    pub status: Status,
    pub verdict: Verdict,
}

impl DiffCoverage {
    /// A passing result with nothing measured.
    pub(crate) fn unmeasured(status: Status) -> Self {
        Self {
            percent: 100.0,
            covered_lines: 0,
            total_lines: 0,
            uncovered: UncoveredLines::new(),
            status,
            verdict: Verdict::Pass,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_zero_total_is_full() {
        assert_eq!(percent(0, 0), 100.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn test_line_span_drops_closing_line() {
        let span = LineSpan::from_declaration(3, 5);
        assert_eq!((span.start(), span.end()), (3, 4));

        let one_liner = LineSpan::from_declaration(7, 7);
        assert_eq!((one_liner.start(), one_liner.end()), (7, 7));
    }

    #[test]
    fn test_function_ranges_contains() {
        let ranges: FunctionRanges = [(
            "file.go".to_string(),
            vec![LineSpan { start: 3, end: 5 }, LineSpan { start: 7, end: 9 }],
        )]
        .into_iter()
        .collect();

        for (line, want) in [(2, false), (3, true), (5, true), (6, false), (9, true), (10, false)] {
            assert_eq!(ranges.contains("file.go", line), want, "line {line}");
        }
        assert!(!ranges.contains("other.go", 3));
    }

    #[test]
    fn test_coverage_profile_marks_inclusive_range() {
        let mut profile = CoverageProfile::new();
        profile.mark_covered("pkg/foo.go".to_string(), 10, 12);
        assert!(profile.is_covered("pkg/foo.go", 10));
        assert!(profile.is_covered("pkg/foo.go", 12));
        assert!(!profile.is_covered("pkg/foo.go", 13));
        assert!(!profile.is_covered("pkg/bar.go", 10));
    }

    #[test]
    fn test_coverage_profile_merges_blocks() {
        let mut profile = CoverageProfile::new();
        profile.mark_covered("f.go".to_string(), 20, 25);
        profile.mark_covered("f.go".to_string(), 5, 8);
        profile.mark_covered("f.go".to_string(), 9, 10);
        profile.mark_covered("f.go".to_string(), 7, 7);
        profile.mark_covered("f.go".to_string(), 30, 31);
        assert_eq!(profile.covered_ranges("f.go"), &[(5, 10), (20, 25), (30, 31)]);

        profile.mark_covered("f.go".to_string(), 12, 29);
        assert_eq!(profile.covered_ranges("f.go"), &[(5, 10), (12, 31)]);
        assert_eq!(profile.covered_line_count("f.go"), 26);
        assert!(!profile.is_covered("f.go", 11));
        assert!(profile.is_covered("f.go", 12));
    }

    #[test]
    fn test_coverage_profile_inverted_range_marks_nothing() {
        let mut profile = CoverageProfile::new();
        profile.mark_covered("f.go".to_string(), 9, 3);
        assert!(!profile.is_covered("f.go", 5));
        assert_eq!(profile.covered_line_count("f.go"), 0);
    }

    #[test]
    fn test_coverage_profile_huge_block() {
        let mut profile = CoverageProfile::new();
        profile.mark_covered("f.go".to_string(), 1, u32::MAX);
        assert!(profile.is_covered("f.go", u32::MAX));
        assert_eq!(profile.covered_ranges("f.go"), &[(1, u32::MAX)]);
    }
}
