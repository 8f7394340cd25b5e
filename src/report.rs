//! Output formatting for new-code coverage results.

use std::fmt::Write;

use crate::model::{DiffCoverage, Status, Verdict};

/// Trait for formatting coverage results.
pub trait ReportFormatter {
    /// Format the result to a string.
    fn format(&self, result: &DiffCoverage) -> String;
}

/// Plain text formatter.
pub struct TextFormatter {
    /// Also list uncovered line ranges per file.
    pub verbose: bool,
}

impl ReportFormatter for TextFormatter {
    fn format(&self, result: &DiffCoverage) -> String {
        let mut out = String::new();

        if self.verbose && !result.uncovered.is_empty() {
            out.push_str("Uncovered lines:\n");
            for (path, lines) in &result.uncovered {
                let missed = format_line_ranges(lines);
                writeln!(out, "  {path}  missed: {missed}").unwrap();
            }
            out.push('\n');
        }

        match result.status {
            Status::NoChangedFiles => {
                out.push_str("No new/changed Go files found in diff.\n");
                return out;
            }
            Status::NoFunctionLines => {
                out.push_str("No new/changed lines in functions found in diff.\n");
                return out;
            }
            Status::Measured => {}
        }

        let pct = result.percent;
        let covered = result.covered_lines;
        let total = result.total_lines;
        writeln!(
            out,
            "New/Changed lines coverage in functions: {pct:.2}% ({covered}/{total})"
        )
        .unwrap();

        if let Verdict::BelowThreshold { minimum } = result.verdict {
            writeln!(
                out,
                "Coverage {pct:.2}% is below the minimum required {minimum:.2}%"
            )
            .unwrap();
        }

        out
    }
}

/// Markdown formatter, suitable for a pull request comment.
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, result: &DiffCoverage) -> String {
        let mut md = String::new();

        let pct = result.percent;
        writeln!(md, "### New Code Coverage: {pct:.1}%\n").unwrap();

        match result.status {
            Status::NoChangedFiles => md.push_str("No Go files changed.\n"),
            Status::NoFunctionLines => md.push_str("No changed lines inside functions.\n"),
            Status::Measured => {
                let covered = result.covered_lines;
                let total = result.total_lines;
                writeln!(md, "**{covered}** of **{total}** new function lines covered").unwrap();
            }
        }

        if let Verdict::BelowThreshold { minimum } = result.verdict {
            writeln!(md, "\n:x: Below the required **{minimum:.1}%**").unwrap();
        }

        if !result.uncovered.is_empty() {
            md.push_str("\n| File | Missed | Lines |\n");
            md.push_str("|:-----|-------:|:------|\n");
            for (path, lines) in &result.uncovered {
                let missed = lines.len();
                let ranges = format_line_ranges(lines);
                writeln!(md, "| `{path}` | {missed} | {ranges} |").unwrap();
            }
        } else if result.status == Status::Measured {
            md.push_str("\nAll new function lines are covered!\n");
        }

        md
    }
}

/// JSON formatter: the serialized result.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, result: &DiffCoverage) -> String {
        let mut json = serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
        json.push('\n');
        json
    }
}

/// Fold sorted, deduplicated line numbers into `(start, end)` ranges of
/// consecutive lines.
#[must_use]
pub fn coalesce_ranges(lines: &[u32]) -> Vec<(u32, u32)> {
    let Some((&first, rest)) = lines.split_first() else {
        return Vec::new();
    };

    debug_assert!(
        lines.windows(2).all(|w| w[0] < w[1]),
        "coalesce_ranges requires sorted, deduplicated input"
    );

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut start = first;
    let mut end = first;

    for &line in rest {
        if line == end + 1 {
            end = line;
        } else {
            ranges.push((start, end));
            start = line;
            end = line;
        }
    }

    ranges.push((start, end));
    ranges
}

/// Format line numbers into compact range notation, e.g. "1, 3-5, 8".
///
/// The input slice must be sorted in ascending order.
#[must_use]
pub fn format_line_ranges(lines: &[u32]) -> String {
    coalesce_ranges(lines)
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UncoveredLines;

    fn measured(covered: usize, total: usize, uncovered: UncoveredLines, verdict: Verdict) -> DiffCoverage {
        DiffCoverage {
            percent: crate::model::percent(covered, total),
            covered_lines: covered,
            total_lines: total,
            uncovered,
            status: Status::Measured,
            verdict,
        }
    }

    // -- coalesce_ranges tests -----------------------------------------------

    #[test]
    fn test_coalesce_ranges_empty() {
        assert_eq!(coalesce_ranges(&[]), Vec::<(u32, u32)>::new());
    }

    #[test]
    fn test_coalesce_ranges_single() {
        assert_eq!(coalesce_ranges(&[10]), vec![(10, 10)]);
    }

    #[test]
    fn test_coalesce_ranges_consecutive() {
        assert_eq!(coalesce_ranges(&[1, 2, 3]), vec![(1, 3)]);
    }

    #[test]
    fn test_coalesce_ranges_disjoint() {
        assert_eq!(coalesce_ranges(&[1, 2, 4, 5, 6]), vec![(1, 2), (4, 6)]);
    }

    #[test]
    fn test_coalesce_ranges_no_gap_bridging() {
        assert_eq!(coalesce_ranges(&[1, 3]), vec![(1, 1), (3, 3)]);
    }

    // -- format_line_ranges tests -------------------------------------------

    #[test]
    fn test_format_line_ranges() {
        assert_eq!(format_line_ranges(&[]), "");
        assert_eq!(format_line_ranges(&[5]), "5");
        assert_eq!(format_line_ranges(&[1, 3, 4, 5, 10]), "1, 3-5, 10");
    }

    // -- formatter tests ----------------------------------------------------

    #[test]
    fn test_format_text_measured() {
        let result = measured(6, 7, UncoveredLines::new(), Verdict::Pass);
        let text = TextFormatter { verbose: false }.format(&result);
        assert_eq!(
            text,
            "New/Changed lines coverage in functions: 85.71% (6/7)\n"
        );
    }

    #[test]
    fn test_format_text_below_threshold_verbose() {
        let uncovered = UncoveredLines::from([("pkg/foo.go".to_string(), vec![3, 4, 5, 9])]);
        let result = measured(1, 5, uncovered, Verdict::BelowThreshold { minimum: 80.0 });
        let text = TextFormatter { verbose: true }.format(&result);
        assert!(text.contains("  pkg/foo.go  missed: 3-5, 9\n"));
        assert!(text.contains("coverage in functions: 20.00% (1/5)"));
        assert!(text.contains("Coverage 20.00% is below the minimum required 80.00%"));
    }

    #[test]
    fn test_format_text_unmeasured() {
        let text = TextFormatter { verbose: true }.format(&DiffCoverage::unmeasured(Status::NoChangedFiles));
        assert_eq!(text, "No new/changed Go files found in diff.\n");

        let text = TextFormatter { verbose: false }.format(&DiffCoverage::unmeasured(Status::NoFunctionLines));
        assert_eq!(text, "No new/changed lines in functions found in diff.\n");
    }

    #[test]
    fn test_format_markdown_all_covered() {
        let result = measured(4, 4, UncoveredLines::new(), Verdict::Pass);
        let md = MarkdownFormatter.format(&result);
        assert!(md.contains("New Code Coverage: 100.0%"));
        assert!(md.contains("**4** of **4**"));
        assert!(md.contains("All new function lines are covered!"));
    }

    #[test]
    fn test_format_markdown_with_misses() {
        let uncovered = UncoveredLines::from([("src/foo.go".to_string(), vec![5, 6])]);
        let result = measured(3, 5, uncovered, Verdict::BelowThreshold { minimum: 90.0 });
        let md = MarkdownFormatter.format(&result);
        assert!(md.contains("60.0%"));
        assert!(md.contains("| `src/foo.go` | 2 | 5-6 |"));
        assert!(md.contains("Below the required **90.0%**"));
    }

    #[test]
    fn test_format_json() {
        let uncovered = UncoveredLines::from([("a.go".to_string(), vec![2])]);
        let result = measured(1, 2, uncovered, Verdict::BelowThreshold { minimum: 75.0 });
        let json: serde_json::Value = serde_json::from_str(&JsonFormatter.format(&result)).unwrap();
        assert_eq!(json["percent"], 50.0);
        assert_eq!(json["status"], "measured");
        assert_eq!(json["verdict"]["kind"], "below_threshold");
        assert_eq!(json["verdict"]["minimum"], 75.0);
        assert_eq!(json["uncovered"]["a.go"][0], 2);
    }
}
