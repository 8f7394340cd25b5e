//! Intersect added lines, function spans and coverage into one result.

use crate::model::{
    percent, AddedLines, CoverageProfile, DiffCoverage, FunctionRanges, Status, UncoveredLines,
    Verdict,
};

/// Measure coverage of the added lines that lie inside functions.
///
/// Added lines outside every function (imports, comments, package-level
/// declarations) are not counted at all. No changed files, or no changed
/// function lines, is full compliance whatever the threshold.
#[must_use]
pub fn correlate(
    profile: &CoverageProfile,
    added: &AddedLines,
    functions: &FunctionRanges,
    min_coverage: f64,
) -> DiffCoverage {
    if added.is_empty() {
        return DiffCoverage::unmeasured(Status::NoChangedFiles);
    }

    let mut total = 0usize;
    let mut covered = 0usize;
    let mut uncovered = UncoveredLines::new();

    for (path, lines) in added.iter() {
        for &line in lines {
            if !functions.contains(path, line) {
                continue;
            }
            total += 1;
            if profile.is_covered(path, line) {
                covered += 1;
            } else {
                uncovered.entry(path.to_owned()).or_default().push(line);
            }
        }
    }

    for lines in uncovered.values_mut() {
        lines.sort_unstable();
    }

    if total == 0 {
        return DiffCoverage {
            uncovered,
            ..DiffCoverage::unmeasured(Status::NoFunctionLines)
        };
    }

    let pct = percent(covered, total);
    let verdict = if pct < min_coverage {
        Verdict::BelowThreshold {
            minimum: min_coverage,
        }
    } else {
        Verdict::Pass
    };

    log::debug!("{covered}/{total} new function lines covered ({pct:.2}%)");
    DiffCoverage {
        percent: pct,
        covered_lines: covered,
        total_lines: total,
        uncovered,
        status: Status::Measured,
        verdict,
    }
}
