//! Pattern-matching engine and scoring.
//!
//! Scans one byte buffer against every pattern of a stage. The buffer is
//! shared read-only for the lifetime of the scan; a lowercased sibling is
//! produced once up front for the case-insensitive patterns.

use crate::patterns::Registry;
use crate::types::{PatternHits, Stage};

/// Scan `data` against every pattern registered for `stage`.
///
/// Returns one [`PatternHits`] per pattern with a non-empty result;
/// matches within each entry ascend by offset. Pattern-to-pattern order
/// follows registration order.
pub fn scan_stage(registry: &Registry, stage: Stage, data: &[u8]) -> Vec<PatternHits> {
    let lower = data.to_ascii_lowercase();
    registry
        .stage(stage)
        .filter_map(|pattern| {
            let matches = pattern.scan(data, &lower);
            if matches.is_empty() {
                return None;
            }
            Some(PatternHits {
                description: pattern.description.to_string(),
                weight: pattern.weight,
                matches,
            })
        })
        .collect()
}

/// Reduce a match report to a single score: the sum over patterns of
/// match count times weight.
pub fn score(report: &[PatternHits]) -> u64 {
    report.iter().map(PatternHits::score).sum()
}
