//! Two-stage parallel search driver.
//!
//! Stage 1 evaluates every candidate transform against the cheap stage-1
//! patterns and keeps the top K by score. Stage 2 re-applies the
//! survivors, scores them against the richer stage-2 patterns, and keeps
//! the top S with their full match reports.
//!
//! The input buffer and pattern registry are shared read-only across
//! workers; each worker materializes one transformed buffer at a time.
//! Units are independent, so evaluation order carries no meaning; the
//! driver imposes the total order afterwards: score descending, ties
//! broken by first appearance in the enumeration. A worker panic aborts
//! the whole run; no partial ranking is reported.

use crate::engine;
use crate::patterns::Registry;
use crate::transforms::Transform;
use crate::types::{CrackOptions, RankedResult, Stage};
use rayon::prelude::*;
use std::time::Instant;

/// Run the full two-stage search over the candidate set.
///
/// `work` is the expanded (family, parameter) enumeration; `data` is the
/// raw input buffer. The returned ranking holds at most
/// `options.save` results, a subset of the stage-1 top `options.keep`.
pub fn run(
    registry: &Registry,
    work: Vec<Transform>,
    data: &[u8],
    options: &CrackOptions,
) -> Vec<RankedResult> {
    let survivors = stage_one(registry, work, data, options.keep);
    stage_two(registry, survivors, data, options.save)
}

/// Stage 1: wide scan. Returns the top `keep` transforms by stage-1
/// score, in rank order.
fn stage_one(
    registry: &Registry,
    work: Vec<Transform>,
    data: &[u8],
    keep: usize,
) -> Vec<Transform> {
    let started = Instant::now();
    let total = work.len();
    tracing::info!(candidates = total, "starting stage 1");

    let mut scored: Vec<(Transform, u64)> = work
        .into_par_iter()
        .map(|transform| {
            let decoded = transform.apply(data, crate::types::Direction::Decode);
            let report = engine::scan_stage(registry, Stage::One, &decoded);
            let score = engine::score(&report);
            (transform, score)
        })
        .collect();

    // stable sort keeps first-appearance order among equal scores
    scored.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
    scored.truncate(keep);

    tracing::info!(
        candidates = total,
        kept = scored.len(),
        elapsed = ?started.elapsed(),
        "stage 1 complete"
    );
    scored.into_iter().map(|(transform, _)| transform).collect()
}

/// Stage 2: narrow refinement. Re-applies each survivor (buffers are not
/// cached between stages), re-scores against the stage-2 patterns, and
/// returns the top `save` with full match reports.
fn stage_two(
    registry: &Registry,
    survivors: Vec<Transform>,
    data: &[u8],
    save: usize,
) -> Vec<RankedResult> {
    let started = Instant::now();
    tracing::info!(survivors = survivors.len(), "starting stage 2");

    let mut results: Vec<RankedResult> = survivors
        .into_par_iter()
        .map(|transform| {
            let decoded = transform.apply(data, crate::types::Direction::Decode);
            let report = engine::scan_stage(registry, Stage::Two, &decoded);
            let score = engine::score(&report);
            RankedResult {
                transform,
                score,
                report,
            }
        })
        .collect();

    results.sort_by_key(|r| std::cmp::Reverse(r.score));
    results.truncate(save);

    tracing::info!(
        kept = results.len(),
        elapsed = ?started.elapsed(),
        "stage 2 complete"
    );
    results
}
