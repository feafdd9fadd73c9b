//! Core types for Locke.
//!
//! This module defines the fundamental types shared across the crate:
//! scan stages, transform directions, pattern matches, and the scored
//! results produced by the search driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scan stage tagging a pattern's cost and specificity.
///
/// Stage-1 patterns are cheap structural signals (header magics, API
/// names) used during the wide scan; stage-2 patterns are richer,
/// regex-based detectors used to refine the survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Cheap, broad signals for the wide stage-1 scan.
    One,
    /// Richer, narrower detectors for stage-2 refinement.
    Two,
}

impl Stage {
    /// Returns the numeric stage identifier (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Stage::One => 1,
            Stage::Two => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Direction in which a transform is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Invert the obfuscation (the search direction).
    Decode,
    /// Re-apply the obfuscation (the inverse, used by tests and tooling).
    Encode,
}

/// A single pattern hit: the offset it was found at and the bytes matched.
///
/// Offsets are measured in the transformed buffer; `data` is the slice at
/// that offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Byte offset of the match within the scanned buffer.
    pub offset: usize,
    /// The bytes captured by the pattern.
    pub data: Vec<u8>,
}

impl Match {
    /// Create a new match.
    pub fn new(offset: usize, data: Vec<u8>) -> Self {
        Self { offset, data }
    }
}

/// All matches one pattern produced against one buffer.
#[derive(Debug, Clone, Serialize)]
pub struct PatternHits {
    /// The pattern's human description.
    pub description: String,
    /// The pattern's per-match weight.
    pub weight: u64,
    /// Matches ascending by offset.
    pub matches: Vec<Match>,
}

impl PatternHits {
    /// The score contribution of this pattern: match count times weight.
    pub fn score(&self) -> u64 {
        self.matches.len() as u64 * self.weight
    }
}

/// Options controlling the two-stage crack search.
#[derive(Debug, Clone)]
pub struct CrackOptions {
    /// Number of stage-1 survivors retained for stage 2 (top-K).
    pub keep: usize,
    /// Number of stage-2 survivors reported and written (top-S).
    pub save: usize,
}

impl Default for CrackOptions {
    fn default() -> Self {
        Self { keep: 20, save: 10 }
    }
}

/// A ranked candidate surviving the stage-2 refinement.
#[derive(Debug, Clone)]
pub struct RankedResult {
    /// The transform that produced this candidate.
    pub transform: crate::transforms::Transform,
    /// The stage-2 score.
    pub score: u64,
    /// Per-pattern match reports with non-empty results.
    pub report: Vec<PatternHits>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_number() {
        assert_eq!(Stage::One.number(), 1);
        assert_eq!(Stage::Two.number(), 2);
        assert_eq!(Stage::Two.to_string(), "2");
    }

    #[test]
    fn test_pattern_hits_score() {
        let hits = PatternHits {
            description: "test".into(),
            weight: 100,
            matches: vec![Match::new(0, vec![1]), Match::new(5, vec![2])],
        };
        assert_eq!(hits.score(), 200);
    }

    #[test]
    fn test_default_options() {
        let opts = CrackOptions::default();
        assert_eq!(opts.keep, 20);
        assert_eq!(opts.save, 10);
    }
}
