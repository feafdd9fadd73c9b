//! Pattern registry and matching primitives.
//!
//! A pattern is a named detector with a stage, a weight, and one of three
//! forms: a single byte literal, a list of byte literals, or a regular
//! expression over bytes. Patterns are immutable once validated: string
//! payloads are coerced to bytes at construction and case-insensitive
//! literals are lowercased exactly once.

pub mod stage1;
pub mod stage2;

use crate::error::{LockeError, Result};
use crate::types::{Match, Stage};
use memchr::memmem;
use regex::bytes::{Regex, RegexBuilder};

/// The three concrete pattern forms.
#[derive(Debug, Clone)]
pub enum PatternKind {
    /// A single byte-literal pattern.
    Bytes(Vec<u8>),
    /// A list of byte-literal patterns scanned independently.
    BytesList(Vec<Vec<u8>>),
    /// A regular expression over bytes.
    Regex(Regex),
}

/// A validated, immutable pattern.
pub struct Pattern {
    /// Scan stage this pattern belongs to.
    pub stage: Stage,
    /// Short human-friendly description.
    pub description: &'static str,
    /// Score contribution per match.
    pub weight: u64,
    /// Whether matching ignores ASCII case.
    pub nocase: bool,
    kind: PatternKind,
    filter: Option<fn(&Match) -> bool>,
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("stage", &self.stage)
            .field("description", &self.description)
            .field("weight", &self.weight)
            .field("nocase", &self.nocase)
            .field("kind", &self.kind)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

/// Builder for [`Pattern`].
///
/// Defaults mirror the plugin fields of the original detectors: stage 1,
/// weight 1, case-sensitive, no filter. Validation happens in
/// [`PatternBuilder::build`].
pub struct PatternBuilder {
    stage: Stage,
    description: &'static str,
    weight: u64,
    nocase: bool,
    filter: Option<fn(&Match) -> bool>,
    source: Source,
}

enum Source {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
    Regex(&'static str),
}

impl PatternBuilder {
    /// A single byte-literal pattern.
    pub fn bytes(description: &'static str, pattern: impl Into<Vec<u8>>) -> Self {
        Self::new(description, Source::Bytes(pattern.into()))
    }

    /// A list of byte-literal patterns.
    pub fn list<P: Into<Vec<u8>>, I: IntoIterator<Item = P>>(
        description: &'static str,
        patterns: I,
    ) -> Self {
        Self::new(
            description,
            Source::List(patterns.into_iter().map(Into::into).collect()),
        )
    }

    /// A regular expression over bytes.
    pub fn regex(description: &'static str, pattern: &'static str) -> Self {
        Self::new(description, Source::Regex(pattern))
    }

    fn new(description: &'static str, source: Source) -> Self {
        Self {
            stage: Stage::One,
            description,
            weight: 1,
            nocase: false,
            filter: None,
            source,
        }
    }

    /// Set the scan stage.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Set the per-match weight.
    pub fn weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }

    /// Ignore ASCII case when matching.
    pub fn nocase(mut self) -> Self {
        self.nocase = true;
        self
    }

    /// Post-filter candidate matches with a predicate.
    pub fn filter(mut self, filter: fn(&Match) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Validate and freeze the pattern.
    ///
    /// Empty literal lists are rejected; case-insensitive literals are
    /// lowercased here, once; regexes are compiled with Unicode disabled
    /// so classes and boundaries are byte-wise.
    pub fn build(self) -> Result<Pattern> {
        let invalid = |message: String| LockeError::InvalidPattern {
            description: self.description.to_string(),
            message,
        };
        let kind = match self.source {
            Source::Bytes(mut pat) => {
                if pat.is_empty() {
                    return Err(invalid("empty pattern".into()));
                }
                if self.nocase {
                    pat.make_ascii_lowercase();
                }
                PatternKind::Bytes(pat)
            }
            Source::List(mut pats) => {
                if pats.is_empty() || pats.iter().any(Vec::is_empty) {
                    return Err(invalid("empty byte list".into()));
                }
                if self.nocase {
                    for pat in &mut pats {
                        pat.make_ascii_lowercase();
                    }
                }
                PatternKind::BytesList(pats)
            }
            Source::Regex(pat) => {
                let re = RegexBuilder::new(pat)
                    .unicode(false)
                    .case_insensitive(self.nocase)
                    .build()
                    .map_err(|e| invalid(e.to_string()))?;
                PatternKind::Regex(re)
            }
        };
        Ok(Pattern {
            stage: self.stage,
            description: self.description,
            weight: self.weight,
            nocase: self.nocase,
            kind,
            filter: self.filter,
        })
    }
}

/// All non-overlapping occurrences of `pat` in `data`, left to right,
/// advancing past the end of each match.
pub fn find_literal(pat: &[u8], data: &[u8]) -> Vec<Match> {
    memmem::find_iter(data, pat)
        .map(|offset| Match::new(offset, data[offset..offset + pat.len()].to_vec()))
        .collect()
}

impl Pattern {
    /// All matches in `data`, before the filter hook.
    ///
    /// Literal matches are non-overlapping and ascend by offset; list
    /// patterns merge their sub-pattern hits into offset order; regex
    /// matching follows the engine's leftmost non-overlapping semantics.
    pub fn find_all(&self, data: &[u8]) -> Vec<Match> {
        match &self.kind {
            PatternKind::Bytes(pat) => find_literal(pat, data),
            PatternKind::BytesList(pats) => {
                let mut matches: Vec<Match> = pats
                    .iter()
                    .flat_map(|pat| find_literal(pat, data))
                    .collect();
                matches.sort_by_key(|m| m.offset);
                matches
            }
            PatternKind::Regex(re) => re
                .find_iter(data)
                .map(|m| Match::new(m.start(), m.as_bytes().to_vec()))
                .collect(),
        }
    }

    /// Find and filter matches.
    ///
    /// Case-insensitive patterns scan `lower`, the buffer lowercased once
    /// by the caller; all others scan `raw`.
    pub fn scan(&self, raw: &[u8], lower: &[u8]) -> Vec<Match> {
        let data = if self.nocase { lower } else { raw };
        let mut matches = self.find_all(data);
        if let Some(filter) = self.filter {
            matches.retain(|m| filter(m));
        }
        matches
    }
}

/// The start-up registry of built-in patterns.
#[derive(Debug)]
pub struct Registry {
    patterns: Vec<Pattern>,
}

impl Registry {
    /// Build and validate every built-in pattern.
    pub fn builtin() -> Result<Self> {
        let mut patterns = stage1::patterns()?;
        patterns.extend(stage2::patterns()?);
        Ok(Self { patterns })
    }

    /// Every registered pattern, in registration order.
    pub fn all(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The registered patterns for one stage.
    pub fn stage(&self, stage: Stage) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(move |p| p.stage == stage)
    }
}
