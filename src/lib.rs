//! Locke - Byte-Wise Deobfuscation Search
//!
//! This library attempts to deobfuscate opaque binary blobs (typically
//! malware samples) in which interesting payloads have been hidden behind
//! a cheap byte-wise encoding: XOR, add, rotate, or a short composition
//! thereof. It enumerates a large family of candidate inverse transforms,
//! applies each to the input, scores the result by how many interesting
//! patterns it contains, and surfaces the top candidates.
//!
//! # How a crack works
//!
//! 1. Every enabled transform family lazily enumerates its parameter
//!    space (the built-ins span tens of thousands of candidates).
//! 2. A wide stage-1 scan evaluates each candidate in parallel against
//!    cheap literal patterns (header magics, API names) and keeps the
//!    top K.
//! 3. A narrow stage-2 pass re-scores the survivors against richer
//!    regex-based patterns (IPv4 addresses, URLs, base64 blobs) and
//!    keeps the top S, whose decoded bytes can be written to disk.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locke::{crack_bytes, transforms, CrackOptions};
//!
//! fn main() -> locke::Result<()> {
//!     let data = std::fs::read("sample.bin")?;
//!     let selection = transforms::select_families(Some("xor,rol"), None, 3, false)?;
//!     let work = transforms::expand_families(&selection.families, "transforms.db".as_ref())?;
//!     for result in crack_bytes(&data, work, &CrackOptions::default())? {
//!         println!("{}: score {}", result.transform.name(), result.score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Pure pattern scanning of an already-plain input is available through
//! [`scan_bytes`] / [`scan_file`].

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;
pub mod input;
pub mod patterns;
pub mod report;
pub mod search;
pub mod transforms;
pub mod types;

pub use error::{LockeError, Result};
pub use patterns::{Pattern, PatternBuilder, PatternKind, Registry};
pub use transforms::{Family, Params, Transform, ALL_FAMILIES};
pub use types::{CrackOptions, Direction, Match, PatternHits, RankedResult, Stage};

use std::path::Path;

/// Scan a plain, already-deobfuscated buffer with the stage-2 patterns.
///
/// Returns one entry per pattern with matches, ascending by offset.
pub fn scan_bytes(data: &[u8]) -> Result<Vec<PatternHits>> {
    let registry = Registry::builtin()?;
    Ok(engine::scan_stage(&registry, Stage::Two, data))
}

/// Scan a file with the stage-2 patterns. See [`scan_bytes`].
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<Vec<PatternHits>> {
    let data = std::fs::read(path)?;
    scan_bytes(&data)
}

/// Run the full two-stage search over `work`.
///
/// `work` is an expanded candidate set, typically produced by
/// [`transforms::select_families`] followed by
/// [`transforms::expand_families`].
pub fn crack_bytes(
    data: &[u8],
    work: Vec<Transform>,
    options: &CrackOptions,
) -> Result<Vec<RankedResult>> {
    let registry = Registry::builtin()?;
    Ok(search::run(&registry, work, data, options))
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_scan_bytes_finds_network_indicators() {
        let report = scan_bytes(b"beacon to http://c2.example.net/gate.php every 60s").unwrap();
        assert!(report
            .iter()
            .any(|h| h.description == "Common URL (http/https/ftp)"));
    }

    #[test]
    fn test_crack_bytes_smoke() {
        let data = b"This program cannot be run in DOS mode".to_vec();
        let work: Vec<Transform> = Family::Rol
            .iterate()
            .map(|p| Transform::new(Family::Rol, p))
            .collect();
        let results = crack_bytes(&data, work, &CrackOptions::default()).unwrap();
        assert_eq!(results.len(), 7);
    }
}
