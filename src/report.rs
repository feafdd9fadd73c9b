//! Ranked-result reporting and decoded-output writing.
//!
//! Renders the stage-2 ranking at three verbosity levels, writes each
//! non-zero-score decoded buffer to `<stem>_<rank>_<shortname><ext>`
//! alongside the input, and records the ranked summary in a companion
//! `.cracklog` file.

use crate::error::Result;
use crate::types::{Direction, RankedResult};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Maximum rendered length of a match preview before truncation.
const PREVIEW_LIMIT: usize = 50;

/// Render bytes the way a Python bytes repr would, without the `b`
/// prefix: printable ASCII stays, everything else becomes `\xNN`.
pub fn prettyhex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() + 2);
    out.push('\'');
    for &b in data {
        match b {
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push('\'');
    out
}

/// A truncated [`prettyhex`] rendering: long previews keep the head and
/// tail around an ellipsis.
pub fn preview(data: &[u8]) -> String {
    let s = prettyhex(data);
    if s.len() <= PREVIEW_LIMIT {
        return s;
    }
    let head: String = s.chars().take(24).collect();
    let tail_len = s.chars().count().saturating_sub(23);
    let tail: String = s.chars().skip(tail_len).collect();
    format!("{head}...{tail}")
}

/// Where the decoded buffer for `rank` goes:
/// `<stem>_<rank>_<shortname><ext>` next to the input.
pub fn output_path(input: &Path, rank: usize, shortname: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input
        .with_file_name(format!("{stem}_{rank}_{shortname}{ext}"))
}

/// The companion log path: `<input>.cracklog`.
pub fn cracklog_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".cracklog");
    PathBuf::from(name)
}

/// Hex rendering of matched bytes for the most verbose output level,
/// truncated the same way as [`preview`].
fn hex_snippet(data: &[u8]) -> String {
    let s = hex::encode(data);
    if s.len() <= PREVIEW_LIMIT {
        return s;
    }
    format!("{}...{}", &s[..24], &s[s.len() - 23..])
}

/// Render the ranked results.
///
/// Verbosity 0 prints per-pattern counts; 1 adds per-match offsets;
/// 2 adds hex snippets and escaped previews per offset.
pub fn format_results(results: &[RankedResult], verbosity: u8) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "Rank {}: {} | score {}",
            i + 1,
            result.transform.name(),
            result.score
        );
        for hits in &result.report {
            let _ = writeln!(
                out,
                "    {} x {} (weight {})",
                hits.matches.len(),
                hits.description,
                hits.weight
            );
            if verbosity >= 1 {
                for m in &hits.matches {
                    if verbosity >= 2 {
                        let _ = writeln!(
                            out,
                            "        at {:08X}: {} {}",
                            m.offset,
                            hex_snippet(&m.data),
                            preview(&m.data)
                        );
                    } else {
                        let _ = writeln!(out, "        at {:08X}", m.offset);
                    }
                }
            }
        }
    }
    out
}

/// The outcome of writing one ranked result.
#[derive(Debug)]
pub struct WriteOutcome {
    /// 1-based rank of the result.
    pub rank: usize,
    /// Human name of the transform.
    pub name: String,
    /// The path written, or `None` when the zero score skipped the write.
    pub path: Option<PathBuf>,
}

/// Write each non-zero-score decoded buffer next to the input.
///
/// The transform is re-applied here; the search driver does not keep the
/// decoded buffers around between stages.
pub fn write_results(
    results: &[RankedResult],
    data: &[u8],
    input: &Path,
) -> Result<Vec<WriteOutcome>> {
    let mut outcomes = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        let rank = i + 1;
        if result.score == 0 {
            outcomes.push(WriteOutcome {
                rank,
                name: result.transform.name(),
                path: None,
            });
            continue;
        }
        let decoded = result.transform.apply(data, Direction::Decode);
        let path = output_path(input, rank, &result.transform.shortname());
        std::fs::write(&path, decoded)?;
        tracing::debug!(rank, path = %path.display(), "wrote decoded output");
        outcomes.push(WriteOutcome {
            rank,
            name: result.transform.name(),
            path: Some(path),
        });
    }
    Ok(outcomes)
}

/// Record the ranked summary in `<input>.cracklog`.
pub fn write_cracklog(results: &[RankedResult], input: &Path) -> Result<PathBuf> {
    let path = cracklog_path(input);
    std::fs::write(&path, format_results(results, 1))?;
    Ok(path)
}

/// One `search --csv` output row.
#[derive(Debug, Serialize)]
pub struct CsvRecord {
    /// Scanned file.
    #[serde(rename = "Filename")]
    pub filename: String,
    /// Match offset, `0x%08X`.
    #[serde(rename = "Index")]
    pub offset: String,
    /// Pattern description.
    #[serde(rename = "Pattern name")]
    pub pattern: String,
    /// Escaped preview of the matched bytes.
    #[serde(rename = "Match")]
    pub matched: String,
    /// Match length in bytes.
    #[serde(rename = "Length")]
    pub length: usize,
}

/// Print an aligned two-dimensional table.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }
    let mut out = String::new();
    let render = |out: &mut String, cells: &[String]| {
        for (i, cell) in cells.iter().enumerate() {
            let _ = write!(out, "{:<width$}  ", cell, width = widths[i]);
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    };
    render(
        &mut out,
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    );
    for row in rows {
        render(&mut out, row);
    }
    out
}
