//! Stage-2 built-in patterns: richer detectors for refinement.
//!
//! Regex-based network indicators, encoded-data blobs, readable-text
//! heuristics, and the full MZ-to-PE header span.

use super::{Pattern, PatternBuilder};
use crate::error::Result;
use crate::types::{Match, Stage};
use std::net::Ipv4Addr;

/// Accept only candidates that parse as an IPv4 address.
///
/// The dotted-quad regex happily matches strings like `999.1.2.3`;
/// parsing rejects them. Bogon and reserved-range rejection is
/// intentionally disabled: malware does use those ranges.
fn ipv4_parses(m: &Match) -> bool {
    std::str::from_utf8(&m.data)
        .ok()
        .and_then(|s| s.parse::<Ipv4Addr>().ok())
        .is_some()
}

/// Build the stage-2 pattern set.
pub fn patterns() -> Result<Vec<Pattern>> {
    Ok(vec![
        PatternBuilder::regex("IPv4 address", r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b")
            .stage(Stage::Two)
            .weight(100)
            .filter(ipv4_parses)
            .build()?,
        PatternBuilder::regex(
            "Email address",
            r"(?i)\b[A-Z0-9._%+-]+@(?:[A-Z0-9-]+\.)+(?:[A-Z]{2,12}|XN--[A-Z0-9]{4,18})\b",
        )
        .stage(Stage::Two)
        .weight(10)
        .build()?,
        PatternBuilder::regex(
            "Common URL (http/https/ftp)",
            r"(http|https|ftp)://[a-zA-Z0-9\-\.]+\.[a-zA-Z]{2,3}(:[a-zA-Z0-9]*)?/?([a-zA-Z0-9\-\._\?,'/\\\+&%\$#=~])*[^\.,\)\(\s]",
        )
        .stage(Stage::Two)
        .weight(10_000)
        .build()?,
        PatternBuilder::list(
            "IRC protocol strings",
            [&b"PRIVMSG"[..], &b"CONNECT"[..], &b"DCC"[..], &b"XDCC"[..]],
        )
        .stage(Stage::Two)
        .nocase()
        .weight(100)
        .build()?,
        PatternBuilder::regex("Hexadecimal string blob (>= 32 bytes)", r"[A-F0-9]{32,}")
            .stage(Stage::Two)
            .nocase()
            .build()?,
        PatternBuilder::regex(
            "Base64 string blob",
            r"(?:[A-Za-z0-9+/]{4}){2,}(?:[A-Za-z0-9+/]{2}[AEIMQUYcgkosw048]=|[A-Za-z0-9+/][AQgw]==)",
        )
        .stage(Stage::Two)
        .build()?,
        PatternBuilder::regex(
            "Any word longer >= 6 characters",
            r"\b(?:[A-Z]{6,}|[A-Za-z][a-z]{5,})\b",
        )
        .stage(Stage::Two)
        .build()?,
        PatternBuilder::regex("Any sentence of >= 3 words", r"([A-Za-z]{2,}\s){2,}[A-Za-z]{2,}")
            .stage(Stage::Two)
            .build()?,
        PatternBuilder::regex("CamelCase word", r"\b([A-Z][a-z0-9]{2,}){2,}\b")
            .stage(Stage::Two)
            .build()?,
        PatternBuilder::regex(
            "MZ header followed by PE header",
            r"(?s)MZ.{32,1024}PE\x00\x00",
        )
        .stage(Stage::Two)
        .weight(100)
        .build()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(description: &str) -> Pattern {
        patterns()
            .unwrap()
            .into_iter()
            .find(|p| p.description == description)
            .unwrap()
    }

    #[test]
    fn test_all_patterns_validate() {
        let pats = patterns().unwrap();
        assert_eq!(pats.len(), 10);
        assert!(pats.iter().all(|p| p.stage == Stage::Two));
    }

    #[test]
    fn test_ipv4_filter_rejects_unparseable() {
        let pat = find("IPv4 address");
        let data = b"connect to 10.0.0.1 or 8.8.8.8 but never 999.1.2.3 ok";
        let lower = data.to_vec();
        let matches = pat.scan(data, &lower);
        let found: Vec<&[u8]> = matches.iter().map(|m| m.data.as_slice()).collect();
        assert_eq!(found, vec![&b"10.0.0.1"[..], &b"8.8.8.8"[..]]);
    }

    #[test]
    fn test_url_pattern() {
        let pat = find("Common URL (http/https/ftp)");
        let data = b"payload at http://evil.example.com/dropper.bin here";
        let matches = pat.find_all(data);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].data.starts_with(b"http://evil.example.com"));
    }

    #[test]
    fn test_email_pattern() {
        let pat = find("Email address");
        let matches = pat.find_all(b"contact c2-ops@badhost.net today");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].data, b"c2-ops@badhost.net");
    }

    #[test]
    fn test_mz_pe_span_requires_bounded_gap() {
        let pat = find("MZ header followed by PE header");

        let mut ok = Vec::new();
        ok.extend_from_slice(b"MZ\x90\x00\x03");
        ok.extend_from_slice(&vec![0u8; 512]);
        ok.extend_from_slice(b"PE\x00\x00");
        assert_eq!(pat.find_all(&ok).len(), 1);

        // a gap under 32 bytes does not qualify
        let mut short = Vec::new();
        short.extend_from_slice(b"MZ");
        short.extend_from_slice(&vec![0u8; 8]);
        short.extend_from_slice(b"PE\x00\x00");
        assert!(pat.find_all(&short).is_empty());
    }

    #[test]
    fn test_hex_blob_is_case_insensitive() {
        let pat = find("Hexadecimal string blob (>= 32 bytes)");
        let raw = b"..deadBEEFdeadbeefDEADBEEFdeadbeef..";
        let lower = raw.to_ascii_lowercase();
        assert_eq!(pat.scan(raw, &lower).len(), 1);
    }

    #[test]
    fn test_camel_case_word() {
        let pat = find("CamelCase word");
        let matches = pat.find_all(b"call GetCurrentThread now");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].data, b"GetCurrentThread");
    }
}
