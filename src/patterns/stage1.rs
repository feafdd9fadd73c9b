//! Stage-1 built-in patterns: cheap structural signals.
//!
//! These are the literal detectors used during the wide scan: document
//! and executable header magics, strings common to PE files, and API /
//! DLL / registry names worth surfacing.

use super::{Pattern, PatternBuilder};
use crate::error::Result;

/// Build the stage-1 pattern set.
pub fn patterns() -> Result<Vec<Pattern>> {
    Ok(vec![
        PatternBuilder::bytes("OLE2 header magic", &b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1"[..])
            .weight(10)
            .build()?,
        PatternBuilder::bytes("VBA Macros", &b"VBA"[..]).build()?,
        PatternBuilder::list(
            "Flash OLE signatures",
            [
                &b"ShockwaveFlash.ShockwaveFlash"[..],
                &b"S\x00h\x00o\x00c\x00k\x00w\x00a\x00v\x00e\x00F\x00l\x00a\x00s\x00h"[..],
            ],
        )
        .weight(10)
        .build()?,
        PatternBuilder::list("PDF signatures", [&b"%PDF-"[..], &b"%EOF"[..]])
            .weight(10)
            .build()?,
        PatternBuilder::list("RTF signatures", [&b"{\\rtf"[..], &b"{\\object"[..]])
            .weight(10)
            .build()?,
        PatternBuilder::bytes(
            "DOS compatibility message",
            &b"This program cannot be run in DOS mode"[..],
        )
        .weight(1000)
        .build()?,
        PatternBuilder::bytes("PE header magic", &b"PE"[..]).build()?,
        PatternBuilder::list("EXE MZ header magics", [&b"MZ"[..], &b"ZM"[..]]).build()?,
        PatternBuilder::list(
            "PE section names",
            [
                &b".text"[..],
                &b".data"[..],
                &b".rdata"[..],
                &b".rsrc"[..],
                &b".reloc"[..],
            ],
        )
        .build()?,
        PatternBuilder::list(
            "Common EXE strings",
            [
                &b"program"[..],
                &b"cannot"[..],
                &b"mode"[..],
                &b"microsoft"[..],
                &b"kernel32"[..],
                &b"version"[..],
                &b"assembly"[..],
                &b"xmlns"[..],
                &b"schemas"[..],
                &b"manifestVersion"[..],
                &b"security"[..],
                &b"win32"[..],
            ],
        )
        .nocase()
        .weight(100_000)
        .build()?,
        PatternBuilder::list(
            "Common Win32 function names",
            [&b"GetCurrent"[..], &b"Thread"[..]],
        )
        .nocase()
        .weight(10_000)
        .build()?,
        PatternBuilder::list(
            "Interesting Win32 function names",
            [
                &b"WriteFile"[..],
                &b"IsDebuggerPresent"[..],
                &b"RegSetValue"[..],
                &b"CreateRemoteThread"[..],
            ],
        )
        .nocase()
        .weight(10_000)
        .build()?,
        PatternBuilder::list(
            "Interesting WinSock function names",
            [&b"WSASocket"[..], &b"WSASend"[..], &b"WSARecv"[..]],
        )
        .nocase()
        .weight(10_000)
        .build()?,
        PatternBuilder::list("Interesting DLLs", [&b"WS2_32.dll"[..]])
            .nocase()
            .weight(10_000)
            .build()?,
        PatternBuilder::list(
            "Interesting registry keys",
            [&b"CurrentVersion\\Run"[..], &b"UserInit"[..]],
        )
        .weight(10_000)
        .build()?,
        PatternBuilder::bytes(
            "Possibly compiled with Microsoft Visual C++",
            &b"Microsoft Visual C++"[..],
        )
        .weight(10_000)
        .build()?,
    ])
}
