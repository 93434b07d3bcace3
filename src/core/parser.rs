// SimpleLogs - core/parser.rs
//
// Best-effort conversion of pasted or imported free text into draft entries.
// Core layer: works on `&str`, never touches the filesystem.
//
// Split policy, per non-blank line:
//   [LEVEL] [tag] message
//   - LEVEL is INFO/WARN/ERROR/DEBUG in any case, optionally bracketed or
//     followed by a colon, and must then be followed by whitespace or end of
//     line.
//   - The tag is only taken when a level was recognised, and only when some
//     message text follows it. A bracketed tag may be empty (`[]`).
//   - Without a level the whole line is the message.
// Free text has no delimiter convention, so this is a heuristic: it never
// fails, it just may not recover the structure the author had in mind.

use crate::core::model::{DraftEntry, Level};
use regex::Regex;
use std::sync::OnceLock;

/// Leading level keyword, then the remainder of the line.
fn level_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\[?(debug|info|warn|error)\]?:?(?:\s+(.*))?$")
            .expect("level prefix pattern is valid")
    })
}

/// Tag token (bare word or `[bracketed]`), whitespace, then the message.
fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\[[^\]]*\]|\S+)\s+(\S.*)$").expect("tag pattern is valid")
    })
}

/// Parse raw text into draft entries, one per non-blank line, in line order.
pub fn parse_text(raw: &str) -> Vec<DraftEntry> {
    // `lines()` splits on both `\n` and `\r\n`.
    let drafts: Vec<DraftEntry> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect();

    tracing::debug!(drafts = drafts.len(), "Parsed pasted text");
    drafts
}

/// Parse one already-trimmed, non-blank line.
pub fn parse_line(line: &str) -> DraftEntry {
    let Some(caps) = level_prefix_regex().captures(line) else {
        return DraftEntry::new(Level::Info, "", line);
    };

    let level = caps
        .get(1)
        .map(|m| Level::parse_lossy(m.as_str()))
        .unwrap_or_default();
    let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");

    if rest.is_empty() {
        // A bare level keyword: keep the line so the message is never empty.
        return DraftEntry::new(level, "", line);
    }

    match tag_regex().captures(rest) {
        Some(tc) => {
            let tag = tc[1].trim_start_matches('[').trim_end_matches(']').trim();
            DraftEntry::new(level, tag, tc[2].trim())
        }
        None => DraftEntry::new(level, "", rest),
    }
}
