// SimpleLogs - core/filter.rs
//
// Composable filter engine for log entries.
// All active filters are AND-combined.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{Level, LogEntry};

/// Complete filter state. All fields are AND-combined when applied.
///
/// Transient: rebuilt from command-line flags on every invocation and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Substring search over message, tag, level and timestamp
    /// (case-insensitive). Empty = no filter.
    pub search_text: String,

    /// Exact level to include. None = all levels.
    pub level: Option<Level>,

    /// Substring the tag must contain (case-insensitive). Empty = no filter.
    pub tag: String,

    /// Only pinned entries.
    pub pinned_only: bool,
}

impl FilterConfig {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        !self.pinned_only
            && self.level.is_none()
            && self.tag.trim().is_empty()
            && self.search_text.trim().is_empty()
    }

    /// Quick-filter for pinned entries only.
    pub fn pinned() -> Self {
        Self {
            pinned_only: true,
            ..Default::default()
        }
    }
}

/// Apply filters to a slice of entries, returning the matching entries in
/// their original order.
///
/// An empty result is an ordinary outcome; callers render "no results".
pub fn apply_filter<'a>(entries: &'a [LogEntry], filter: &FilterConfig) -> Vec<&'a LogEntry> {
    if filter.is_empty() {
        return entries.iter().collect();
    }

    let search_lower = filter.search_text.trim().to_lowercase();
    let tag_lower = filter.tag.trim().to_lowercase();

    entries
        .iter()
        .filter(|entry| matches_all(entry, filter, &search_lower, &tag_lower))
        .collect()
}

/// Check if a single entry matches all active filters.
fn matches_all(entry: &LogEntry, filter: &FilterConfig, search_lower: &str, tag_lower: &str) -> bool {
    if filter.pinned_only && !entry.pinned {
        return false;
    }

    if let Some(level) = filter.level {
        if entry.level != level {
            return false;
        }
    }

    if !tag_lower.is_empty() && !entry.tag.to_lowercase().contains(tag_lower) {
        return false;
    }

    if !search_lower.is_empty() {
        let haystack = format!(
            "{} {} {} {}",
            entry.message,
            entry.tag,
            entry.level.as_str(),
            entry.iso_timestamp()
        )
        .to_lowercase();
        if !haystack.contains(search_lower) {
            return false;
        }
    }

    true
}
