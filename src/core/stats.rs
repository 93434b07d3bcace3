// SimpleLogs - core/stats.rs
//
// Frequency tables over a log collection.

use crate::core::model::{Level, LogEntry};
use std::collections::HashMap;

/// Aggregated statistics.
///
/// An empty collection is its own variant so callers can tell "no logs yet"
/// apart from a real summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stats {
    Empty,
    Summary(Summary),
}

/// Counts over a non-empty collection.
///
/// Both tables are in order of first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub by_level: Vec<(Level, usize)>,
    /// Entries with an empty tag are not counted here.
    pub by_tag: Vec<(String, usize)>,
}

impl Summary {
    /// Count for one level (0 when absent).
    pub fn level_count(&self, level: Level) -> usize {
        self.by_level
            .iter()
            .find(|(l, _)| *l == level)
            .map_or(0, |(_, c)| *c)
    }

    /// The `n` most frequent tags, most frequent first. Ties keep
    /// first-occurrence order.
    pub fn top_tags(&self, n: usize) -> Vec<(&str, usize)> {
        let mut tags: Vec<(&str, usize)> =
            self.by_tag.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        // Stable sort keeps first-occurrence order among equal counts.
        tags.sort_by(|a, b| b.1.cmp(&a.1));
        tags.truncate(n);
        tags
    }
}

/// Single pass over `entries`.
pub fn aggregate<'a, I>(entries: I) -> Stats
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut total = 0usize;
    let mut by_level: Vec<(Level, usize)> = Vec::new();
    let mut by_tag: Vec<(String, usize)> = Vec::new();
    let mut tag_index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        total += 1;

        match by_level.iter_mut().find(|(l, _)| *l == entry.level) {
            Some((_, count)) => *count += 1,
            None => by_level.push((entry.level, 1)),
        }

        if entry.tag.is_empty() {
            continue;
        }
        match tag_index.get(entry.tag.as_str()) {
            Some(&idx) => by_tag[idx].1 += 1,
            None => {
                tag_index.insert(entry.tag.as_str(), by_tag.len());
                by_tag.push((entry.tag.clone(), 1));
            }
        }
    }

    if total == 0 {
        return Stats::Empty;
    }

    Stats::Summary(Summary {
        total,
        by_level,
        by_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::EntryId;
    use chrono::Utc;

    fn make_entry(level: Level, tag: &str) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            timestamp: Utc::now(),
            level,
            tag: tag.to_string(),
            message: "m".to_string(),
            pinned: false,
        }
    }

    #[test]
    fn test_empty_collection_is_distinguished() {
        let entries: Vec<LogEntry> = Vec::new();
        assert_eq!(aggregate(&entries), Stats::Empty);
    }

    #[test]
    fn test_counts_in_first_occurrence_order() {
        let entries = vec![
            make_entry(Level::Warn, "db"),
            make_entry(Level::Info, ""),
            make_entry(Level::Warn, "api"),
            make_entry(Level::Error, "db"),
        ];
        let Stats::Summary(summary) = aggregate(&entries) else {
            panic!("expected a summary");
        };
        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.by_level,
            vec![(Level::Warn, 2), (Level::Info, 1), (Level::Error, 1)]
        );
        assert_eq!(
            summary.by_tag,
            vec![("db".to_string(), 2), ("api".to_string(), 1)]
        );
        assert_eq!(summary.level_count(Level::Debug), 0);
    }

    #[test]
    fn test_untagged_only_has_empty_tag_table() {
        let entries = vec![make_entry(Level::Info, ""), make_entry(Level::Info, "")];
        let Stats::Summary(summary) = aggregate(&entries) else {
            panic!("expected a summary");
        };
        assert!(summary.by_tag.is_empty());
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_top_tags_sorted_with_stable_ties() {
        let entries = vec![
            make_entry(Level::Info, "a"),
            make_entry(Level::Info, "b"),
            make_entry(Level::Info, "c"),
            make_entry(Level::Info, "c"),
            make_entry(Level::Info, "b"),
        ];
        let Stats::Summary(summary) = aggregate(&entries) else {
            panic!("expected a summary");
        };
        assert_eq!(summary.top_tags(2), vec![("b", 2), ("c", 2)]);
    }
}
