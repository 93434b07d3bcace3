// SimpleLogs - core/timeline.rs
//
// Time-bucketed entry counts for the activity chart.
// Buckets are UTC minutes or hours, returned oldest first.

use crate::core::model::LogEntry;
use crate::util::constants::{HOUR_BUCKET_FORMAT, MINUTE_BUCKET_FORMAT};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Width of a timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Minute,
    Hour,
}

impl Granularity {
    fn width(self) -> TimeDelta {
        match self {
            Granularity::Minute => TimeDelta::minutes(1),
            Granularity::Hour => TimeDelta::hours(1),
        }
    }

    fn label_format(self) -> &'static str {
        match self {
            Granularity::Minute => MINUTE_BUCKET_FORMAT,
            Granularity::Hour => HOUR_BUCKET_FORMAT,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
        })
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            other => Err(format!(
                "unknown granularity \"{other}\", expected \"minute\" or \"hour\""
            )),
        }
    }
}

/// One point of the count series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket start, e.g. `2024-01-01 09:05` or `2024-01-01 09:00`.
    pub label: String,
    pub count: usize,
}

/// Group entries by truncated timestamp. Input order does not matter; the
/// series always ends with the most recent bucket.
pub fn bucket_counts<'a, I>(entries: I, granularity: Granularity) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let width = granularity.width();
    let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();

    for entry in entries {
        // Rounding only fails for widths the timestamp range cannot hold,
        // which a minute or an hour never is; keep the raw time if it does.
        let start = entry
            .timestamp
            .duration_trunc(width)
            .unwrap_or(entry.timestamp);
        *counts.entry(start).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(start, count)| Bucket {
            label: start.format(granularity.label_format()).to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EntryId, Level};
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> LogEntry {
        LogEntry {
            id: EntryId::generate(),
            timestamp: Utc.with_ymd_and_hms(2024, 2, 29, h, m, s).unwrap(),
            level: Level::Info,
            tag: String::new(),
            message: "m".to_string(),
            pinned: false,
        }
    }

    #[test]
    fn test_minute_buckets_oldest_first() {
        // Newest-first, as stored.
        let entries = vec![at(10, 6, 1), at(10, 5, 59), at(10, 5, 0), at(9, 59, 30)];
        let series = bucket_counts(&entries, Granularity::Minute);
        assert_eq!(
            series,
            vec![
                Bucket {
                    label: "2024-02-29 09:59".to_string(),
                    count: 1,
                },
                Bucket {
                    label: "2024-02-29 10:05".to_string(),
                    count: 2,
                },
                Bucket {
                    label: "2024-02-29 10:06".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_hour_buckets() {
        let entries = vec![at(10, 6, 1), at(10, 5, 59), at(9, 59, 30)];
        let series = bucket_counts(&entries, Granularity::Hour);
        let labels: Vec<_> = series.iter().map(|b| (b.label.as_str(), b.count)).collect();
        assert_eq!(labels, vec![("2024-02-29 09:00", 1), ("2024-02-29 10:00", 2)]);
    }

    #[test]
    fn test_empty_series() {
        let entries: Vec<LogEntry> = Vec::new();
        assert!(bucket_counts(&entries, Granularity::Hour).is_empty());
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("Hour".parse::<Granularity>(), Ok(Granularity::Hour));
        assert!("day".parse::<Granularity>().is_err());
    }
}
