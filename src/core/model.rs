// SimpleLogs - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.
//
// The serialised shape of `LogEntry` is the persisted layout:
//   {"id": "...", "ts": "2024-01-01T00:00:00.000Z", "level": "info",
//    "tag": "", "msg": "...", "pinned": false}

use crate::util::constants::ISO_TIMESTAMP_FORMAT;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Level
// =============================================================================

/// Severity of an entry. The set is fixed; anything unrecognised is `Info`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "String", into = "&'static str")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    /// Returns all variants in display order (least severe first).
    pub fn all() -> &'static [Level] {
        &[Level::Debug, Level::Info, Level::Warn, Level::Error]
    }

    /// Lower-case name, as persisted and searched.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Upper-case label used by the clipboard format.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Strict, case-insensitive parse. `None` for anything outside the set.
    pub fn parse(raw: &str) -> Option<Level> {
        let raw = raw.trim();
        Level::all()
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(raw))
    }

    /// Case-insensitive parse that falls back to `Info`.
    pub fn parse_lossy(raw: &str) -> Level {
        Level::parse(raw).unwrap_or_default()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored data written by older or foreign producers may carry levels outside
// the set; they degrade to Info instead of failing the whole load.
impl From<String> for Level {
    fn from(raw: String) -> Self {
        Level::parse_lossy(&raw)
    }
}

impl From<Level> for &'static str {
    fn from(level: Level) -> Self {
        level.as_str()
    }
}

// =============================================================================
// Entry identifier
// =============================================================================

/// Opaque, immutable entry identifier.
///
/// New ids are random UUIDs. Ids read back from storage are kept verbatim,
/// whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Log entry
// =============================================================================

/// A single stored log record.
///
/// Everything except `pinned` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,

    /// Creation time, millisecond precision.
    #[serde(rename = "ts", with = "iso_millis")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub level: Level,

    /// Free text, possibly empty.
    #[serde(default)]
    pub tag: String,

    /// Trimmed, never empty when created through the repository.
    #[serde(rename = "msg")]
    pub message: String,

    #[serde(default)]
    pub pinned: bool,
}

impl LogEntry {
    /// Build a new unpinned entry from a draft, stamped with `created`.
    ///
    /// The timestamp is truncated to milliseconds so that what is persisted is
    /// exactly what is held in memory.
    pub fn from_draft(draft: DraftEntry, created: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::generate(),
            timestamp: created.trunc_subsecs(3),
            level: draft.level,
            tag: draft.tag,
            message: draft.message,
            pinned: false,
        }
    }

    /// Canonical ISO-8601 timestamp string, e.g. `2024-01-01T00:00:00.000Z`.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.format(ISO_TIMESTAMP_FORMAT).to_string()
    }
}

/// Parser output: an entry before it has an id, timestamp, or pin state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftEntry {
    pub level: Level,
    pub tag: String,
    pub message: String,
}

impl DraftEntry {
    pub fn new(level: Level, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            tag: tag.into(),
            message: message.into(),
        }
    }
}

/// Serde adapter: millisecond ISO-8601 with a `Z` suffix on write, any
/// RFC 3339 timestamp on read.
pub(crate) mod iso_millis {
    use crate::util::constants::ISO_TIMESTAMP_FORMAT;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(ISO_TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
