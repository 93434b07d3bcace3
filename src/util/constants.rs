// SimpleLogs - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SimpleLogs";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SimpleLogs";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Storage
// =============================================================================

/// Default key-value slot holding the persisted collection.
///
/// The `:v1` suffix versions the on-disk layout; a new layout gets a new slot
/// so an older binary never misreads newer data.
pub const DEFAULT_STORAGE_KEY: &str = "simplelogs:v1";

/// Extension of the file backing a storage slot.
pub const STORAGE_FILE_EXTENSION: &str = "json";

/// Maximum length of a storage key. Keys become file names.
pub const MAX_STORAGE_KEY_LENGTH: usize = 64;

// =============================================================================
// Timestamps
// =============================================================================

/// Canonical ISO-8601 rendering of entry timestamps (UTC, millisecond
/// precision, `Z` suffix), e.g. `2024-01-01T00:00:00.000Z`.
pub const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Label format for minute buckets in the timeline series.
pub const MINUTE_BUCKET_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Label format for hour buckets in the timeline series.
pub const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d %H:00";

// =============================================================================
// Import limits
// =============================================================================

/// Default maximum size of a file accepted by `import`.
pub const DEFAULT_MAX_IMPORT_FILE_SIZE: u64 = 16 * 1024 * 1024; // 16 MB

/// Minimum user-configurable import size limit.
pub const MIN_MAX_IMPORT_FILE_SIZE: u64 = 1024; // 1 KB

/// Hard upper bound on the import size limit (prevents configuration mistakes).
pub const ABSOLUTE_MAX_IMPORT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

// =============================================================================
// Export
// =============================================================================

/// Prefix of generated export file names (`simplelogs-<timestamp>.<ext>`).
pub const EXPORT_FILE_PREFIX: &str = "simplelogs";

/// Title used in the HTML report.
pub const HTML_REPORT_TITLE: &str = "Log Report";

/// Fixed CSV header row.
pub const CSV_HEADER: &str = "timestamp,level,tag,message";

// =============================================================================
// Statistics
// =============================================================================

/// Number of tags listed under "Top tags" by the `stats` command.
pub const DEFAULT_TOP_TAGS: usize = 10;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Diagnostics go to stderr, so the default stays quiet
/// enough not to interleave with command output.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
