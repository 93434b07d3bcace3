// SimpleLogs - platform/config.rs
//
// Platform-specific data directory resolution, and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::timeline::Granularity;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SimpleLogs data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/simplelogs/ or %APPDATA%\SimpleLogs\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the storage slots.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[import]` section.
    pub import: ImportSection,
    /// `[timeline]` section.
    pub timeline: TimelineSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding the storage slots (overrides the platform default).
    pub data_dir: Option<String>,
    /// Name of the key-value slot holding the collection.
    pub key: Option<String>,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Largest file accepted by `import`, in bytes.
    pub max_file_size_bytes: Option<u64>,
}

/// `[timeline]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TimelineSection {
    /// "minute" or "hour".
    pub granularity: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Storage --
    /// Data directory override. None = platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Storage slot name.
    pub storage_key: String,

    // -- Import --
    /// Largest importable file in bytes.
    pub max_import_file_size: u64,

    // -- Timeline --
    /// Default bucket width for the `timeline` command.
    pub timeline_granularity: Granularity,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: constants::DEFAULT_STORAGE_KEY.to_string(),
            max_import_file_size: constants::DEFAULT_MAX_IMPORT_FILE_SIZE,
            timeline_granularity: Granularity::default(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Location of `config.toml` inside a config directory.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning -- the
/// application still runs but the user is informed.
///
/// Runs before logging is initialised (the config picks the log level), so
/// problems are reported through the returned warnings only.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let config = validate(raw, &mut warnings);
    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Storage: data_dir --
    if let Some(dir) = raw.storage.data_dir {
        if !dir.trim().is_empty() {
            config.data_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Storage: key --
    if let Some(key) = raw.storage.key {
        let key = key.trim();
        if key.is_empty() || key.len() > constants::MAX_STORAGE_KEY_LENGTH {
            warnings.push(format!(
                "[storage] key = \"{key}\" must be 1-{} characters. Using default (\"{}\").",
                constants::MAX_STORAGE_KEY_LENGTH,
                constants::DEFAULT_STORAGE_KEY,
            ));
        } else {
            config.storage_key = key.to_string();
        }
    }

    // -- Import: max_file_size_bytes --
    if let Some(size) = raw.import.max_file_size_bytes {
        if (constants::MIN_MAX_IMPORT_FILE_SIZE..=constants::ABSOLUTE_MAX_IMPORT_FILE_SIZE)
            .contains(&size)
        {
            config.max_import_file_size = size;
        } else {
            warnings.push(format!(
                "[import] max_file_size_bytes = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_IMPORT_FILE_SIZE,
                constants::ABSOLUTE_MAX_IMPORT_FILE_SIZE,
                constants::DEFAULT_MAX_IMPORT_FILE_SIZE,
            ));
        }
    }

    // -- Timeline: granularity --
    if let Some(ref g) = raw.timeline.granularity {
        match g.parse::<Granularity>() {
            Ok(granularity) => config.timeline_granularity = granularity,
            Err(e) => warnings.push(format!("[timeline] {e}. Using default (minute).")),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    config
}
