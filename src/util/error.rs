// SimpleLogs - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Only I/O at the edges can fail (the storage slot, import files and export
// files). Parsing and aggregation are infallible and degrade instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SimpleLogs operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SimpleLogsError {
    /// Persisting the collection failed.
    Store(StoreError),

    /// Reading an import file failed.
    Import(ImportError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SimpleLogsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Storage error: {e}"),
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SimpleLogsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Import(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised while persisting the collection.
///
/// Loading never produces one of these: absent or corrupt data loads as an
/// empty collection.
#[derive(Debug)]
pub enum StoreError {
    /// The collection could not be serialised to JSON.
    Serialize { source: serde_json::Error },

    /// The slot's directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// Writing the slot (or its temp file) failed.
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize { source } => write!(f, "failed to serialise logs: {source}"),
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create storage directory '{}': {source}",
                path.display()
            ),
            Self::Write { path, source } => {
                write!(f, "failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize { source } => Some(source),
            Self::CreateDir { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for SimpleLogsError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors related to reading a user-chosen file for import.
#[derive(Debug)]
pub enum ImportError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The file exceeds the configured import size limit.
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// A `.json` file is not an exported log collection.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The imported entries could not be persisted.
    Store(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::TooLarge { path, size, max } => write!(
                f,
                "'{}' is {size} bytes, exceeds the import limit of {max} bytes",
                path.display()
            ),
            Self::Json { path, source } => write!(
                f,
                "'{}' is not an exported log collection: {source}",
                path.display()
            ),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Store(e) => Some(e),
            Self::TooLarge { .. } => None,
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ImportError> for SimpleLogsError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<ExportError> for SimpleLogsError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for SimpleLogs results.
pub type Result<T> = std::result::Result<T, SimpleLogsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_import_error_keeps_store_cause() {
        let store = StoreError::Write {
            path: PathBuf::from("/tmp/slot.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let err: SimpleLogsError = ImportError::from(store).into();
        assert!(err.to_string().starts_with("Import error: failed to write"));

        // Chain: SimpleLogsError -> ImportError -> StoreError -> io::Error
        let import = err.source().expect("import cause");
        let store = import.source().expect("store cause");
        assert!(store.source().is_some());
    }

    #[test]
    fn test_too_large_message_names_limit() {
        let err = ImportError::TooLarge {
            path: PathBuf::from("big.log"),
            size: 2048,
            max: 1024,
        };
        let msg = err.to_string();
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }
}
