// SimpleLogs - app/import.rs
//
// Bringing external text into the repository: a user-chosen file, or text
// pasted / piped in. JSON exports are merged back entry for entry; anything
// else goes through the free-text parser.

use crate::app::repository::LogRepository;
use crate::app::store::Store;
use crate::core::model::LogEntry;
use crate::core::parser::parse_text;
use crate::platform::fs;
use crate::util::error::ImportError;
use chrono::Utc;
use std::path::Path;

/// Import parsed free text. Every line gets the same import timestamp.
/// Returns the number of entries added.
pub fn import_text<S: Store>(
    repo: &mut LogRepository<S>,
    text: &str,
) -> Result<usize, ImportError> {
    let drafts = parse_text(text);
    Ok(repo.add_drafts(drafts, Utc::now())?)
}

/// Import a file: `.json` as a previously exported collection, anything else
/// as free text (invalid UTF-8 is replaced, not rejected).
///
/// Files larger than `max_bytes` are refused before being read.
pub fn import_file<S: Store>(
    repo: &mut LogRepository<S>,
    path: &Path,
    max_bytes: u64,
) -> Result<usize, ImportError> {
    let size = fs::file_size(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if size > max_bytes {
        return Err(ImportError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: max_bytes,
        });
    }

    let content = fs::read_file_lossy(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let added = if fs::is_json_file(path) {
        let mut entries: Vec<LogEntry> =
            serde_json::from_str(&content).map_err(|source| ImportError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        // Exports are written oldest first; the collection is newest first.
        // Reversing keeps export order among equal timestamps in the merge.
        entries.reverse();
        repo.merge(entries)?
    } else {
        import_text(repo, &content)?
    };

    tracing::info!(path = %path.display(), bytes = size, added, "File imported");
    Ok(added)
}
