// SimpleLogs - app/commands.rs
//
// Command handlers behind the CLI. Each one drives the repository and the
// core operations, then renders a human-readable result to `out`.
// Handlers never print directly, so they can be exercised against buffers.

use crate::app::import;
use crate::app::repository::LogRepository;
use crate::app::store::Store;
use crate::core::export::{self, ExportFormat};
use crate::core::filter::{apply_filter, FilterConfig};
use crate::core::model::{EntryId, Level, LogEntry};
use crate::core::stats::{aggregate, Stats};
use crate::core::timeline::{bucket_counts, Granularity};
use crate::platform::fs;
use crate::util::constants::DEFAULT_TOP_TAGS;
use crate::util::error::{Result, SimpleLogsError};
use chrono::{DateTime, Utc};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Characters of the id shown by `list`. Any unique prefix is accepted back.
const SHORT_ID_LEN: usize = 8;

/// Widest bar drawn by `timeline`.
const TIMELINE_BAR_WIDTH: usize = 40;

fn output_error(source: io::Error) -> SimpleLogsError {
    SimpleLogsError::Io {
        path: PathBuf::from("<output>"),
        operation: "write",
        source,
    }
}

/// Find the entry an id or id prefix refers to.
enum Lookup {
    Found(EntryId),
    Missing,
    Ambiguous(usize),
}

fn lookup<S: Store>(repo: &LogRepository<S>, needle: &str) -> Lookup {
    let needle = needle.trim();
    if needle.is_empty() {
        return Lookup::Missing;
    }
    if let Some(e) = repo.entries().iter().find(|e| e.id.as_str() == needle) {
        return Lookup::Found(e.id.clone());
    }
    let matches: Vec<&LogEntry> = repo
        .entries()
        .iter()
        .filter(|e| e.id.as_str().starts_with(needle))
        .collect();
    match matches.as_slice() {
        [] => Lookup::Missing,
        [one] => Lookup::Found(one.id.clone()),
        many => Lookup::Ambiguous(many.len()),
    }
}

fn short_id(id: &EntryId) -> &str {
    let s = id.as_str();
    s.char_indices().nth(SHORT_ID_LEN).map_or(s, |(i, _)| &s[..i])
}

/// Resolve `needle`, reporting missing/ambiguous ids to `out`.
fn resolve<S: Store>(
    repo: &LogRepository<S>,
    needle: &str,
    out: &mut impl Write,
) -> Result<Option<EntryId>> {
    match lookup(repo, needle) {
        Lookup::Found(id) => Ok(Some(id)),
        Lookup::Missing => {
            writeln!(out, "No log with id '{needle}'.").map_err(output_error)?;
            Ok(None)
        }
        Lookup::Ambiguous(n) => {
            writeln!(out, "Id prefix '{needle}' matches {n} logs; use more characters.")
                .map_err(output_error)?;
            Ok(None)
        }
    }
}

/// `add`: record one entry.
pub fn handle_add<S: Store>(
    repo: &mut LogRepository<S>,
    level: Level,
    tag: &str,
    message: &str,
    out: &mut impl Write,
) -> Result<()> {
    match repo.add(level, tag, message)? {
        Some(entry) => {
            let id = short_id(&entry.id).to_string();
            writeln!(out, "✓ Log recorded ({id}).").map_err(output_error)
        }
        None => writeln!(out, "Empty log, skipped.").map_err(output_error),
    }
}

/// `import <file>`: parse or merge a file.
pub fn handle_import_file<S: Store>(
    repo: &mut LogRepository<S>,
    path: &Path,
    max_bytes: u64,
    out: &mut impl Write,
) -> Result<()> {
    let added = import::import_file(repo, path, max_bytes)?;
    writeln!(out, "✓ Imported {added} log(s) from {}.", path.display()).map_err(output_error)
}

/// `import -`: parse text read from stdin.
pub fn handle_import_text<S: Store>(
    repo: &mut LogRepository<S>,
    text: &str,
    out: &mut impl Write,
) -> Result<()> {
    let added = import::import_text(repo, text)?;
    writeln!(out, "✓ Imported {added} log(s).").map_err(output_error)
}

/// `list`: filtered entries, newest first (or the `limit` newest).
pub fn handle_list<S: Store>(
    repo: &LogRepository<S>,
    filter: &FilterConfig,
    limit: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    if repo.is_empty() {
        return writeln!(out, "No logs yet.").map_err(output_error);
    }

    let matching = apply_filter(repo.entries(), filter);
    if matching.is_empty() {
        return writeln!(out, "No logs match the current filters.").map_err(output_error);
    }

    let shown = limit.unwrap_or(matching.len()).min(matching.len());
    for entry in &matching[..shown] {
        let tag = if entry.tag.is_empty() { "-" } else { entry.tag.as_str() };
        let pin = if entry.pinned { " *" } else { "" };
        writeln!(
            out,
            "{}{pin} {} {:<5} [{tag}] {}",
            short_id(&entry.id),
            entry.iso_timestamp(),
            entry.level.label(),
            entry.message
        )
        .map_err(output_error)?;
    }

    if shown < matching.len() {
        writeln!(out, "… {} more", matching.len() - shown).map_err(output_error)?;
    }
    Ok(())
}

/// `pin <id>`: toggle the pinned flag.
pub fn handle_pin<S: Store>(
    repo: &mut LogRepository<S>,
    needle: &str,
    out: &mut impl Write,
) -> Result<()> {
    let Some(id) = resolve(repo, needle, out)? else {
        return Ok(());
    };
    let written = match repo.toggle_pin(&id)? {
        Some(true) => writeln!(out, "✓ Pinned {}.", short_id(&id)),
        Some(false) => writeln!(out, "✓ Unpinned {}.", short_id(&id)),
        None => writeln!(out, "No log with id '{needle}'."),
    };
    written.map_err(output_error)
}

/// `rm <id>...`: delete entries.
pub fn handle_remove<S: Store>(
    repo: &mut LogRepository<S>,
    needles: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let mut removed = 0usize;
    for needle in needles {
        if let Some(id) = resolve(repo, needle, out)? {
            if repo.remove(&id)? {
                removed += 1;
            }
        }
    }
    writeln!(out, "✓ Deleted {removed} log(s).").map_err(output_error)
}

/// `clear`: remove everything after a y/N confirmation (skipped with `yes`).
pub fn handle_clear<S: Store>(
    repo: &mut LogRepository<S>,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if repo.is_empty() {
        return writeln!(out, "No logs to clear.").map_err(output_error);
    }

    if !yes {
        write!(out, "Clear all {} logs? (y/N): ", repo.len()).map_err(output_error)?;
        out.flush().map_err(output_error)?;

        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .map_err(|source| SimpleLogsError::Io {
                path: PathBuf::from("<stdin>"),
                operation: "read confirmation",
                source,
            })?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            return writeln!(out, "Cancelled.").map_err(output_error);
        }
    }

    let cleared = repo.clear()?;
    writeln!(out, "✓ Cleared {cleared} log(s).").map_err(output_error)
}

/// `stats`: totals per level and tag over the whole collection.
pub fn handle_stats<S: Store>(repo: &LogRepository<S>, out: &mut impl Write) -> Result<()> {
    let summary = match aggregate(repo.entries()) {
        Stats::Empty => return writeln!(out, "No logs yet.").map_err(output_error),
        Stats::Summary(s) => s,
    };

    let mut text = format!("Total logs: {}\n", summary.total);
    for (level, count) in &summary.by_level {
        text.push_str(&format!("  {level}: {count}\n"));
    }
    let top = summary.top_tags(DEFAULT_TOP_TAGS);
    if !top.is_empty() {
        text.push_str("Top tags:\n");
        for (tag, count) in top {
            text.push_str(&format!("  {tag}: {count}\n"));
        }
    }
    out.write_all(text.as_bytes()).map_err(output_error)
}

/// `timeline`: entry counts per minute or hour, oldest first, with a bar.
pub fn handle_timeline<S: Store>(
    repo: &LogRepository<S>,
    granularity: Granularity,
    out: &mut impl Write,
) -> Result<()> {
    let series = bucket_counts(repo.entries(), granularity);
    let Some(max) = series.iter().map(|b| b.count).max() else {
        return writeln!(out, "No logs yet.").map_err(output_error);
    };

    for bucket in &series {
        // At least one cell so every non-empty bucket is visible.
        let width = (bucket.count * TIMELINE_BAR_WIDTH).div_ceil(max).max(1);
        writeln!(
            out,
            "{}  {:>5}  {}",
            bucket.label,
            bucket.count,
            "#".repeat(width)
        )
        .map_err(output_error)?;
    }
    Ok(())
}

/// `export`: write the filtered entries, oldest first, to a file.
///
/// Without an explicit `output` path a `simplelogs-<timestamp>.<ext>` file is
/// created in the current directory. Returns the path written.
pub fn handle_export<S: Store>(
    repo: &LogRepository<S>,
    format: ExportFormat,
    filter: &FilterConfig,
    output: Option<&Path>,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(export::default_export_file_name(format, now)),
    };

    let matching = apply_filter(repo.entries(), filter);
    let chronological = matching.iter().rev().copied();

    let file = fs::create_output_file(&path).map_err(|source| SimpleLogsError::Io {
        path: path.clone(),
        operation: "create export file",
        source,
    })?;
    let count = match format {
        ExportFormat::Csv => export::export_csv(chronological, file)?,
        ExportFormat::Html => export::export_html(chronological, file)?,
        ExportFormat::Json => export::export_json(chronological, file)?,
    };

    tracing::info!(path = %path.display(), %format, count, "Export written");
    writeln!(out, "✓ Exported {count} log(s) to {}.", path.display()).map_err(output_error)?;
    Ok(path)
}

/// `copy`: clipboard text of the filtered entries on `out`, a count on `note`.
pub fn handle_copy<S: Store>(
    repo: &LogRepository<S>,
    filter: &FilterConfig,
    out: &mut impl Write,
    note: &mut impl Write,
) -> Result<()> {
    let matching = apply_filter(repo.entries(), filter);
    let text = export::export_clipboard_text(matching.iter().copied());
    if !text.is_empty() {
        writeln!(out, "{text}").map_err(output_error)?;
    }
    writeln!(note, "Copied {} logs to clipboard.", matching.len()).map_err(output_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemoryStore;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn seeded() -> LogRepository<MemoryStore> {
        let mut repo = LogRepository::open(MemoryStore::new());
        repo.add(Level::Error, "auth", "Invalid credentials").unwrap();
        repo.add(Level::Info, "", "Service started").unwrap();
        repo
    }

    #[test]
    fn test_add_reports_skip_for_blank() {
        let mut repo = LogRepository::open(MemoryStore::new());
        let text = run(|out| handle_add(&mut repo, Level::Info, "", "   ", out));
        assert_eq!(text, "Empty log, skipped.\n");
        let text = run(|out| handle_add(&mut repo, Level::Info, "", "hi", out));
        assert!(text.starts_with("✓ Log recorded ("));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_list_distinguishes_empty_from_filtered_out() {
        let empty = LogRepository::open(MemoryStore::new());
        let text = run(|out| handle_list(&empty, &FilterConfig::default(), None, out));
        assert_eq!(text, "No logs yet.\n");

        let repo = seeded();
        let text = run(|out| handle_list(&repo, &FilterConfig::pinned(), None, out));
        assert_eq!(text, "No logs match the current filters.\n");
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let repo = seeded();
        let text = run(|out| handle_list(&repo, &FilterConfig::default(), Some(1), out));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO  [-] Service started"));
        assert_eq!(lines[1], "… 1 more");
    }

    #[test]
    fn test_pin_by_prefix_and_unknown_id() {
        let mut repo = seeded();
        let id = repo.entries()[1].id.clone();
        let prefix = &id.as_str()[..SHORT_ID_LEN];

        let text = run(|out| handle_pin(&mut repo, prefix, out));
        assert!(text.starts_with("✓ Pinned"));
        assert!(repo.get(&id).unwrap().pinned);

        let text = run(|out| handle_pin(&mut repo, "zzzz", out));
        assert_eq!(text, "No log with id 'zzzz'.\n");
    }

    #[test]
    fn test_remove_counts_only_real_deletions() {
        let mut repo = seeded();
        let id = repo.entries()[0].id.to_string();
        let text = run(|out| handle_remove(&mut repo, &[id.clone(), id.clone()], out));
        assert!(text.ends_with("✓ Deleted 1 log(s).\n"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut repo = seeded();
        let text = run(|out| handle_clear(&mut repo, false, &mut "n\n".as_bytes(), out));
        assert!(text.ends_with("Cancelled.\n"));
        assert_eq!(repo.len(), 2);

        let text = run(|out| handle_clear(&mut repo, false, &mut "Y\n".as_bytes(), out));
        assert!(text.ends_with("✓ Cleared 2 log(s).\n"));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_stats_output() {
        let empty = LogRepository::open(MemoryStore::new());
        assert_eq!(run(|out| handle_stats(&empty, out)), "No logs yet.\n");

        let repo = seeded();
        let text = run(|out| handle_stats(&repo, out));
        assert_eq!(
            text,
            "Total logs: 2\n  info: 1\n  error: 1\nTop tags:\n  auth: 1\n"
        );
    }

    #[test]
    fn test_timeline_bars() {
        let repo = seeded();
        let text = run(|out| handle_timeline(&repo, Granularity::Hour, out));
        let lines: Vec<_> = text.lines().collect();
        // Both entries were added within the same hour (or straddle one).
        let total: usize = lines
            .iter()
            .map(|l| l.split_whitespace().nth(2).unwrap().parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, 2);
        assert!(lines.iter().all(|l| l.ends_with('#')));
    }

    #[test]
    fn test_export_csv_oldest_first() {
        let repo = seeded();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("logs.csv");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut buf = Vec::new();
        let written = handle_export(
            &repo,
            ExportFormat::Csv,
            &FilterConfig::default(),
            Some(&path),
            now,
            &mut buf,
        )
        .unwrap();
        assert_eq!(written, path);

        let csv = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,level,tag,message");
        assert!(lines[1].ends_with(r#""error","auth","Invalid credentials""#));
        assert!(lines[2].ends_with(r#""info","","Service started""#));
    }

    #[test]
    fn test_copy_writes_text_and_count() {
        let repo = seeded();
        let filter = FilterConfig {
            level: Some(Level::Error),
            ..Default::default()
        };
        let mut out = Vec::new();
        let mut note = Vec::new();
        handle_copy(&repo, &filter, &mut out, &mut note).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[ERROR] [auth] "));
        assert!(text.ends_with(" Invalid credentials\n"));
        assert_eq!(String::from_utf8(note).unwrap(), "Copied 1 logs to clipboard.\n");
    }
}
