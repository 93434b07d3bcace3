// SimpleLogs - tests/e2e_workflow.rs
//
// End-to-end tests for the record / import / filter / export cycle.
//
// These tests use a real FileStore in a temporary directory, so every step
// goes through JSON persistence on disk and is re-read by a fresh repository.

use simplelogs::app::commands;
use simplelogs::app::import::import_file;
use simplelogs::app::repository::LogRepository;
use simplelogs::app::store::{FileStore, Store};
use simplelogs::core::export::{export_csv, export_html, ExportFormat};
use simplelogs::core::filter::{apply_filter, FilterConfig};
use simplelogs::core::model::Level;
use simplelogs::core::stats::{aggregate, Stats};
use simplelogs::util::constants::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn open(dir: &TempDir) -> LogRepository<FileStore> {
    LogRepository::open(FileStore::new(dir.path(), DEFAULT_STORAGE_KEY))
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn e2e_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let pinned_id = {
        let mut repo = open(&dir);
        repo.add(Level::Info, "", "Service started").unwrap();
        let id = repo
            .add(Level::Error, "auth", "Invalid credentials")
            .unwrap()
            .unwrap()
            .id
            .clone();
        repo.toggle_pin(&id).unwrap();
        id
    };

    let repo = open(&dir);
    assert_eq!(repo.len(), 2);
    let newest = &repo.entries()[0];
    assert_eq!(newest.id, pinned_id);
    assert_eq!(newest.level, Level::Error);
    assert_eq!(newest.tag, "auth");
    assert!(newest.pinned);
    assert_eq!(repo.entries()[1].message, "Service started");
}

#[test]
fn e2e_storage_slot_uses_json_layout() {
    let dir = TempDir::new().unwrap();
    let mut repo = open(&dir);
    repo.add(Level::Warn, "disk", "Usage high").unwrap();

    let raw = std::fs::read_to_string(repo.store().path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["level"], "warn");
    assert_eq!(first["tag"], "disk");
    assert_eq!(first["msg"], "Usage high");
    assert_eq!(first["pinned"], false);
    assert!(first["ts"].as_str().unwrap().ends_with('Z'));
    assert!(!first["id"].as_str().unwrap().is_empty());
}

#[test]
fn e2e_corrupt_slot_loads_empty_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path(), DEFAULT_STORAGE_KEY);
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(store.path(), "not json at all").unwrap();
    assert!(store.load().is_empty());

    let mut repo = open(&dir);
    assert!(repo.is_empty());
    repo.add(Level::Info, "", "fresh start").unwrap();
    assert_eq!(open(&dir).len(), 1);
}

// =============================================================================
// Import -> filter -> stats -> export
// =============================================================================

#[test]
fn e2e_import_fixture_then_filter_and_stats() {
    let dir = TempDir::new().unwrap();
    let mut repo = open(&dir);

    let added = import_file(&mut repo, &fixture("pasted.log"), 1 << 20).unwrap();
    assert_eq!(added, 5);

    // Last line of the paste is the newest entry.
    let messages: Vec<&str> = repo.entries().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "DEBUG",
            "plain line without a level",
            "Invalid credentials",
            "Usage at 91%",
            "Service started",
        ]
    );

    let repo = open(&dir);
    let errors = apply_filter(
        repo.entries(),
        &FilterConfig {
            level: Some(Level::Error),
            ..Default::default()
        },
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].tag, "auth");

    let disk = apply_filter(
        repo.entries(),
        &FilterConfig {
            search_text: "DISK".to_string(),
            ..Default::default()
        },
    );
    assert_eq!(disk.len(), 1);
    assert_eq!(disk[0].level, Level::Warn);

    match aggregate(repo.entries()) {
        Stats::Summary(s) => {
            assert_eq!(s.total, 5);
            assert_eq!(s.level_count(Level::Info), 2);
            assert_eq!(s.level_count(Level::Debug), 1);
            assert_eq!(s.top_tags(10).len(), 3);
        }
        Stats::Empty => panic!("expected a summary"),
    }
}

#[test]
fn e2e_json_export_round_trips_through_import() {
    let source_dir = TempDir::new().unwrap();
    let mut source = open(&source_dir);
    source.add(Level::Info, "", "first").unwrap();
    source.add(Level::Error, "db", "second, with \"quotes\"").unwrap();

    let out_dir = TempDir::new().unwrap();
    let export_path = out_dir.path().join("backup.json");
    let mut sink = Vec::new();
    commands::handle_export(
        &source,
        ExportFormat::Json,
        &FilterConfig::default(),
        Some(&export_path),
        chrono::Utc::now(),
        &mut sink,
    )
    .unwrap();

    let target_dir = TempDir::new().unwrap();
    let mut target = open(&target_dir);
    assert_eq!(import_file(&mut target, &export_path, 1 << 20).unwrap(), 2);

    let reopened = open(&target_dir);
    assert_eq!(reopened.entries(), source.entries());
}

#[test]
fn e2e_csv_and_html_exports_escape_content() {
    let dir = TempDir::new().unwrap();
    let mut repo = open(&dir);
    repo.add(Level::Warn, "<ui>", "said \"hi\" & left").unwrap();

    let mut csv = Vec::new();
    export_csv(repo.chronological(), &mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.starts_with("timestamp,level,tag,message\n"));
    assert!(csv.ends_with("\"warn\",\"<ui>\",\"said \"\"hi\"\" & left\"\n"));

    let mut html = Vec::new();
    export_html(repo.chronological(), &mut html).unwrap();
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("<td>&lt;ui&gt;</td>"));
    assert!(html.contains("<td>said &quot;hi&quot; &amp; left</td>"));
    assert!(!html.contains("<ui>"));
}

#[test]
fn e2e_clear_empties_the_slot() {
    let dir = TempDir::new().unwrap();
    let mut repo = open(&dir);
    repo.add(Level::Info, "", "one").unwrap();
    repo.add(Level::Info, "", "two").unwrap();

    let mut out = Vec::new();
    commands::handle_clear(&mut repo, true, &mut "".as_bytes(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "✓ Cleared 2 log(s).\n");
    assert!(open(&dir).is_empty());
}
