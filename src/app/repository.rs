// SimpleLogs - app/repository.rs
//
// The log collection, newest first, kept in step with its store.
//
// Every mutation is followed by a save. If the save fails the mutation is
// undone before the error is returned, so callers never observe an in-memory
// collection that differs from what is persisted.

use crate::app::store::Store;
use crate::core::model::{DraftEntry, EntryId, Level, LogEntry};
use crate::util::error::StoreError;
use crate::util::logging::preview;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Owner of the log collection.
#[derive(Debug)]
pub struct LogRepository<S: Store> {
    entries: Vec<LogEntry>,
    store: S,
}

impl<S: Store> LogRepository<S> {
    /// Load the collection from `store`.
    pub fn open(store: S) -> Self {
        let entries = store.load();
        tracing::debug!(entries = entries.len(), "Repository opened");
        Self { entries, store }
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// All entries, oldest first (the usual export order).
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + '_ {
        self.entries.iter().rev()
    }

    pub fn get(&self, id: &EntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a new entry at the front.
    ///
    /// Returns `Ok(None)` without touching anything when `message` is blank.
    pub fn add(
        &mut self,
        level: Level,
        tag: &str,
        message: &str,
    ) -> Result<Option<&LogEntry>, StoreError> {
        let message = message.trim();
        if message.is_empty() {
            tracing::debug!("Blank message ignored");
            return Ok(None);
        }

        let entry = LogEntry::from_draft(DraftEntry::new(level, tag.trim(), message), Utc::now());
        self.entries.insert(0, entry);
        self.commit(|entries| {
            entries.remove(0);
        })?;

        let added = &self.entries[0];
        tracing::debug!(id = %added.id, level = %added.level, msg = %preview(&added.message), "Entry added");
        Ok(Some(added))
    }

    /// Add parsed drafts in one step, stamped with the same `created` time.
    ///
    /// Drafts are inserted in order, so the last draft ends up newest, which
    /// is what adding them one by one would give. Blank drafts are skipped.
    /// Returns the number of entries added.
    pub fn add_drafts(
        &mut self,
        drafts: Vec<DraftEntry>,
        created: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut fresh: Vec<LogEntry> = drafts
            .into_iter()
            .filter_map(|d| {
                let message = d.message.trim();
                if message.is_empty() {
                    return None;
                }
                let draft = DraftEntry::new(d.level, d.tag.trim(), message);
                Some(LogEntry::from_draft(draft, created))
            })
            .collect();

        let added = fresh.len();
        if added == 0 {
            return Ok(0);
        }

        fresh.reverse();
        fresh.append(&mut self.entries);
        self.entries = fresh;
        self.commit(|entries| {
            entries.drain(0..added);
        })?;

        tracing::info!(added, total = self.entries.len(), "Drafts imported");
        Ok(added)
    }

    /// Merge previously exported entries, keeping their ids and timestamps.
    ///
    /// Entries whose id is already present (or repeats within `incoming`) are
    /// skipped, as are blank messages; message and tag are trimmed. The rest
    /// are slotted in by timestamp, newest first, without reordering the
    /// existing entries. An incoming entry goes ahead of an existing one with
    /// the same timestamp; among themselves incoming entries keep the order
    /// given. Returns the number of entries added.
    pub fn merge(&mut self, incoming: Vec<LogEntry>) -> Result<usize, StoreError> {
        let mut seen: HashSet<EntryId> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut fresh: Vec<LogEntry> = incoming
            .into_iter()
            .filter_map(|mut e| {
                let message = e.message.trim();
                if message.is_empty() || !seen.insert(e.id.clone()) {
                    return None;
                }
                e.message = message.to_string();
                e.tag = e.tag.trim().to_string();
                Some(e)
            })
            .collect();

        let added = fresh.len();
        if added == 0 {
            return Ok(0);
        }

        // Stable, so equal timestamps keep the order given.
        fresh.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let merged_ids: HashSet<EntryId> = fresh.iter().map(|e| e.id.clone()).collect();

        let existing = std::mem::take(&mut self.entries);
        let mut incoming = fresh.into_iter().peekable();
        let mut merged = Vec::with_capacity(existing.len() + added);
        for entry in existing {
            while let Some(next) = incoming.next_if(|n| n.timestamp >= entry.timestamp) {
                merged.push(next);
            }
            merged.push(entry);
        }
        merged.extend(incoming);
        self.entries = merged;

        self.commit(|entries| {
            entries.retain(|e| !merged_ids.contains(&e.id));
        })?;

        tracing::info!(added, total = self.entries.len(), "Entries merged");
        Ok(added)
    }

    /// Delete the entry with `id`. Returns whether one was removed; an
    /// unknown id is not an error.
    pub fn remove(&mut self, id: &EntryId) -> Result<bool, StoreError> {
        let Some(idx) = self.position(id) else {
            tracing::debug!(%id, "Remove: no such entry");
            return Ok(false);
        };

        let removed = self.entries.remove(idx);
        let result = self.store.save(&self.entries);
        if let Err(e) = result {
            self.entries.insert(idx, removed);
            tracing::warn!(error = %e, "Save failed; remove rolled back");
            return Err(e);
        }

        tracing::debug!(%id, "Entry removed");
        Ok(true)
    }

    /// Flip the pinned flag. Returns the new state, or `None` for an unknown id.
    pub fn toggle_pin(&mut self, id: &EntryId) -> Result<Option<bool>, StoreError> {
        let Some(idx) = self.position(id) else {
            tracing::debug!(%id, "Toggle pin: no such entry");
            return Ok(None);
        };

        self.entries[idx].pinned = !self.entries[idx].pinned;
        self.commit(|entries| {
            entries[idx].pinned = !entries[idx].pinned;
        })?;

        let pinned = self.entries[idx].pinned;
        tracing::debug!(%id, pinned, "Pin toggled");
        Ok(Some(pinned))
    }

    /// Remove everything. Returns how many entries were dropped.
    ///
    /// Asking the user first is the caller's job.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.store.save(&self.entries) {
            self.entries = previous;
            tracing::warn!(error = %e, "Save failed; clear rolled back");
            return Err(e);
        }

        tracing::info!(cleared = previous.len(), "All entries cleared");
        Ok(previous.len())
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Persist the current collection, running `undo` on failure.
    fn commit(&mut self, undo: impl FnOnce(&mut Vec<LogEntry>)) -> Result<(), StoreError> {
        match self.store.save(&self.entries) {
            Ok(()) => Ok(()),
            Err(e) => {
                undo(&mut self.entries);
                tracing::warn!(error = %e, "Save failed; change rolled back");
                Err(e)
            }
        }
    }
}
