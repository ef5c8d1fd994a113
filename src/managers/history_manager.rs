//! History Manager for Wayfarer.
//!
//! Implements `HistoryManagerTrait`: a capped, deduplicated-by-url list of
//! visits ordered oldest first, persisted to a JSON file on every change.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::storage::JsonFile;
use crate::types::history::{HistoryEntry, HISTORY_CAP};

/// Trait defining history store operations.
pub trait HistoryManagerTrait {
    fn load(&mut self);
    fn record(&mut self, title: &str, url: &str);
    fn record_at(&mut self, title: &str, url: &str, at: DateTime<Utc>);
    fn clear(&mut self);
    fn recent(&self, n: usize) -> Vec<HistoryEntry>;
    fn entries(&self) -> &[HistoryEntry];
}

/// Returns whether a url is eligible for the history list.
pub fn is_recordable(url: &str) -> bool {
    !url.is_empty() && !url.starts_with("data:")
}

/// History store backed by a JSON file.
pub struct HistoryManager {
    file: JsonFile,
    entries: Vec<HistoryEntry>,
}

impl HistoryManager {
    /// Creates the store and loads whatever is on disk.
    pub fn new(file: JsonFile) -> Self {
        let mut mgr = Self {
            file,
            entries: Vec::new(),
        };
        mgr.load();
        mgr
    }

    fn persist(&self) {
        if let Err(e) = self.file.save(&self.entries) {
            log::warn!("Error saving history to {}: {}", self.file.path().display(), e);
        }
    }

    fn truncate_head(&mut self) {
        if self.entries.len() > HISTORY_CAP {
            let excess = self.entries.len() - HISTORY_CAP;
            self.entries.drain(..excess);
        }
    }
}

impl HistoryManagerTrait for HistoryManager {
    /// Reads persisted history. Missing or malformed storage yields an empty list.
    ///
    /// Re-establishes the store invariants on whatever was read: one entry
    /// per url (the latest wins), ascending timestamps, at most `HISTORY_CAP`.
    fn load(&mut self) {
        let mut stored: Vec<HistoryEntry> = self.file.load_or_default();
        stored.sort_by_key(|e| e.timestamp);

        let mut seen = HashSet::new();
        let mut kept: Vec<HistoryEntry> = stored
            .into_iter()
            .rev()
            .filter(|e| seen.insert(e.url.clone()))
            .collect();
        kept.reverse();

        self.entries = kept;
        self.truncate_head();
        log::debug!("Loaded {} history entries", self.entries.len());
    }

    /// Records a visit stamped with the current time.
    fn record(&mut self, title: &str, url: &str) {
        self.record_at(title, url, Utc::now());
    }

    /// Records a visit at `at`: any older entry for `url` is removed, the new
    /// entry goes to the tail, and the oldest entries are evicted past the cap.
    ///
    /// Empty and `data:` urls are ignored. A timestamp older than the current
    /// tail (clock stepped backwards) is raised to the tail's timestamp.
    fn record_at(&mut self, title: &str, url: &str, at: DateTime<Utc>) {
        if !is_recordable(url) {
            log::debug!("Not recording history for {:?}", url);
            return;
        }
        self.entries.retain(|e| e.url != url);
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        };
        self.entries.push(HistoryEntry {
            title: title.to_string(),
            url: url.to_string(),
            timestamp,
        });
        self.truncate_head();
        self.persist();
    }

    /// Empties the list and persists the empty list.
    fn clear(&mut self) {
        self.entries.clear();
        self.persist();
        log::info!("History cleared");
    }

    /// Last `n` entries, newest first.
    fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
