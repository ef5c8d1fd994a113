//! Bookmark Manager for Wayfarer.
//!
//! Implements `BookmarkManagerTrait`: a deduplicated, insertion-ordered list
//! of bookmarks persisted eagerly to a JSON file after every mutation.

use std::collections::HashSet;

use crate::storage::JsonFile;
use crate::types::bookmark::Bookmark;

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    fn load(&mut self);
    fn add(&mut self, title: &str, url: &str) -> bool;
    fn remove(&mut self, url: &str);
    fn contains(&self, url: &str) -> bool;
    fn snapshot(&self) -> &[Bookmark];
}

/// Bookmark store backed by a JSON file.
pub struct BookmarkManager {
    file: JsonFile,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkManager {
    /// Creates the store and loads whatever is on disk.
    pub fn new(file: JsonFile) -> Self {
        let mut mgr = Self {
            file,
            bookmarks: Vec::new(),
        };
        mgr.load();
        mgr
    }

    /// Writes the current list. Failures are logged; memory stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.file.save(&self.bookmarks) {
            log::warn!("Error saving bookmarks to {}: {}", self.file.path().display(), e);
        }
    }
}

impl BookmarkManagerTrait for BookmarkManager {
    /// Reads persisted bookmarks. Missing or malformed storage yields an empty list.
    ///
    /// Duplicate urls in the file are dropped, keeping the first occurrence.
    fn load(&mut self) {
        let stored: Vec<Bookmark> = self.file.load_or_default();
        let mut seen = HashSet::new();
        self.bookmarks = stored
            .into_iter()
            .filter(|b| seen.insert(b.url.clone()))
            .collect();
        log::debug!("Loaded {} bookmarks", self.bookmarks.len());
    }

    /// Appends a bookmark unless one with the same url exists.
    /// Returns whether the list changed.
    fn add(&mut self, title: &str, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.bookmarks.push(Bookmark::new(title, url));
        self.persist();
        true
    }

    /// Removes the bookmark with the given url. A miss leaves the file untouched.
    fn remove(&mut self, url: &str) {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.url != url);
        if self.bookmarks.len() != before {
            self.persist();
        }
    }

    fn contains(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b.url == url)
    }

    fn snapshot(&self) -> &[Bookmark] {
        &self.bookmarks
    }
}
