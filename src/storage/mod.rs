//! Wayfarer persistence layer.
//!
//! The bookmark, history and settings stores are small JSON documents kept
//! in the data directory. [`JsonFile`] owns one such document path.
//!
//! # Usage
//!
//! ```no_run
//! use wayfarer::storage::JsonFile;
//! use wayfarer::types::bookmark::Bookmark;
//!
//! let file = JsonFile::new("bookmarks.json");
//! let mut bookmarks: Vec<Bookmark> = file.load_or_default();
//! bookmarks.push(Bookmark::new("Example", "https://example.com"));
//! file.save(&bookmarks).expect("failed to write bookmarks");
//! ```

pub mod json_file;

pub use json_file::JsonFile;
