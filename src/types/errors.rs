use std::io;

use super::download::DownloadId;

// === TabError ===

/// Errors related to tab registry operations.
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    /// No tab lives at the given registry index.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
}

// === StorageError ===

/// Errors raised while reading or writing a persisted JSON store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The temporary file could not be renamed over the target.
    #[error("Failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

// === DownloadError ===

/// Errors related to download coordination.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Download with the given ID was never adopted or has been cleared.
    #[error("Download not found: {0}")]
    NotFound(DownloadId),
}

// === SettingsError ===

/// Errors related to the preferences model.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings storage error: {0}")]
    Storage(#[from] StorageError),
    /// The provided settings key is not a known preference.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value failed validation.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ShortcutError ===

/// Errors related to keyboard shortcut management.
#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    /// The shortcut keys conflict with an existing binding.
    #[error("Shortcut conflict: {0}")]
    Conflict(String),
    /// The provided key combination is invalid.
    #[error("Invalid shortcut keys: {0}")]
    InvalidKeys(String),
}
