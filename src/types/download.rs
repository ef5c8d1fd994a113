use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an adopted download, handed to the engine handle on accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadId(Uuid);

impl DownloadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for DownloadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a download. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadState {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl DownloadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DownloadState::Completed | DownloadState::Cancelled)
    }
}

/// Progress and metadata of one adopted download.
///
/// The engine handle itself is owned by the coordinator; this is the
/// view-facing part of the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub id: DownloadId,
    pub filename: String,
    pub source_url: String,
    pub save_path: String,
    pub bytes_received: u64,
    /// Zero when the engine does not know the size.
    pub bytes_total: u64,
    pub percent: u8,
    pub state: DownloadState,
}

impl DownloadItem {
    pub fn new(source_url: &str, save_path: &str) -> Self {
        Self {
            id: DownloadId::new(),
            filename: filename_from_path(save_path),
            source_url: source_url.to_string(),
            save_path: save_path.to_string(),
            bytes_received: 0,
            bytes_total: 0,
            percent: 0,
            state: DownloadState::Pending,
        }
    }

    /// One-line summary for the downloads list.
    pub fn status_line(&self) -> String {
        match self.state {
            DownloadState::Completed => format!("{} - Completed", self.filename),
            DownloadState::Cancelled => format!("{} - Cancelled", self.filename),
            DownloadState::Pending | DownloadState::Active if self.bytes_total > 0 => {
                format!("{} - {}%", self.filename, self.percent)
            }
            DownloadState::Pending | DownloadState::Active => {
                format!("{} - {}", self.filename, self.source_url)
            }
        }
    }
}

/// Last component of a save path, accepting both separator styles.
pub fn filename_from_path(save_path: &str) -> String {
    let last = save_path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(save_path);
    if last.is_empty() {
        Path::new(save_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        last.to_string()
    }
}
