use std::fmt;

use serde::{Deserialize, Serialize};

/// Tab titles longer than this are shortened for the tab strip.
pub const TAB_TITLE_MAX_CHARS: usize = 20;

/// Session-unique tab identifier. Allocated monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Read-only snapshot of a tab for views and the JSON protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub display_title: String,
    pub current_url: String,
    pub load_progress: u8,
    pub focused: bool,
}

/// Shortens a page title for the tab strip: at most 20 characters plus an ellipsis.
pub fn display_title(title: &str) -> String {
    if title.chars().count() > TAB_TITLE_MAX_CHARS {
        let mut short: String = title.chars().take(TAB_TITLE_MAX_CHARS).collect();
        short.push('…');
        short
    } else {
        title.to_string()
    }
}
