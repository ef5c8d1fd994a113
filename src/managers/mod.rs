// Wayfarer state managers
// Managers handle stateful operations: tabs, the session, bookmarks, history, downloads, shortcuts.

pub mod bookmark_manager;
pub mod download_manager;
pub mod history_manager;
pub mod session_manager;
pub mod shortcut_manager;
pub mod tab_manager;
