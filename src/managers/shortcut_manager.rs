//! Shortcut Manager for Wayfarer.
//!
//! Maps keystrokes to shell actions with conflict detection and
//! platform-specific modifier key adaptation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::errors::ShortcutError;

/// Every user action the shell can trigger by keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    NewTab,
    NewWindow,
    CloseTab,
    Back,
    Forward,
    Reload,
    Home,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    AddBookmark,
    ShowBookmarks,
    ShowHistory,
    ShowDownloads,
    ShowSettings,
    DevTools,
    ToggleFullscreen,
    ExitFullscreen,
    Quit,
}

impl Action {
    pub const ALL: [Action; 19] = [
        Action::NewTab,
        Action::NewWindow,
        Action::CloseTab,
        Action::Back,
        Action::Forward,
        Action::Reload,
        Action::Home,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ZoomReset,
        Action::AddBookmark,
        Action::ShowBookmarks,
        Action::ShowHistory,
        Action::ShowDownloads,
        Action::ShowSettings,
        Action::DevTools,
        Action::ToggleFullscreen,
        Action::ExitFullscreen,
        Action::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::NewTab => "new_tab",
            Action::NewWindow => "new_window",
            Action::CloseTab => "close_tab",
            Action::Back => "back",
            Action::Forward => "forward",
            Action::Reload => "reload",
            Action::Home => "home",
            Action::ZoomIn => "zoom_in",
            Action::ZoomOut => "zoom_out",
            Action::ZoomReset => "zoom_reset",
            Action::AddBookmark => "add_bookmark",
            Action::ShowBookmarks => "show_bookmarks",
            Action::ShowHistory => "show_history",
            Action::ShowDownloads => "show_downloads",
            Action::ShowSettings => "show_settings",
            Action::DevTools => "dev_tools",
            Action::ToggleFullscreen => "toggle_fullscreen",
            Action::ExitFullscreen => "exit_fullscreen",
            Action::Quit => "quit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| ShortcutError::UnknownAction(s.to_string()))
    }
}

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register_shortcut(&mut self, action: Action, keys: &str) -> Result<(), ShortcutError>;
    fn unregister_shortcut(&mut self, action: Action) -> bool;
    fn get_shortcut(&self, action: Action) -> Option<&str>;
    fn action_for(&self, keys: &str) -> Option<Action>;
    fn list_shortcuts(&self) -> &HashMap<Action, String>;
    fn reset_to_defaults(&mut self);
    fn has_conflict(&self, keys: &str, exclude_action: Option<Action>) -> Option<Action>;
}

/// Shortcut manager with in-memory storage and platform adaptation.
pub struct ShortcutManager {
    shortcuts: HashMap<Action, String>,
}

impl ShortcutManager {
    pub fn new() -> Self {
        Self {
            shortcuts: Self::default_shortcuts(),
        }
    }

    /// Default keystrokes, as shown in the application menus.
    /// Home and Settings have no default binding.
    pub fn default_shortcuts() -> HashMap<Action, String> {
        let defaults = [
            (Action::NewTab, "Ctrl+T"),
            (Action::NewWindow, "Ctrl+N"),
            (Action::CloseTab, "Ctrl+W"),
            (Action::Back, "Alt+Left"),
            (Action::Forward, "Alt+Right"),
            (Action::Reload, "F5"),
            (Action::ZoomIn, "Ctrl++"),
            (Action::ZoomOut, "Ctrl+-"),
            (Action::ZoomReset, "Ctrl+0"),
            (Action::AddBookmark, "Ctrl+D"),
            (Action::ShowBookmarks, "Ctrl+Shift+B"),
            (Action::ShowHistory, "Ctrl+H"),
            (Action::ShowDownloads, "Ctrl+Shift+Y"),
            (Action::DevTools, "F12"),
            (Action::ToggleFullscreen, "F11"),
            (Action::ExitFullscreen, "Esc"),
            (Action::Quit, "Ctrl+Q"),
        ];

        defaults
            .into_iter()
            .map(|(a, k)| (a, Self::adapt_for_platform(k)))
            .collect()
    }

    /// Adapts modifier keys for the current platform.
    fn adapt_for_platform(keys: &str) -> String {
        if cfg!(target_os = "macos") {
            keys.replace("Ctrl+", "Cmd+")
        } else {
            keys.to_string()
        }
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register_shortcut(&mut self, action: Action, keys: &str) -> Result<(), ShortcutError> {
        if keys.trim().is_empty() {
            return Err(ShortcutError::InvalidKeys("Keys cannot be empty".to_string()));
        }

        if let Some(conflicting) = self.has_conflict(keys, Some(action)) {
            return Err(ShortcutError::Conflict(format!(
                "'{}' is already bound to '{}'",
                keys, conflicting
            )));
        }

        self.shortcuts.insert(action, Self::adapt_for_platform(keys));
        Ok(())
    }

    fn unregister_shortcut(&mut self, action: Action) -> bool {
        self.shortcuts.remove(&action).is_some()
    }

    fn get_shortcut(&self, action: Action) -> Option<&str> {
        self.shortcuts.get(&action).map(|s| s.as_str())
    }

    fn action_for(&self, keys: &str) -> Option<Action> {
        self.has_conflict(keys, None)
    }

    fn list_shortcuts(&self) -> &HashMap<Action, String> {
        &self.shortcuts
    }

    fn reset_to_defaults(&mut self) {
        self.shortcuts = Self::default_shortcuts();
    }

    fn has_conflict(&self, keys: &str, exclude_action: Option<Action>) -> Option<Action> {
        let adapted = Self::adapt_for_platform(keys);
        self.shortcuts
            .iter()
            .find(|(action, bound)| **bound == adapted && Some(**action) != exclude_action)
            .map(|(action, _)| *action)
    }
}
