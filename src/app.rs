//! App Core for Wayfarer.
//!
//! Resolves where state lives on disk, builds the session with its stores and
//! engine, and runs the startup/shutdown sequence.

use std::env;
use std::path::{Path, PathBuf};

use crate::managers::bookmark_manager::BookmarkManager;
use crate::managers::history_manager::HistoryManager;
use crate::managers::session_manager::{Pumped, SessionManager};
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::shell::ShellView;
use crate::storage::JsonFile;
use crate::surface::headless::HeadlessEngine;
use crate::surface::EventQueue;
use crate::types::settings::Preferences;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "WAYFARER_DATA_DIR";

/// Locations of the persisted files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bookmarks_file: PathBuf,
    pub history_file: PathBuf,
    pub settings_file: PathBuf,
}

impl AppConfig {
    /// Default file names inside `data_dir`.
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            bookmarks_file: data_dir.join("bookmarks.json"),
            history_file: data_dir.join("history.json"),
            settings_file: data_dir.join("settings.json"),
            data_dir,
        }
    }

    /// `$WAYFARER_DATA_DIR` if set, otherwise the working directory.
    pub fn from_env() -> Self {
        let dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        Self::in_dir(dir)
    }
}

/// Central application struct: the session plus the engine feeding it.
pub struct App {
    pub config: AppConfig,
    pub session: SessionManager,
    pub engine: HeadlessEngine,
    pub events: EventQueue,
}

impl App {
    /// Loads preferences and both stores from `config` and wires the session
    /// to a headless engine and the given view. No tab is opened yet.
    pub fn new(config: AppConfig, view: Box<dyn ShellView>) -> Self {
        let mut settings = SettingsEngine::new(JsonFile::new(config.settings_file.clone()));
        settings.load();
        settings.subscribe(Box::new(|prefs: &Preferences| {
            log::info!(
                "Preferences updated: homepage {}, zoom {}%",
                prefs.homepage,
                prefs.zoom_percent
            );
        }));

        let bookmarks = BookmarkManager::new(JsonFile::new(config.bookmarks_file.clone()));
        let history = HistoryManager::new(JsonFile::new(config.history_file.clone()));

        let events = EventQueue::new();
        let engine = HeadlessEngine::with_events(events.clone());
        let session = SessionManager::new(
            settings,
            bookmarks,
            history,
            Box::new(engine.clone()),
            view,
        );

        log::info!("Data directory: {}", config.data_dir.display());
        Self {
            config,
            session,
            engine,
            events,
        }
    }

    /// Startup sequence: open the homepage tab and deliver its load events.
    pub fn startup(&mut self) {
        self.session.start();
        self.pump();
    }

    /// Delivers pending engine events to the session.
    pub fn pump(&mut self) -> Pumped {
        self.session.pump(&self.events)
    }

    /// Shutdown sequence: flush preferences to disk.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.session.settings().save() {
            log::error!("Failed to save settings on shutdown: {}", e);
        }
        log::info!("Shut down with {} tab(s) open", self.session.tabs().tab_count());
    }
}
