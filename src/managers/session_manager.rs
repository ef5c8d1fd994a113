//! Session Manager for Wayfarer.
//!
//! Owns the tab registry, the two persisted stores, the download coordinator
//! and the preferences for one process lifetime. User operations arrive as
//! method calls; render-engine callbacks arrive through [`SessionManager::handle_event`]
//! and [`SessionManager::handle_download_event`], or in bulk via [`SessionManager::pump`].

use std::time::Duration;

use serde_json::Value;

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::download_manager::{DownloadManager, DownloadManagerTrait};
use crate::managers::history_manager::{is_recordable, HistoryManager, HistoryManagerTrait};
use crate::managers::shortcut_manager::{Action, ShortcutManager, ShortcutManagerTrait};
use crate::managers::tab_manager::{Tab, TabManager, TabManagerTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::shell::{ShellView, APP_NAME};
use crate::surface::{
    DownloadEvent, DownloadHandle, EventQueue, QueuedEvent, RenderSurface, SurfaceEvent,
    SurfaceFactory,
};
use crate::types::errors::{DownloadError, SettingsError, TabError};
use crate::types::settings::Preferences;
use crate::types::tab::{display_title, TabId, TabInfo};

pub const SEARCH_ENDPOINT: &str = "https://duckduckgo.com/?q=";

const HISTORY_DIALOG_LIMIT: usize = 100;

const STATUS_SHORT: Duration = Duration::from_secs(2);
const STATUS_LONG: Duration = Duration::from_secs(3);
const STATUS_DOWNLOAD: Duration = Duration::from_secs(5);

/// Turns URL-bar text into the url to load. `None` for blank input.
///
/// Text with an explicit http(s) scheme is used verbatim; text that looks
/// like a host gets `https://`; anything else becomes a search query.
pub fn interpret_input(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.starts_with("http://") || text.starts_with("https://") {
        return Some(text.to_string());
    }
    if text.contains('.') && !text.chars().any(char::is_whitespace) {
        return Some(format!("https://{}", text));
    }
    Some(format!("{}{}", SEARCH_ENDPOINT, text.replace(' ', "+")))
}

/// Result of one [`SessionManager::pump`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pumped {
    pub delivered: usize,
    /// Tabs opened for new-window requests, in delivery order. The engine
    /// loads each popup into its tab through [`SessionManager::surface_mut`].
    pub opened: Vec<TabId>,
}

/// What the session did with a delivered surface event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// The tab is gone; the event was dropped.
    Ignored,
    /// The engine asked for a new window and got this tab. Load into it
    /// through [`SessionManager::surface_mut`].
    OpenedTab(TabId),
}

/// The session controller.
pub struct SessionManager {
    tabs: TabManager,
    settings: SettingsEngine,
    bookmarks: BookmarkManager,
    history: HistoryManager,
    downloads: DownloadManager,
    shortcuts: ShortcutManager,
    factory: Box<dyn SurfaceFactory>,
    view: Box<dyn ShellView>,
    fullscreen: bool,
    quit_requested: bool,
}

impl SessionManager {
    /// Wires a session from loaded components. No tab exists until [`start`](Self::start).
    pub fn new(
        settings: SettingsEngine,
        bookmarks: BookmarkManager,
        history: HistoryManager,
        factory: Box<dyn SurfaceFactory>,
        view: Box<dyn ShellView>,
    ) -> Self {
        Self {
            tabs: TabManager::new(),
            settings,
            bookmarks,
            history,
            downloads: DownloadManager::new(),
            shortcuts: ShortcutManager::new(),
            factory,
            view,
            fullscreen: false,
            quit_requested: false,
        }
    }

    /// Opens the first tab on the homepage. Does nothing if tabs already exist.
    pub fn start(&mut self) -> Option<TabId> {
        if self.tabs.tab_count() > 0 {
            return None;
        }
        self.view.preferences_changed(self.settings.get_settings());
        Some(self.new_tab(None))
    }

    // --- Tab lifecycle ---

    /// Creates a tab, focuses it and loads `url` or the homepage.
    pub fn new_tab(&mut self, url: Option<&str>) -> TabId {
        let id = self.tabs.allocate_id();
        let mut tab = Tab::new(id, self.factory.create(id));
        tab.apply_preferences(self.settings.get_settings());

        let target = match url {
            Some(u) => u.to_string(),
            None => self.settings.get_settings().homepage.clone(),
        };
        let index = self.tabs.push(tab);
        self.view.set_tab_title(index, "New Tab");
        self.refocus(index);

        if let Some(tab) = self.tabs.get_mut(index) {
            tab.surface.load(&target);
        }
        log::info!("Opened {} at {}", id, target);
        id
    }

    /// Retires the tab at `index`. Closing the only tab first opens a
    /// replacement on the homepage, which ends up focused.
    pub fn close_tab(&mut self, index: usize) -> Result<(), TabError> {
        if index >= self.tabs.tab_count() {
            return Err(TabError::InvalidIndex(index));
        }

        let replacement = if self.tabs.tab_count() == 1 {
            Some(self.new_tab(None))
        } else {
            None
        };

        let mut tab = self.tabs.remove(index)?;
        tab.surface.teardown();
        log::info!("Closed {}", tab.id);
        drop(tab);

        match replacement.and_then(|id| self.tabs.index_of(id)) {
            Some(i) => self.focus_tab(i),
            None => {
                self.refresh_url_bar();
                Ok(())
            }
        }
    }

    pub fn focus_tab(&mut self, index: usize) -> Result<(), TabError> {
        self.tabs.set_focus(index)?;
        self.refresh_url_bar();
        Ok(())
    }

    fn refocus(&mut self, index: usize) {
        if let Err(e) = self.focus_tab(index) {
            log::warn!("Could not focus new tab: {}", e);
        }
    }

    fn refresh_url_bar(&mut self) {
        let url = self
            .tabs
            .focused()
            .map(|t| t.current_url.clone())
            .unwrap_or_default();
        self.view.set_url_bar(&url);
    }

    // --- Navigation ---

    /// Interprets URL-bar text and loads it in the focused tab.
    pub fn navigate(&mut self, text: &str) {
        if let Some(url) = interpret_input(text) {
            self.open_url(&url);
        }
    }

    /// Loads `url` verbatim in the focused tab.
    pub fn open_url(&mut self, url: &str) {
        if let Some(tab) = self.tabs.focused_mut() {
            log::debug!("{} loading {}", tab.id, url);
            tab.surface.load(url);
        }
    }

    pub fn back(&mut self) {
        if let Some(tab) = self.tabs.focused_mut() {
            tab.surface.back();
        }
    }

    pub fn forward(&mut self) {
        if let Some(tab) = self.tabs.focused_mut() {
            tab.surface.forward();
        }
    }

    pub fn reload(&mut self) {
        if let Some(tab) = self.tabs.focused_mut() {
            tab.surface.reload();
        }
    }

    pub fn go_home(&mut self) {
        let homepage = self.settings.get_settings().homepage.clone();
        self.open_url(&homepage);
    }

    // --- Zoom ---

    pub fn zoom_in(&mut self) -> u16 {
        let zoom = self.settings.step_zoom(1);
        self.apply_zoom_to_focused(zoom);
        self.view
            .show_status(&format!("Zoom: {}%", zoom), STATUS_SHORT);
        zoom
    }

    pub fn zoom_out(&mut self) -> u16 {
        let zoom = self.settings.step_zoom(-1);
        self.apply_zoom_to_focused(zoom);
        self.view
            .show_status(&format!("Zoom: {}%", zoom), STATUS_SHORT);
        zoom
    }

    pub fn zoom_reset(&mut self) -> u16 {
        let zoom = self.settings.reset_zoom();
        self.apply_zoom_to_focused(zoom);
        self.view.show_status("Zoom reset to 100%", STATUS_SHORT);
        zoom
    }

    fn apply_zoom_to_focused(&mut self, zoom: u16) {
        if let Some(tab) = self.tabs.focused_mut() {
            tab.surface.set_zoom(f64::from(zoom) / 100.0);
        }
    }

    // --- Bookmarks, history, preferences ---

    /// Prompts for a name and bookmarks the focused page.
    ///
    /// Returns `None` when there is nothing to bookmark or the user gave no
    /// name, otherwise whether the bookmark was new.
    pub fn bookmark_current(&mut self) -> Option<bool> {
        let (url, title) = {
            let tab = self.tabs.focused()?;
            (tab.surface.url(), tab.surface.title())
        };
        if url.is_empty() {
            return None;
        }

        let suggested = if title.is_empty() { "Untitled" } else { title.as_str() };
        let name = self.view.prompt_bookmark_name(suggested)?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let added = self.bookmarks.add(name, &url);
        let message = if added {
            "Bookmark added"
        } else {
            "Bookmark already exists"
        };
        self.view.show_status(message, STATUS_SHORT);
        Some(added)
    }

    pub fn show_bookmarks(&mut self) {
        if let Some(url) = self.view.show_bookmarks(self.bookmarks.snapshot()) {
            self.open_url(&url);
        }
    }

    pub fn show_history(&mut self) {
        let entries = self.history.recent(HISTORY_DIALOG_LIMIT);
        if let Some(url) = self.view.show_history(&entries) {
            self.open_url(&url);
        }
    }

    pub fn show_settings(&mut self) {
        let current = self.settings.get_settings().clone();
        if let Some(edited) = self.view.show_settings(&current) {
            if let Err(e) = self.commit_preferences(edited) {
                log::warn!("Preferences rejected: {}", e);
            }
        }
    }

    /// Commits a full set of preferences and applies them to every tab.
    pub fn commit_preferences(&mut self, prefs: Preferences) -> Result<(), SettingsError> {
        self.settings.commit(prefs)?;
        self.broadcast_preferences();
        Ok(())
    }

    /// Commits one preference by name and applies the result to every tab.
    pub fn set_preference(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.settings.set_value(key, value)?;
        self.broadcast_preferences();
        Ok(())
    }

    /// Restores default preferences, persists them and applies them to every tab.
    pub fn reset_preferences(&mut self) -> Result<(), SettingsError> {
        self.settings.reset()?;
        self.broadcast_preferences();
        Ok(())
    }

    fn broadcast_preferences(&mut self) {
        let prefs = self.settings.get_settings();
        self.tabs.apply_preferences(prefs);
        self.view.preferences_changed(prefs);
    }

    // --- Window ---

    pub fn toggle_dev_tools(&mut self) {
        let opened = self
            .tabs
            .focused_mut()
            .is_some_and(|t| t.surface.open_dev_tools());
        if !opened {
            self.view
                .show_status("Developer tools not available in this version", STATUS_LONG);
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.view.set_fullscreen(self.fullscreen);
    }

    pub fn exit_fullscreen(&mut self) {
        if self.fullscreen {
            self.toggle_fullscreen();
        }
    }

    pub fn show_downloads(&mut self) {
        let items = self.downloads.list();
        self.view.show_downloads(&items);
    }

    /// Runs a shell action.
    pub fn perform(&mut self, action: Action) {
        log::debug!("Action {}", action);
        match action {
            Action::NewTab | Action::NewWindow => {
                self.new_tab(None);
            }
            Action::CloseTab => {
                if let Some(index) = self.tabs.focus_index() {
                    if let Err(e) = self.close_tab(index) {
                        log::warn!("Close tab failed: {}", e);
                    }
                }
            }
            Action::Back => self.back(),
            Action::Forward => self.forward(),
            Action::Reload => self.reload(),
            Action::Home => self.go_home(),
            Action::ZoomIn => {
                self.zoom_in();
            }
            Action::ZoomOut => {
                self.zoom_out();
            }
            Action::ZoomReset => {
                self.zoom_reset();
            }
            Action::AddBookmark => {
                self.bookmark_current();
            }
            Action::ShowBookmarks => self.show_bookmarks(),
            Action::ShowHistory => self.show_history(),
            Action::ShowDownloads => self.show_downloads(),
            Action::ShowSettings => self.show_settings(),
            Action::DevTools => self.toggle_dev_tools(),
            Action::ToggleFullscreen => self.toggle_fullscreen(),
            Action::ExitFullscreen => self.exit_fullscreen(),
            Action::Quit => self.quit_requested = true,
        }
    }

    /// Resolves a keystroke such as `"Ctrl+T"` and performs its action.
    pub fn handle_keys(&mut self, keys: &str) -> Option<Action> {
        let action = self.shortcuts.action_for(keys)?;
        self.perform(action);
        Some(action)
    }

    // --- Engine events ---

    /// Routes one surface event from tab `tab`. Events for retired tabs are dropped.
    pub fn handle_event(&mut self, tab: TabId, event: SurfaceEvent) -> EventOutcome {
        let Some(index) = self.tabs.index_of(tab) else {
            log::debug!("Dropping {:?} for retired {}", event, tab);
            return EventOutcome::Ignored;
        };
        let focused = self.tabs.is_focused(tab);

        match event {
            SurfaceEvent::UrlChanged(url) => {
                if let Some(t) = self.tabs.get_mut(index) {
                    t.current_url = url.clone();
                }
                if focused {
                    self.view.set_url_bar(&url);
                }
            }
            SurfaceEvent::LoadProgress(progress) => {
                let progress = progress.min(100);
                if let Some(t) = self.tabs.get_mut(index) {
                    t.load_progress = progress;
                }
                if focused {
                    self.view
                        .set_progress((progress < 100).then_some(progress));
                }
            }
            SurfaceEvent::LoadFinished(ok) => {
                if ok {
                    if let Some(t) = self.tabs.get_mut(index) {
                        t.load_progress = 100;
                    }
                }
                if focused {
                    self.view.set_progress(None);
                    if ok {
                        self.view.show_status("Page loaded successfully", STATUS_SHORT);
                    } else {
                        self.view.show_status("Failed to load page", STATUS_LONG);
                    }
                }
            }
            SurfaceEvent::TitleChanged(title) => self.on_title_changed(index, &title),
            SurfaceEvent::NewWindowRequested => {
                return EventOutcome::OpenedTab(self.new_tab(None));
            }
            SurfaceEvent::DownloadRequested(handle) => self.on_download_requested(handle),
        }
        EventOutcome::Handled
    }

    fn on_title_changed(&mut self, index: usize, title: &str) {
        let Some(tab) = self.tabs.get_mut(index) else {
            return;
        };
        let url = tab.surface.url();
        if !title.is_empty() {
            tab.display_title = display_title(title);
            let shown = tab.display_title.clone();
            self.view.set_tab_title(index, &shown);
        }
        self.view
            .set_window_title(&format!("{} - {}", title, APP_NAME));

        if is_recordable(&url) {
            let recorded = if title.is_empty() { "Untitled" } else { title };
            self.history.record(recorded, &url);
        }
    }

    fn on_download_requested(&mut self, handle: Box<dyn DownloadHandle>) {
        let suggested = handle.suggested_path();
        let save_path = self.view.choose_save_path(&suggested).unwrap_or_default();
        let Some(id) = self.downloads.adopt(handle, &save_path) else {
            return;
        };

        let filename = self
            .downloads
            .get(id)
            .map(|d| d.filename.clone())
            .unwrap_or_default();
        self.show_downloads();
        self.view
            .show_status(&format!("Downloading {}", filename), STATUS_DOWNLOAD);
    }

    pub fn handle_download_event(&mut self, event: DownloadEvent) -> Result<(), DownloadError> {
        match event {
            DownloadEvent::Progress {
                id,
                received,
                total,
            } => self.downloads.on_progress(id, received, total),
            DownloadEvent::Finished { id } => self.downloads.on_finished(id),
        }
    }

    /// Delivers every queued event in order, including events queued while
    /// pumping.
    pub fn pump(&mut self, queue: &EventQueue) -> Pumped {
        let mut pumped = Pumped::default();
        while let Some(event) = queue.pop() {
            match event {
                QueuedEvent::Surface(tab, ev) => {
                    if let EventOutcome::OpenedTab(id) = self.handle_event(tab, ev) {
                        pumped.opened.push(id);
                    }
                }
                QueuedEvent::Download(ev) => {
                    if let Err(e) = self.handle_download_event(ev) {
                        log::warn!("Download event dropped: {}", e);
                    }
                }
            }
            pumped.delivered += 1;
        }
        pumped
    }

    // --- Accessors ---

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn tab_infos(&self) -> Vec<TabInfo> {
        self.tabs.infos()
    }

    /// The render surface of tab `id`, for hosts that load into engine-opened tabs.
    pub fn surface_mut(&mut self, id: TabId) -> Option<&mut (dyn RenderSurface + 'static)> {
        self.tabs.find_mut(id).map(|t| &mut *t.surface)
    }

    pub fn preferences(&self) -> &Preferences {
        self.settings.get_settings()
    }

    pub fn settings(&self) -> &SettingsEngine {
        &self.settings
    }

    pub fn bookmarks(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    pub fn bookmarks_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryManager {
        &mut self.history
    }

    pub fn downloads(&self) -> &DownloadManager {
        &self.downloads
    }

    pub fn downloads_mut(&mut self) -> &mut DownloadManager {
        &mut self.downloads
    }

    pub fn shortcuts(&self) -> &ShortcutManager {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutManager {
        &mut self.shortcuts
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
