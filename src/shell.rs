//! Presentation shell contract.
//!
//! The session drives whatever draws the window through [`ShellView`]. The
//! view never calls back into the session; user input reaches the session as
//! ordinary method calls from the host loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::types::bookmark::Bookmark;
use crate::types::download::DownloadItem;
use crate::types::history::HistoryEntry;
use crate::types::settings::Preferences;

pub const APP_NAME: &str = "Wayfarer";

/// Output side of the shell: everything the session asks the UI to show.
pub trait ShellView {
    fn set_url_bar(&mut self, text: &str);
    /// `None` hides the progress bar.
    fn set_progress(&mut self, progress: Option<u8>);
    fn show_status(&mut self, message: &str, timeout: Duration);
    fn set_tab_title(&mut self, index: usize, title: &str);
    fn set_window_title(&mut self, title: &str);
    /// Modal save dialog seeded with `suggested`. `None` when the user declines.
    fn choose_save_path(&mut self, suggested: &str) -> Option<String>;
    /// Modal prompt for a bookmark name seeded with the page title.
    fn prompt_bookmark_name(&mut self, suggested: &str) -> Option<String>;

    fn preferences_changed(&mut self, _prefs: &Preferences) {}
    fn set_fullscreen(&mut self, _fullscreen: bool) {}
    fn show_downloads(&mut self, _items: &[&DownloadItem]) {}

    /// Bookmarks dialog. Returns the url the user chose to open.
    fn show_bookmarks(&mut self, _bookmarks: &[Bookmark]) -> Option<String> {
        None
    }

    /// History dialog, newest first. Returns the url the user chose to open.
    fn show_history(&mut self, _entries: &[HistoryEntry]) -> Option<String> {
        None
    }

    /// Preferences dialog. Returns the edited preferences when the user saves.
    fn show_settings(&mut self, _current: &Preferences) -> Option<Preferences> {
        None
    }
}

/// Everything a [`RecordingView`] has been told, in order where it matters.
#[derive(Debug, Clone, Default)]
pub struct ShellLog {
    pub url_bar: String,
    pub progress: Option<u8>,
    pub statuses: Vec<(String, Duration)>,
    pub tab_titles: Vec<(usize, String)>,
    pub window_title: String,
    pub fullscreen: bool,
    pub downloads_shown: u32,
    pub dialogs: Vec<&'static str>,
    /// Text each save dialog or bookmark prompt was seeded with.
    pub suggestions: Vec<String>,
    pub preferences_broadcasts: u32,
}

impl ShellLog {
    pub fn last_status(&self) -> Option<&str> {
        self.statuses.last().map(|(m, _)| m.as_str())
    }
}

/// View that remembers what it was asked to display and answers dialogs
/// with canned replies. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    log: Rc<RefCell<ShellLog>>,
    save_path: Rc<RefCell<Option<String>>>,
    bookmark_name: Rc<RefCell<Option<String>>>,
    open_url: Rc<RefCell<Option<String>>>,
    settings: Rc<RefCell<Option<Preferences>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply for the next save dialog; `None` declines.
    pub fn answer_save_path(&self, path: Option<&str>) {
        *self.save_path.borrow_mut() = path.map(str::to_string);
    }

    /// Reply for the next bookmark-name prompt; `None` cancels.
    pub fn answer_bookmark_name(&self, name: Option<&str>) {
        *self.bookmark_name.borrow_mut() = name.map(str::to_string);
    }

    /// Url the next bookmarks or history dialog opens.
    pub fn answer_open_url(&self, url: Option<&str>) {
        *self.open_url.borrow_mut() = url.map(str::to_string);
    }

    /// Preferences the next settings dialog saves.
    pub fn answer_settings(&self, prefs: Option<Preferences>) {
        *self.settings.borrow_mut() = prefs;
    }

    pub fn log(&self) -> ShellLog {
        self.log.borrow().clone()
    }
}

impl ShellView for RecordingView {
    fn set_url_bar(&mut self, text: &str) {
        self.log.borrow_mut().url_bar = text.to_string();
    }

    fn set_progress(&mut self, progress: Option<u8>) {
        self.log.borrow_mut().progress = progress;
    }

    fn show_status(&mut self, message: &str, timeout: Duration) {
        self.log
            .borrow_mut()
            .statuses
            .push((message.to_string(), timeout));
    }

    fn set_tab_title(&mut self, index: usize, title: &str) {
        self.log
            .borrow_mut()
            .tab_titles
            .push((index, title.to_string()));
    }

    fn set_window_title(&mut self, title: &str) {
        self.log.borrow_mut().window_title = title.to_string();
    }

    fn choose_save_path(&mut self, suggested: &str) -> Option<String> {
        self.log.borrow_mut().suggestions.push(suggested.to_string());
        self.save_path.borrow_mut().take()
    }

    fn prompt_bookmark_name(&mut self, suggested: &str) -> Option<String> {
        self.log.borrow_mut().suggestions.push(suggested.to_string());
        self.bookmark_name.borrow_mut().take()
    }

    fn preferences_changed(&mut self, _prefs: &Preferences) {
        self.log.borrow_mut().preferences_broadcasts += 1;
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.log.borrow_mut().fullscreen = fullscreen;
    }

    fn show_downloads(&mut self, _items: &[&DownloadItem]) {
        self.log.borrow_mut().downloads_shown += 1;
    }

    fn show_bookmarks(&mut self, _bookmarks: &[Bookmark]) -> Option<String> {
        self.log.borrow_mut().dialogs.push("bookmarks");
        self.open_url.borrow_mut().take()
    }

    fn show_history(&mut self, _entries: &[HistoryEntry]) -> Option<String> {
        self.log.borrow_mut().dialogs.push("history");
        self.open_url.borrow_mut().take()
    }

    fn show_settings(&mut self, _current: &Preferences) -> Option<Preferences> {
        self.log.borrow_mut().dialogs.push("settings");
        self.settings.borrow_mut().take()
    }
}
