//! Headless engine: surfaces that keep navigation state in memory and
//! simulate a successful page load for every navigation.
//!
//! Used by the stdin/stdout shell binary and by tests. Each surface's state
//! is shared with the [`HeadlessEngine`] that created it so callers can
//! inspect what the session asked the surface to do.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use url::Url;

use super::{DownloadHandle, EventQueue, RenderSurface, SurfaceEvent, SurfaceFactory};
use crate::types::download::DownloadId;
use crate::types::tab::TabId;

/// Observable state of one headless surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    pub url: String,
    pub title: String,
    pub zoom: f64,
    pub javascript: bool,
    pub images: bool,
    /// Every url the surface navigated to, in order.
    pub loads: Vec<String>,
    pub reloads: u32,
    pub torn_down: bool,
}

impl Default for SurfaceRecord {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: String::new(),
            zoom: 1.0,
            javascript: true,
            images: true,
            loads: Vec::new(),
            reloads: 0,
            torn_down: false,
        }
    }
}

/// Factory for headless surfaces. Clones share the same registry of records.
#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    queue: Option<EventQueue>,
    records: Rc<RefCell<BTreeMap<TabId, Rc<RefCell<SurfaceRecord>>>>>,
}

impl HeadlessEngine {
    /// An engine whose surfaces stay silent: no events are raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose surfaces report simulated load events into `queue`.
    pub fn with_events(queue: EventQueue) -> Self {
        Self {
            queue: Some(queue),
            records: Rc::default(),
        }
    }

    /// Snapshot of the surface created for `tab`, if any.
    pub fn record(&self, tab: TabId) -> Option<SurfaceRecord> {
        self.records.borrow().get(&tab).map(|r| r.borrow().clone())
    }
}

impl SurfaceFactory for HeadlessEngine {
    fn create(&mut self, tab: TabId) -> Box<dyn RenderSurface> {
        let record = Rc::new(RefCell::new(SurfaceRecord::default()));
        self.records.borrow_mut().insert(tab, Rc::clone(&record));
        Box::new(HeadlessSurface {
            tab,
            record,
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
            queue: self.queue.clone(),
        })
    }
}

/// In-memory render surface with a simple back/forward stack.
pub struct HeadlessSurface {
    tab: TabId,
    record: Rc<RefCell<SurfaceRecord>>,
    back_stack: Vec<String>,
    forward_stack: Vec<String>,
    queue: Option<EventQueue>,
}

impl HeadlessSurface {
    fn navigate(&mut self, url: &str) {
        let title = page_title(url);
        {
            let mut rec = self.record.borrow_mut();
            rec.url = url.to_string();
            rec.title = title.clone();
            rec.loads.push(url.to_string());
        }
        self.emit_load(url, &title);
    }

    fn emit_load(&self, url: &str, title: &str) {
        if let Some(queue) = &self.queue {
            queue.push_surface(self.tab, SurfaceEvent::UrlChanged(url.to_string()));
            queue.push_surface(self.tab, SurfaceEvent::LoadProgress(50));
            queue.push_surface(self.tab, SurfaceEvent::TitleChanged(title.to_string()));
            queue.push_surface(self.tab, SurfaceEvent::LoadProgress(100));
            queue.push_surface(self.tab, SurfaceEvent::LoadFinished(true));
        }
    }
}

/// Simulated page title: the url's host, or the url itself.
fn page_title(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

impl RenderSurface for HeadlessSurface {
    fn load(&mut self, url: &str) {
        let current = self.record.borrow().url.clone();
        if !current.is_empty() {
            self.back_stack.push(current);
        }
        self.forward_stack.clear();
        self.navigate(url);
    }

    fn back(&mut self) {
        if let Some(prev) = self.back_stack.pop() {
            let current = self.record.borrow().url.clone();
            self.forward_stack.push(current);
            self.navigate(&prev);
        }
    }

    fn forward(&mut self) {
        if let Some(next) = self.forward_stack.pop() {
            let current = self.record.borrow().url.clone();
            self.back_stack.push(current);
            self.navigate(&next);
        }
    }

    fn reload(&mut self) {
        let (url, title) = {
            let mut rec = self.record.borrow_mut();
            rec.reloads += 1;
            (rec.url.clone(), rec.title.clone())
        };
        if !url.is_empty() {
            self.emit_load(&url, &title);
        }
    }

    fn set_zoom(&mut self, factor: f64) {
        self.record.borrow_mut().zoom = factor;
    }

    fn set_javascript(&mut self, enabled: bool) {
        self.record.borrow_mut().javascript = enabled;
    }

    fn set_auto_load_images(&mut self, enabled: bool) {
        self.record.borrow_mut().images = enabled;
    }

    fn url(&self) -> String {
        self.record.borrow().url.clone()
    }

    fn title(&self) -> String {
        self.record.borrow().title.clone()
    }

    fn teardown(&mut self) {
        self.record.borrow_mut().torn_down = true;
    }
}

/// Observable state of a headless download handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadRecord {
    pub save_path: Option<String>,
    pub accepted_as: Option<DownloadId>,
    pub cancelled: bool,
}

/// A download handle that only records what was asked of it.
#[derive(Debug, Clone)]
pub struct HeadlessDownload {
    source_url: String,
    suggested_path: String,
    record: Rc<RefCell<DownloadRecord>>,
}

impl HeadlessDownload {
    pub fn new(source_url: &str, suggested_path: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            suggested_path: suggested_path.to_string(),
            record: Rc::default(),
        }
    }

    /// Shared view of the handle's state; stays valid after the handle moves.
    pub fn record(&self) -> Rc<RefCell<DownloadRecord>> {
        Rc::clone(&self.record)
    }
}

impl DownloadHandle for HeadlessDownload {
    fn source_url(&self) -> String {
        self.source_url.clone()
    }

    fn suggested_path(&self) -> String {
        self.suggested_path.clone()
    }

    fn set_save_path(&mut self, path: &str) {
        self.record.borrow_mut().save_path = Some(path.to_string());
    }

    fn accept(&mut self, id: DownloadId) {
        self.record.borrow_mut().accepted_as = Some(id);
    }

    fn cancel(&mut self) {
        self.record.borrow_mut().cancelled = true;
    }
}
