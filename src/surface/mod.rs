//! Render surface contract.
//!
//! The session core never talks to a web engine directly. Each tab owns one
//! [`RenderSurface`]; surfaces are created through a [`SurfaceFactory`] and
//! report back by having the host deliver [`SurfaceEvent`]s to
//! `SessionManager::handle_event`. Engines that raise events from inside
//! their own callbacks can buffer them in an [`EventQueue`] and let the host
//! pump it, which keeps every event on the session's thread and avoids any
//! reference from a surface back to the session.

pub mod headless;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::types::download::DownloadId;
use crate::types::tab::TabId;

/// Commands the session issues to one embedded rendering surface.
pub trait RenderSurface {
    fn load(&mut self, url: &str);
    fn back(&mut self);
    fn forward(&mut self);
    fn reload(&mut self);
    fn set_zoom(&mut self, factor: f64);
    fn set_javascript(&mut self, enabled: bool);
    fn set_auto_load_images(&mut self, enabled: bool);
    fn url(&self) -> String;
    fn title(&self) -> String;

    /// Opens the engine's developer tools. Returns false when unsupported.
    fn open_dev_tools(&mut self) -> bool {
        false
    }

    /// Called once when the owning tab is retired, before the surface is dropped.
    fn teardown(&mut self) {}
}

/// Builds surfaces for new tabs.
pub trait SurfaceFactory {
    fn create(&mut self, tab: TabId) -> Box<dyn RenderSurface>;
}

/// An engine-owned transfer surrendered to the session for a download.
pub trait DownloadHandle {
    fn source_url(&self) -> String;
    /// Path the engine proposes; shown in the save dialog.
    fn suggested_path(&self) -> String;
    fn set_save_path(&mut self, path: &str);
    /// Resumes the transfer. Further progress and completion for this
    /// transfer are reported to the session under `id`.
    fn accept(&mut self, id: DownloadId);
    fn cancel(&mut self);
}

/// Asynchronous notifications raised by a surface.
pub enum SurfaceEvent {
    UrlChanged(String),
    LoadProgress(u8),
    LoadFinished(bool),
    TitleChanged(String),
    NewWindowRequested,
    DownloadRequested(Box<dyn DownloadHandle>),
}

impl fmt::Debug for SurfaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceEvent::UrlChanged(u) => f.debug_tuple("UrlChanged").field(u).finish(),
            SurfaceEvent::LoadProgress(p) => f.debug_tuple("LoadProgress").field(p).finish(),
            SurfaceEvent::LoadFinished(ok) => f.debug_tuple("LoadFinished").field(ok).finish(),
            SurfaceEvent::TitleChanged(t) => f.debug_tuple("TitleChanged").field(t).finish(),
            SurfaceEvent::NewWindowRequested => f.write_str("NewWindowRequested"),
            SurfaceEvent::DownloadRequested(h) => f
                .debug_tuple("DownloadRequested")
                .field(&h.source_url())
                .finish(),
        }
    }
}

/// Engine-side download notifications, keyed by the id given on accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Progress { id: DownloadId, received: u64, total: u64 },
    Finished { id: DownloadId },
}

/// Anything the host loop can deliver to the session.
#[derive(Debug)]
pub enum QueuedEvent {
    Surface(TabId, SurfaceEvent),
    Download(DownloadEvent),
}

/// Single-threaded FIFO of pending engine events. Cloning shares the queue.
#[derive(Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<VecDeque<QueuedEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_surface(&self, tab: TabId, event: SurfaceEvent) {
        self.inner.borrow_mut().push_back(QueuedEvent::Surface(tab, event));
    }

    pub fn push_download(&self, event: DownloadEvent) {
        self.inner.borrow_mut().push_back(QueuedEvent::Download(event));
    }

    pub fn pop(&self) -> Option<QueuedEvent> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue").field("pending", &self.len()).finish()
    }
}
