//! Download Manager for Wayfarer.
//!
//! Adopts download handles surrendered by the render engine, tracks
//! per-item progress, and exposes cancel/complete transitions. Items move
//! `Pending → Active → (Completed | Cancelled)`; terminal states are sticky.

use crate::surface::DownloadHandle;
use crate::types::download::{DownloadId, DownloadItem, DownloadState};
use crate::types::errors::DownloadError;

/// Trait defining download coordination operations.
pub trait DownloadManagerTrait {
    fn adopt(&mut self, handle: Box<dyn DownloadHandle>, save_path: &str) -> Option<DownloadId>;
    fn cancel(&mut self, id: DownloadId) -> Result<(), DownloadError>;
    fn on_progress(&mut self, id: DownloadId, received: u64, total: u64) -> Result<(), DownloadError>;
    fn on_finished(&mut self, id: DownloadId) -> Result<(), DownloadError>;
    fn clear_completed(&mut self);
    fn list(&self) -> Vec<&DownloadItem>;
    fn get(&self, id: DownloadId) -> Option<&DownloadItem>;
}

struct Tracked {
    item: DownloadItem,
    /// Held until the item reaches a terminal state.
    handle: Option<Box<dyn DownloadHandle>>,
}

/// In-memory download coordinator. Items are kept in adoption order.
#[derive(Default)]
pub struct DownloadManager {
    downloads: Vec<Tracked>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_mut(&mut self, id: DownloadId) -> Result<&mut Tracked, DownloadError> {
        self.downloads
            .iter_mut()
            .find(|d| d.item.id == id)
            .ok_or(DownloadError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.downloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }
}

fn percent_of(received: u64, total: u64) -> u8 {
    let pct = u128::from(received) * 100 / u128::from(total);
    pct.min(100) as u8
}

impl DownloadManagerTrait for DownloadManager {
    /// Binds `handle` to a new item saved at `save_path` and resumes it.
    ///
    /// An empty `save_path` means the user declined: the handle is cancelled
    /// and no item is created.
    fn adopt(&mut self, mut handle: Box<dyn DownloadHandle>, save_path: &str) -> Option<DownloadId> {
        if save_path.is_empty() {
            log::info!("Download of {} declined", handle.source_url());
            handle.cancel();
            return None;
        }

        let mut item = DownloadItem::new(&handle.source_url(), save_path);
        let id = item.id;
        handle.set_save_path(save_path);
        handle.accept(id);
        item.state = DownloadState::Active;

        log::info!("Downloading {} to {}", item.source_url, item.save_path);
        self.downloads.push(Tracked {
            item,
            handle: Some(handle),
        });
        Some(id)
    }

    /// Asks the engine to stop and marks the item `Cancelled`.
    /// Items already in a terminal state are left alone.
    fn cancel(&mut self, id: DownloadId) -> Result<(), DownloadError> {
        let tracked = self.find_mut(id)?;
        if tracked.item.state.is_terminal() {
            return Ok(());
        }
        if let Some(mut handle) = tracked.handle.take() {
            handle.cancel();
        }
        tracked.item.state = DownloadState::Cancelled;
        tracked.item.percent = 0;
        log::info!("Download {} cancelled", tracked.item.filename);
        Ok(())
    }

    fn on_progress(&mut self, id: DownloadId, received: u64, total: u64) -> Result<(), DownloadError> {
        let tracked = self.find_mut(id)?;
        if tracked.item.state.is_terminal() {
            log::debug!("Ignoring progress for finished download {}", id);
            return Ok(());
        }
        tracked.item.state = DownloadState::Active;
        tracked.item.bytes_received = received;
        tracked.item.bytes_total = total;
        if total > 0 {
            tracked.item.percent = percent_of(received, total);
        }
        Ok(())
    }

    fn on_finished(&mut self, id: DownloadId) -> Result<(), DownloadError> {
        let tracked = self.find_mut(id)?;
        if tracked.item.state.is_terminal() {
            return Ok(());
        }
        tracked.item.state = DownloadState::Completed;
        tracked.item.percent = 100;
        tracked.handle = None;
        log::info!("Download {} completed", tracked.item.filename);
        Ok(())
    }

    /// Drops every item in a terminal state.
    fn clear_completed(&mut self) {
        self.downloads.retain(|d| !d.item.state.is_terminal());
    }

    fn list(&self) -> Vec<&DownloadItem> {
        self.downloads.iter().map(|d| &d.item).collect()
    }

    fn get(&self, id: DownloadId) -> Option<&DownloadItem> {
        self.downloads.iter().map(|d| &d.item).find(|i| i.id == id)
    }
}
