//! Wayfarer: the core of a tabbed web-browsing shell.
//!
//! Tab dispatch, persisted bookmarks and history, download coordination and
//! preferences, driven through a render-surface contract so any embedded
//! engine (or the bundled headless one) can sit underneath.

pub mod app;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod shell;
pub mod storage;
pub mod surface;
pub mod types;
