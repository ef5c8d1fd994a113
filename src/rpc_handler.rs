//! RPC method handler for the Wayfarer line protocol.
//!
//! `handle_method` dispatches one request onto the session held by `App`,
//! then delivers whatever engine events the request produced. Kept apart
//! from the binary so it can be tested without stdin/stdout.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::download_manager::DownloadManagerTrait;
use crate::managers::history_manager::HistoryManagerTrait;
use crate::managers::shortcut_manager::{Action, ShortcutManagerTrait};
use crate::managers::tab_manager::TabManagerTrait;
use crate::surface::headless::HeadlessDownload;
use crate::surface::{DownloadEvent, SurfaceEvent};
use crate::types::download::DownloadId;
use crate::types::errors::ShortcutError;

const DEFAULT_HISTORY_LIMIT: usize = 100;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn index_param(params: &Value, key: &str) -> Result<usize, String> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .ok_or_else(|| format!("missing {}", key))
}

fn u64_param(params: &Value, key: &str) -> Result<u64, String> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| format!("missing {}", key))
}

fn download_id_param(params: &Value) -> Result<DownloadId, String> {
    let raw = str_param(params, "id")?;
    DownloadId::parse(raw).ok_or_else(|| format!("invalid download id: {}", raw))
}

/// Dispatch one method call and deliver the engine events it caused.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    let result = dispatch(app, method, params);
    let pumped = app.pump();
    if pumped.delivered > 0 {
        log::debug!("{} delivered {} engine event(s)", method, pumped.delivered);
    }
    result
}

fn dispatch(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    let session = &mut app.session;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Navigation ───
        "navigate" => {
            let text = str_param(params, "text")?;
            session.navigate(text);
            Ok(json!({"ok": true}))
        }
        "open" => {
            let url = str_param(params, "url")?;
            session.open_url(url);
            Ok(json!({"ok": true}))
        }
        "back" => {
            session.back();
            Ok(json!({"ok": true}))
        }
        "forward" => {
            session.forward();
            Ok(json!({"ok": true}))
        }
        "reload" => {
            session.reload();
            Ok(json!({"ok": true}))
        }
        "home" => {
            session.go_home();
            Ok(json!({"ok": true}))
        }

        // ─── Tabs ───
        "tab.new" => {
            let url = params.get("url").and_then(|v| v.as_str());
            let id = session.new_tab(url);
            Ok(json!({"id": id.0}))
        }
        "tab.close" => {
            let index = match params.get("index") {
                Some(_) => index_param(params, "index")?,
                None => session.tabs().focus_index().ok_or("no focused tab")?,
            };
            session.close_tab(index).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.focus" => {
            let index = index_param(params, "index")?;
            session.focus_tab(index).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.list" => serde_json::to_value(session.tab_infos()).map_err(|e| e.to_string()),

        // ─── Zoom ───
        "zoom.in" => Ok(json!({"zoom": session.zoom_in()})),
        "zoom.out" => Ok(json!({"zoom": session.zoom_out()})),
        "zoom.reset" => Ok(json!({"zoom": session.zoom_reset()})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let url = str_param(params, "url")?;
            let title = str_param(params, "title")?.trim();
            if url.trim().is_empty() {
                return Err("url cannot be empty".to_string());
            }
            if title.is_empty() {
                return Ok(json!({"added": false}));
            }
            let added = session.bookmarks_mut().add(title, url);
            Ok(json!({"added": added}))
        }
        "bookmark.current" => Ok(json!({"added": session.bookmark_current()})),
        "bookmark.list" => {
            serde_json::to_value(session.bookmarks().snapshot()).map_err(|e| e.to_string())
        }
        "bookmark.remove" => {
            let url = str_param(params, "url")?;
            session.bookmarks_mut().remove(url);
            Ok(json!({"ok": true}))
        }

        // ─── History ───
        "history.recent" => {
            let limit = params
                .get("limit")
                .and_then(|v| v.as_u64())
                .map_or(DEFAULT_HISTORY_LIMIT, |n| n as usize);
            let arr: Vec<Value> = session
                .history()
                .recent(limit)
                .iter()
                .map(|h| json!({"title": h.title, "url": h.url, "time": h.display_time()}))
                .collect();
            Ok(json!(arr))
        }
        "history.clear" => {
            session.history_mut().clear();
            Ok(json!({"ok": true}))
        }

        // ─── Downloads ───
        "download.list" => {
            let arr: Vec<Value> = session
                .downloads()
                .list()
                .iter()
                .map(|d| {
                    json!({
                        "id": d.id.to_string(),
                        "filename": d.filename,
                        "save_path": d.save_path,
                        "percent": d.percent,
                        "state": d.state,
                        "status": d.status_line(),
                    })
                })
                .collect();
            Ok(json!(arr))
        }
        "download.cancel" => {
            let id = download_id_param(params)?;
            session.downloads_mut().cancel(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "download.clear" => {
            session.downloads_mut().clear_completed();
            Ok(json!({"remaining": session.downloads().len()}))
        }

        // ─── Settings ───
        "settings.get" => serde_json::to_value(session.preferences()).map_err(|e| e.to_string()),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            session.set_preference(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            session.reset_preferences().map_err(|e| e.to_string())?;
            serde_json::to_value(session.preferences()).map_err(|e| e.to_string())
        }

        // ─── Shortcuts and actions ───
        "key" => {
            let keys = str_param(params, "keys")?;
            let action = session
                .handle_keys(keys)
                .ok_or_else(|| format!("no action bound to {}", keys))?;
            Ok(json!({"action": action.name(), "quit": session.quit_requested()}))
        }
        "action" => {
            let action: Action = str_param(params, "name")?
                .parse()
                .map_err(|e: ShortcutError| e.to_string())?;
            session.perform(action);
            Ok(json!({"action": action.name(), "quit": session.quit_requested()}))
        }
        "shortcut.list" => {
            let map: serde_json::Map<String, Value> = session
                .shortcuts()
                .list_shortcuts()
                .iter()
                .map(|(a, k)| (a.name().to_string(), json!(k)))
                .collect();
            Ok(Value::Object(map))
        }
        "shortcut.set" => {
            let action: Action = str_param(params, "action")?
                .parse()
                .map_err(|e: ShortcutError| e.to_string())?;
            let keys = str_param(params, "keys")?;
            session
                .shortcuts_mut()
                .register_shortcut(action, keys)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Simulated engine input (headless engine only) ───
        "engine.download" => {
            let url = str_param(params, "url")?;
            let suggested = params
                .get("suggested_path")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url).to_string());
            let tab = session.tabs().focused().map(|t| t.id).ok_or("no focused tab")?;
            let before = session.downloads().len();
            app.events.push_surface(
                tab,
                SurfaceEvent::DownloadRequested(Box::new(HeadlessDownload::new(url, &suggested))),
            );
            app.pump();
            let adopted = app
                .session
                .downloads()
                .list()
                .get(before)
                .map(|d| d.id.to_string());
            Ok(json!({"id": adopted}))
        }
        "engine.new_window" => {
            let url = str_param(params, "url")?;
            let tab = session.tabs().focused().map(|t| t.id).ok_or("no focused tab")?;
            app.events.push_surface(tab, SurfaceEvent::NewWindowRequested);
            let opened = app.pump().opened;
            let mut ids = Vec::with_capacity(opened.len());
            for id in opened {
                if let Some(surface) = app.session.surface_mut(id) {
                    surface.load(url);
                }
                ids.push(id.0);
            }
            Ok(json!({"opened": ids}))
        }
        "engine.progress" => {
            let id = download_id_param(params)?;
            let received = u64_param(params, "received")?;
            let total = u64_param(params, "total")?;
            session
                .handle_download_event(DownloadEvent::Progress {
                    id,
                    received,
                    total,
                })
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "engine.finished" => {
            let id = download_id_param(params)?;
            session
                .handle_download_event(DownloadEvent::Finished { id })
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
