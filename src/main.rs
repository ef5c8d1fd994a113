//! Wayfarer headless shell: newline-delimited JSON over stdin/stdout.
//!
//! Request:  {"id":1, "method":"navigate", "params":{"text":"example.com"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Shell output (url bar, status line, titles) is emitted as {"event":...} lines.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use serde_json::{json, Value};

use wayfarer::app::{App, AppConfig};
use wayfarer::rpc_handler::handle_method;
use wayfarer::shell::ShellView;
use wayfarer::types::download::DownloadItem;
use wayfarer::types::settings::Preferences;

/// Shell view that writes every UI update to stdout as an event line.
/// Save dialogs and bookmark prompts accept the suggestion.
struct ConsoleView;

impl ConsoleView {
    fn emit(&self, event: Value) {
        let mut out = io::stdout().lock();
        if writeln!(out, "{}", event).and_then(|_| out.flush()).is_err() {
            log::warn!("stdout closed; dropping event");
        }
    }
}

impl ShellView for ConsoleView {
    fn set_url_bar(&mut self, text: &str) {
        self.emit(json!({"event": "url_bar", "text": text}));
    }

    fn set_progress(&mut self, progress: Option<u8>) {
        self.emit(json!({"event": "progress", "value": progress}));
    }

    fn show_status(&mut self, message: &str, timeout: Duration) {
        self.emit(json!({"event": "status", "message": message, "timeout_ms": timeout.as_millis() as u64}));
    }

    fn set_tab_title(&mut self, index: usize, title: &str) {
        self.emit(json!({"event": "tab_title", "index": index, "title": title}));
    }

    fn set_window_title(&mut self, title: &str) {
        self.emit(json!({"event": "window_title", "title": title}));
    }

    fn choose_save_path(&mut self, suggested: &str) -> Option<String> {
        Some(suggested.to_string())
    }

    fn prompt_bookmark_name(&mut self, suggested: &str) -> Option<String> {
        Some(suggested.to_string())
    }

    fn preferences_changed(&mut self, prefs: &Preferences) {
        self.emit(json!({"event": "preferences", "value": prefs}));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.emit(json!({"event": "fullscreen", "value": fullscreen}));
    }

    fn show_downloads(&mut self, items: &[&DownloadItem]) {
        let lines: Vec<String> = items.iter().map(|d| d.status_line()).collect();
        self.emit(json!({"event": "downloads", "items": lines}));
    }
}

fn respond(response: Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", response)?;
    out.flush()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let mut app = App::new(config, Box::new(ConsoleView));
    app.startup();

    if respond(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).is_err() {
        return;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                if respond(json!({"id": null, "error": format!("parse error: {}", e)})).is_err() {
                    break;
                }
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&mut app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        if respond(response).is_err() {
            break;
        }
        if app.session.quit_requested() {
            break;
        }
    }

    app.shutdown();
}
