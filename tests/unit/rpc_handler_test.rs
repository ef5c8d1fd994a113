//! Unit tests for the RPC handler: the methods dispatched by `handle_method`.
//!
//! These tests go through the same code path as the `wayfarer` binary, with
//! an App whose files live in a temporary directory.

use serde_json::json;
use tempfile::TempDir;

use wayfarer::app::{App, AppConfig};
use wayfarer::rpc_handler::handle_method;
use wayfarer::shell::RecordingView;

/// Create a started App backed by a temp directory.
fn setup() -> (App, RecordingView, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let view = RecordingView::new();
    let mut app = App::new(AppConfig::in_dir(tmp.path()), Box::new(view.clone()));
    app.startup();
    (app, view, tmp)
}

// ─── Ping ───

#[test]
fn test_ping() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "ping", &json!({})).unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method / bad params ───

#[test]
fn test_unknown_method_returns_error() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

#[test]
fn test_missing_param_returns_error() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "navigate", &json!({}));
    assert_eq!(res.unwrap_err(), "missing text");
}

// ─── Navigation and tabs ───

#[test]
fn test_navigate_updates_url_bar_after_pump() {
    let (mut app, view, _tmp) = setup();
    handle_method(&mut app, "navigate", &json!({"text": "example.com"})).unwrap();
    assert_eq!(view.log().url_bar, "https://example.com");

    let tabs = handle_method(&mut app, "tab.list", &json!({})).unwrap();
    assert_eq!(tabs[0]["current_url"], "https://example.com");
    assert_eq!(tabs[0]["display_title"], "example.com");
    assert_eq!(tabs[0]["focused"], true);
}

#[test]
fn test_tab_new_close_focus() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "tab.new", &json!({"url": "https://b.test"})).unwrap();
    assert_eq!(res["id"], 2);

    handle_method(&mut app, "tab.focus", &json!({"index": 0})).unwrap();
    handle_method(&mut app, "tab.close", &json!({})).unwrap();
    let tabs = handle_method(&mut app, "tab.list", &json!({})).unwrap();
    assert_eq!(tabs.as_array().unwrap().len(), 1);
    assert_eq!(tabs[0]["id"], 2);

    let err = handle_method(&mut app, "tab.focus", &json!({"index": 9})).unwrap_err();
    assert_eq!(err, "Invalid tab index: 9");
}

// ─── Bookmarks ───

#[test]
fn test_bookmark_add_list_remove() {
    let (mut app, _view, _tmp) = setup();
    let first = handle_method(&mut app, "bookmark.add", &json!({"title": "A", "url": "u"})).unwrap();
    let second = handle_method(&mut app, "bookmark.add", &json!({"title": "B", "url": "u"})).unwrap();
    assert_eq!(first, json!({"added": true}));
    assert_eq!(second, json!({"added": false}));

    let list = handle_method(&mut app, "bookmark.list", &json!({})).unwrap();
    assert_eq!(list, json!([{"title": "A", "url": "u"}]));

    handle_method(&mut app, "bookmark.remove", &json!({"url": "u"})).unwrap();
    let list = handle_method(&mut app, "bookmark.list", &json!({})).unwrap();
    assert_eq!(list, json!([]));
}

#[test]
fn test_bookmark_add_with_blank_title_is_ignored() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "bookmark.add", &json!({"title": "   ", "url": "https://x.test"}))
        .unwrap();
    assert_eq!(res, json!({"added": false}));
    let list = handle_method(&mut app, "bookmark.list", &json!({})).unwrap();
    assert_eq!(list, json!([]));

    handle_method(&mut app, "bookmark.add", &json!({"title": "  X  ", "url": "https://x.test"})).unwrap();
    let list = handle_method(&mut app, "bookmark.list", &json!({})).unwrap();
    assert_eq!(list, json!([{"title": "X", "url": "https://x.test"}]));
}

// ─── History ───

#[test]
fn test_history_recent_and_clear() {
    let (mut app, _view, _tmp) = setup();
    handle_method(&mut app, "navigate", &json!({"text": "https://b.test"})).unwrap();

    let recent = handle_method(&mut app, "history.recent", &json!({"limit": 10})).unwrap();
    assert_eq!(recent[0]["url"], "https://b.test");
    assert_eq!(recent[1]["url"], "https://duckduckgo.com");
    assert_eq!(recent[0]["time"].as_str().unwrap().len(), 19);

    handle_method(&mut app, "history.clear", &json!({})).unwrap();
    let recent = handle_method(&mut app, "history.recent", &json!({})).unwrap();
    assert_eq!(recent, json!([]));
}

// ─── Downloads ───

#[test]
fn test_download_flow() {
    let (mut app, view, tmp) = setup();
    let path = tmp.path().join("f.zip");
    view.answer_save_path(Some(path.to_str().unwrap()));

    let res = handle_method(&mut app, "engine.download", &json!({"url": "https://a.test/f.zip"})).unwrap();
    let id = res["id"].as_str().unwrap().to_string();

    handle_method(
        &mut app,
        "engine.progress",
        &json!({"id": id, "received": 250, "total": 1000}),
    )
    .unwrap();
    let list = handle_method(&mut app, "download.list", &json!({})).unwrap();
    assert_eq!(list[0]["percent"], 25);
    assert_eq!(list[0]["status"], "f.zip - 25%");
    assert_eq!(list[0]["state"], "Active");

    handle_method(&mut app, "download.cancel", &json!({"id": id})).unwrap();
    let cleared = handle_method(&mut app, "download.clear", &json!({})).unwrap();
    assert_eq!(cleared, json!({"remaining": 0}));
}

#[test]
fn test_declined_download_returns_null_id() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "engine.download", &json!({"url": "https://a.test/f"})).unwrap();
    assert!(res["id"].is_null());
}

#[test]
fn test_bad_download_id_is_rejected() {
    let (mut app, _view, _tmp) = setup();
    let err = handle_method(&mut app, "download.cancel", &json!({"id": "nope"})).unwrap_err();
    assert!(err.contains("invalid download id"));
}

// ─── Settings, zoom, shortcuts ───

#[test]
fn test_settings_get_set() {
    let (mut app, _view, _tmp) = setup();
    handle_method(&mut app, "settings.set", &json!({"key": "theme", "value": "Dark"})).unwrap();
    let prefs = handle_method(&mut app, "settings.get", &json!({})).unwrap();
    assert_eq!(prefs["theme"], "Dark");

    let err = handle_method(&mut app, "settings.set", &json!({"key": "zoom_percent", "value": 5}))
        .unwrap_err();
    assert!(err.starts_with("Invalid settings value"));
}

#[test]
fn test_settings_reset_restores_defaults() {
    let (mut app, view, _tmp) = setup();
    handle_method(&mut app, "settings.set", &json!({"key": "zoom_percent", "value": 150})).unwrap();
    let before = view.log().preferences_broadcasts;

    let prefs = handle_method(&mut app, "settings.reset", &json!({})).unwrap();
    assert_eq!(prefs["zoom_percent"], 100);
    assert_eq!(prefs["theme"], "Light");
    assert_eq!(view.log().preferences_broadcasts, before + 1);
}

#[test]
fn test_engine_new_window_loads_into_opened_tab() {
    let (mut app, view, _tmp) = setup();
    let res = handle_method(&mut app, "engine.new_window", &json!({"url": "https://popup.test"})).unwrap();
    assert_eq!(res, json!({"opened": [2]}));

    let tabs = handle_method(&mut app, "tab.list", &json!({})).unwrap();
    assert_eq!(tabs.as_array().unwrap().len(), 2);
    assert_eq!(tabs[1]["current_url"], "https://popup.test");
    assert_eq!(tabs[1]["focused"], true);
    assert_eq!(view.log().url_bar, "https://popup.test");
}

#[test]
fn test_zoom_methods() {
    let (mut app, _view, _tmp) = setup();
    assert_eq!(handle_method(&mut app, "zoom.in", &json!({})).unwrap(), json!({"zoom": 110}));
    assert_eq!(handle_method(&mut app, "zoom.out", &json!({})).unwrap(), json!({"zoom": 100}));
    assert_eq!(handle_method(&mut app, "zoom.reset", &json!({})).unwrap(), json!({"zoom": 100}));
}

#[test]
fn test_key_and_action_dispatch() {
    let (mut app, _view, _tmp) = setup();
    let res = handle_method(&mut app, "key", &json!({"keys": "F11"})).unwrap();
    assert_eq!(res, json!({"action": "toggle_fullscreen", "quit": false}));
    assert!(app.session.is_fullscreen());

    let res = handle_method(&mut app, "action", &json!({"name": "quit"})).unwrap();
    assert_eq!(res["quit"], true);

    assert!(handle_method(&mut app, "action", &json!({"name": "fly"})).is_err());
}

#[test]
fn test_shortcut_rebinding() {
    let (mut app, _view, _tmp) = setup();
    handle_method(&mut app, "shortcut.set", &json!({"action": "home", "keys": "Alt+Home"})).unwrap();
    let res = handle_method(&mut app, "key", &json!({"keys": "Alt+Home"})).unwrap();
    assert_eq!(res["action"], "home");

    let err = handle_method(&mut app, "shortcut.set", &json!({"action": "home", "keys": "F5"}))
        .unwrap_err();
    assert!(err.contains("Shortcut conflict"));
}
