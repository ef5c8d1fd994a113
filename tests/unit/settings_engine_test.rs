//! Unit tests for the SettingsEngine: load fallbacks, typed and keyed
//! updates, persistence and change notification.

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use wayfarer::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use wayfarer::storage::JsonFile;
use wayfarer::types::errors::SettingsError;
use wayfarer::types::settings::{Preferences, Theme, DEFAULT_HOMEPAGE};

fn setup() -> (SettingsEngine, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut engine = SettingsEngine::new(JsonFile::new(dir.path().join("settings.json")));
    engine.load();
    (engine, dir)
}

#[test]
fn test_defaults() {
    let (engine, _dir) = setup();
    let prefs = engine.get_settings();
    assert_eq!(prefs.homepage, DEFAULT_HOMEPAGE);
    assert_eq!(prefs.zoom_percent, 100);
    assert!(prefs.javascript_enabled);
    assert!(prefs.images_enabled);
    assert_eq!(prefs.theme, Theme::Light);
}

#[test]
fn test_malformed_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "[1, 2").unwrap();
    let mut engine = SettingsEngine::new(JsonFile::new(dir.path().join("settings.json")));
    assert_eq!(engine.load(), Preferences::default());
}

#[rstest]
#[case("zoom_percent", json!(150))]
#[case("javascript_enabled", json!(false))]
#[case("images_enabled", json!(false))]
#[case("theme", json!("Dark"))]
#[case("homepage", json!("https://example.org"))]
fn test_set_value_round_trips_through_disk(#[case] key: &str, #[case] value: serde_json::Value) {
    let (mut engine, dir) = setup();
    engine.set_value(key, value.clone()).unwrap();

    let mut reloaded = SettingsEngine::new(JsonFile::new(dir.path().join("settings.json")));
    let stored = serde_json::to_value(reloaded.load()).unwrap();
    assert_eq!(stored[key], value);
}

#[rstest]
#[case(49)]
#[case(301)]
#[case(0)]
#[case(-10)]
#[case(70000)]
fn test_zoom_out_of_range_is_rejected(#[case] zoom: i64) {
    let (mut engine, _dir) = setup();
    let err = engine.set_value("zoom_percent", json!(zoom)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(ref msg) if msg.contains("50..=300")));
    assert_eq!(engine.get_settings().zoom_percent, 100);
}

#[rstest]
#[case(0, 100)]
#[case(1, 110)]
#[case(-5, 50)]
#[case(-6, 50)]
#[case(20, 300)]
#[case(25, 300)]
fn test_step_zoom_clamps(#[case] steps: i32, #[case] expected: u16) {
    let (mut engine, _dir) = setup();
    assert_eq!(engine.step_zoom(steps), expected);
}

#[test]
fn test_homepage_is_normalised() {
    let (mut engine, _dir) = setup();
    engine.set_value("homepage", json!("  example.org ")).unwrap();
    assert_eq!(engine.get_settings().homepage, "https://example.org");
    assert!(engine.set_value("homepage", json!("two words")).is_err());
}

#[test]
fn test_listeners_run_on_commit_only() {
    let (mut engine, _dir) = setup();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    engine.subscribe(Box::new(move |_p: &Preferences| counter.set(counter.get() + 1)));

    engine.step_zoom(1);
    assert_eq!(calls.get(), 0);
    engine.commit(engine.get_settings().clone()).unwrap();
    assert_eq!(calls.get(), 1);
    engine.reset().unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(engine.get_settings(), &Preferences::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    let (mut engine, _dir) = setup();
    assert!(matches!(
        engine.set_value("search_engine", json!("x")),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(engine.set_value("", json!(1)), Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_config_path_points_into_data_dir() {
    let (engine, dir) = setup();
    assert!(engine.get_config_path().starts_with(&*dir.path().to_string_lossy()));
    assert!(engine.get_config_path().ends_with("settings.json"));
}
