//! Property-based tests for Preferences serialization and commit.
//!
//! These tests verify that any valid Preferences committed through the
//! SettingsEngine read back unchanged from disk, and that every tab picks
//! up the committed JavaScript, image and zoom settings.

use proptest::prelude::*;
use tempfile::TempDir;
use wayfarer::managers::bookmark_manager::BookmarkManager;
use wayfarer::managers::history_manager::HistoryManager;
use wayfarer::managers::session_manager::SessionManager;
use wayfarer::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use wayfarer::shell::RecordingView;
use wayfarer::storage::JsonFile;
use wayfarer::surface::headless::HeadlessEngine;
use wayfarer::types::settings::{Preferences, Theme, ZOOM_MAX, ZOOM_MIN};

fn arb_theme() -> impl Strategy<Value = Theme> {
    prop_oneof![Just(Theme::Light), Just(Theme::Dark)]
}

fn arb_preferences() -> impl Strategy<Value = Preferences> {
    (
        "[a-z]{1,12}",
        prop_oneof![Just(".com"), Just(".org"), Just(".test")],
        ZOOM_MIN..=ZOOM_MAX,
        any::<bool>(),
        any::<bool>(),
        arb_theme(),
    )
        .prop_map(|(host, tld, zoom_percent, javascript_enabled, images_enabled, theme)| {
            Preferences {
                homepage: format!("https://{}{}", host, tld),
                zoom_percent,
                javascript_enabled,
                images_enabled,
                theme,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn committed_preferences_read_back_unchanged(prefs in arb_preferences()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut engine = SettingsEngine::new(JsonFile::new(&path));
        engine.commit(prefs.clone()).unwrap();

        let mut reloaded = SettingsEngine::new(JsonFile::new(&path));
        prop_assert_eq!(reloaded.load(), prefs);
    }

    #[test]
    fn commit_reaches_every_tab(prefs in arb_preferences(), extra_tabs in 0..4usize) {
        let dir = TempDir::new().unwrap();
        let mut settings = SettingsEngine::new(JsonFile::new(dir.path().join("settings.json")));
        settings.load();
        let engine = HeadlessEngine::new();
        let mut session = SessionManager::new(
            settings,
            BookmarkManager::new(JsonFile::new(dir.path().join("bookmarks.json"))),
            HistoryManager::new(JsonFile::new(dir.path().join("history.json"))),
            Box::new(engine.clone()),
            Box::new(RecordingView::new()),
        );
        let mut ids = vec![session.start().unwrap()];
        for _ in 0..extra_tabs {
            ids.push(session.new_tab(None));
        }

        session.commit_preferences(prefs.clone()).unwrap();

        for id in ids {
            let rec = engine.record(id).unwrap();
            prop_assert_eq!(rec.javascript, prefs.javascript_enabled);
            prop_assert_eq!(rec.images, prefs.images_enabled);
            prop_assert_eq!(rec.zoom, prefs.zoom_factor());
        }
    }
}
