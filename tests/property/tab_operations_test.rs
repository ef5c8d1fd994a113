//! Property-based tests for tab lifecycle through the SessionManager.
//!
//! These tests verify that for any sequence of tab creations, closures and
//! title changes the registry never becomes empty, focus always points at a
//! live tab, and tab-strip titles stay within 20 characters plus an ellipsis.

use proptest::prelude::*;
use tempfile::TempDir;
use wayfarer::managers::bookmark_manager::BookmarkManager;
use wayfarer::managers::history_manager::HistoryManager;
use wayfarer::managers::session_manager::SessionManager;
use wayfarer::managers::tab_manager::TabManagerTrait;
use wayfarer::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use wayfarer::shell::RecordingView;
use wayfarer::storage::JsonFile;
use wayfarer::surface::headless::HeadlessEngine;
use wayfarer::surface::SurfaceEvent;
use wayfarer::types::tab::{display_title, TAB_TITLE_MAX_CHARS};

/// Operations that can be performed on the session's tabs.
#[derive(Debug, Clone)]
enum TabOp {
    Create,
    Close(usize),
    Focus(usize),
    Title(usize, String),
}

fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(TabOp::Create),
            3 => (0..8usize).prop_map(TabOp::Close),
            1 => (0..8usize).prop_map(TabOp::Focus),
            2 => ((0..8usize), "\\PC{0,40}").prop_map(|(i, t)| TabOp::Title(i, t)),
        ],
        1..40,
    )
}

fn session(dir: &TempDir, view: RecordingView) -> SessionManager {
    let mut settings = SettingsEngine::new(JsonFile::new(dir.path().join("settings.json")));
    settings.load();
    SessionManager::new(
        settings,
        BookmarkManager::new(JsonFile::new(dir.path().join("bookmarks.json"))),
        HistoryManager::new(JsonFile::new(dir.path().join("history.json"))),
        Box::new(HeadlessEngine::new()),
        Box::new(view),
    )
}

// **Property: tab registry stays non-empty with valid focus**
//
// *For any* sequence of creates, closes, focus changes and title events, after
// every step `tab_count() >= 1`, focus is in range, and every display title is
// at most 20 characters plus "…"; the window title carries the full title.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn registry_never_empty_and_titles_bounded(ops in arb_tab_ops()) {
        let dir = TempDir::new().unwrap();
        let view = RecordingView::new();
        let mut session = session(&dir, view.clone());
        session.start();

        for op in ops {
            let count = session.tabs().tab_count();
            match op {
                TabOp::Create => {
                    session.new_tab(None);
                }
                TabOp::Close(i) => {
                    let result = session.close_tab(i);
                    prop_assert_eq!(result.is_ok(), i < count);
                }
                TabOp::Focus(i) => {
                    let _ = session.focus_tab(i);
                }
                TabOp::Title(i, title) => {
                    if let Some(id) = session.tabs().get(i % count).map(|t| t.id) {
                        session.handle_event(id, SurfaceEvent::TitleChanged(title.clone()));
                        prop_assert_eq!(
                            view.log().window_title,
                            format!("{} - Wayfarer", title)
                        );
                    }
                }
            }

            let tabs = session.tabs();
            prop_assert!(tabs.tab_count() >= 1);
            let focus = tabs.focus_index();
            prop_assert!(focus.is_some_and(|f| f < tabs.tab_count()));
            for tab in tabs.infos() {
                prop_assert!(tab.display_title.chars().count() <= TAB_TITLE_MAX_CHARS + 1);
            }
        }
    }

    #[test]
    fn display_title_is_prefix_plus_ellipsis(title in "\\PC{0,60}") {
        let shown = display_title(&title);
        let len = title.chars().count();
        if len > TAB_TITLE_MAX_CHARS {
            prop_assert!(shown.ends_with('…'));
            let prefix: String = title.chars().take(TAB_TITLE_MAX_CHARS).collect();
            prop_assert_eq!(shown, format!("{}…", prefix));
        } else {
            prop_assert_eq!(shown, title);
        }
    }
}
