use crate::surface::RenderSurface;
use crate::types::errors::TabError;
use crate::types::settings::Preferences;
use crate::types::tab::{TabId, TabInfo};

/// One tab: an exclusively owned render surface plus what the shell shows for it.
pub struct Tab {
    pub id: TabId,
    pub surface: Box<dyn RenderSurface>,
    pub display_title: String,
    pub current_url: String,
    pub load_progress: u8,
}

impl Tab {
    pub fn new(id: TabId, surface: Box<dyn RenderSurface>) -> Self {
        Self {
            id,
            surface,
            display_title: "New Tab".to_string(),
            current_url: String::new(),
            load_progress: 0,
        }
    }

    /// Pushes JavaScript, image loading and zoom settings to the surface.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.surface.set_javascript(prefs.javascript_enabled);
        self.surface.set_auto_load_images(prefs.images_enabled);
        self.surface.set_zoom(prefs.zoom_factor());
    }
}

/// Trait defining the tab registry interface.
pub trait TabManagerTrait {
    fn allocate_id(&mut self) -> TabId;
    fn push(&mut self, tab: Tab) -> usize;
    fn remove(&mut self, index: usize) -> Result<Tab, TabError>;
    fn set_focus(&mut self, index: usize) -> Result<(), TabError>;
    fn focus_index(&self) -> Option<usize>;
    fn focused(&self) -> Option<&Tab>;
    fn focused_mut(&mut self) -> Option<&mut Tab>;
    fn index_of(&self, id: TabId) -> Option<usize>;
    fn get(&self, index: usize) -> Option<&Tab>;
    fn get_mut(&mut self, index: usize) -> Option<&mut Tab>;
    fn tab_count(&self) -> usize;
    fn apply_preferences(&mut self, prefs: &Preferences);
    fn infos(&self) -> Vec<TabInfo>;
}

/// Ordered tabs plus the focus index.
///
/// `focus` is `None` only transiently, while the last tab is being replaced.
#[derive(Default)]
pub struct TabManager {
    tabs: Vec<Tab>,
    focus: Option<usize>,
    next_id: u64,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn is_focused(&self, id: TabId) -> bool {
        self.focused().is_some_and(|t| t.id == id)
    }
}

impl TabManagerTrait for TabManager {
    /// Hands out the next tab id. Ids are never reused within a session.
    fn allocate_id(&mut self) -> TabId {
        self.next_id += 1;
        TabId(self.next_id)
    }

    /// Appends a tab and returns its index. Focus is left to the caller.
    fn push(&mut self, tab: Tab) -> usize {
        self.tabs.push(tab);
        self.tabs.len() - 1
    }

    /// Removes the tab at `index`, keeping focus on the same tab where possible.
    ///
    /// If the focused tab is removed, focus moves to the tab that slid into
    /// its place, or to the new last tab.
    fn remove(&mut self, index: usize) -> Result<Tab, TabError> {
        if index >= self.tabs.len() {
            return Err(TabError::InvalidIndex(index));
        }
        let tab = self.tabs.remove(index);

        self.focus = match self.focus {
            _ if self.tabs.is_empty() => None,
            Some(f) if f > index => Some(f - 1),
            Some(f) if f == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        Ok(tab)
    }

    fn set_focus(&mut self, index: usize) -> Result<(), TabError> {
        if index >= self.tabs.len() {
            return Err(TabError::InvalidIndex(index));
        }
        self.focus = Some(index);
        Ok(())
    }

    fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    fn focused(&self) -> Option<&Tab> {
        self.focus.and_then(|i| self.tabs.get(i))
    }

    fn focused_mut(&mut self) -> Option<&mut Tab> {
        match self.focus {
            Some(i) => self.tabs.get_mut(i),
            None => None,
        }
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index)
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn apply_preferences(&mut self, prefs: &Preferences) {
        for tab in &mut self.tabs {
            tab.apply_preferences(prefs);
        }
    }

    fn infos(&self) -> Vec<TabInfo> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(i, t)| TabInfo {
                id: t.id,
                display_title: t.display_title.clone(),
                current_url: t.current_url.clone(),
                load_progress: t.load_progress,
                focused: self.focus == Some(i),
            })
            .collect()
    }
}
