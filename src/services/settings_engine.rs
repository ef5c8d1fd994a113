// Wayfarer Settings Engine
// Owns the user preferences: loading, validating, committing, and notifying listeners.
// Preferences are stored as a JSON file in the data directory.

use serde_json::Value;

use crate::storage::JsonFile;
use crate::types::errors::SettingsError;
use crate::types::settings::{Preferences, ZOOM_DEFAULT};

/// Callback run after every committed change.
pub type PreferencesListener = Box<dyn FnMut(&Preferences)>;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Preferences;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &Preferences;
    fn commit(&mut self, prefs: Preferences) -> Result<(), SettingsError>;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn step_zoom(&mut self, steps: i32) -> u16;
    fn reset_zoom(&mut self) -> u16;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn subscribe(&mut self, listener: PreferencesListener);
    fn get_config_path(&self) -> String;
}

/// Settings engine implementation that persists preferences as JSON on disk.
pub struct SettingsEngine {
    file: JsonFile,
    settings: Preferences,
    listeners: Vec<PreferencesListener>,
}

impl SettingsEngine {
    /// Creates an engine holding default preferences. Call `load()` to read the file.
    pub fn new(file: JsonFile) -> Self {
        Self {
            file,
            settings: Preferences::default(),
            listeners: Vec::new(),
        }
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.settings);
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads preferences from the JSON config file.
    ///
    /// A missing file yields defaults. A malformed file, or one whose values
    /// fail validation, also yields defaults and logs a warning.
    fn load(&mut self) -> Preferences {
        let loaded: Preferences = self.file.load_or_default();
        self.settings = match loaded.validate() {
            Ok(()) => loaded,
            Err(e) => {
                log::warn!("Discarding invalid settings in {}: {}", self.file.path().display(), e);
                Preferences::default()
            }
        };
        self.settings.clone()
    }

    fn save(&self) -> Result<(), SettingsError> {
        self.file.save(&self.settings)?;
        Ok(())
    }

    fn get_settings(&self) -> &Preferences {
        &self.settings
    }

    /// Validates and installs a full set of preferences, then notifies
    /// listeners and persists. A failed write is logged; the new values
    /// stay in effect.
    fn commit(&mut self, mut prefs: Preferences) -> Result<(), SettingsError> {
        let homepage = prefs.homepage.clone();
        prefs.set_homepage(&homepage)?;
        prefs.validate()?;

        self.settings = prefs;
        self.notify();
        if let Err(e) = self.save() {
            log::warn!("Error saving settings: {}", e);
        }
        Ok(())
    }

    /// Updates a single preference by name and commits the result.
    ///
    /// Converts the current preferences to a `serde_json::Value`, replaces
    /// the named field, and deserializes back so the value's type is checked.
    ///
    /// # Examples
    /// - `"homepage"` with `"example.com"`
    /// - `"zoom_percent"` with `150`
    /// - `"theme"` with `"Dark"`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        if key == "zoom_percent" {
            let percent = value.as_i64().ok_or_else(|| {
                SettingsError::InvalidValue(format!("zoom must be an integer, got {}", value))
            })?;
            let mut updated = self.settings.clone();
            updated.set_zoom_percent(percent)?;
            return self.commit(updated);
        }

        let mut json_value = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::InvalidValue(format!("Failed to serialize settings: {}", e)))?;

        match &mut json_value {
            Value::Object(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        }

        let updated: Preferences = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.commit(updated)
    }

    /// Moves zoom by `steps` tens of percent within bounds. In memory only;
    /// listeners are not notified.
    fn step_zoom(&mut self, steps: i32) -> u16 {
        self.settings.step_zoom(steps)
    }

    fn reset_zoom(&mut self) -> u16 {
        self.settings.zoom_percent = ZOOM_DEFAULT;
        ZOOM_DEFAULT
    }

    /// Restores factory defaults and commits them.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.commit(Preferences::default())
    }

    fn subscribe(&mut self, listener: PreferencesListener) {
        self.listeners.push(listener);
    }

    fn get_config_path(&self) -> String {
        self.file.path().to_string_lossy().to_string()
    }
}
