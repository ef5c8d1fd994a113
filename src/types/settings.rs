use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::SettingsError;

pub const ZOOM_MIN: u16 = 50;
pub const ZOOM_MAX: u16 = 300;
pub const ZOOM_STEP: u16 = 10;
pub const ZOOM_DEFAULT: u16 = 100;

pub const DEFAULT_HOMEPAGE: &str = "https://duckduckgo.com";

/// Colour scheme of the shell. Styling itself is a view concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// User preferences applied to every render surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub homepage: String,
    pub zoom_percent: u16,
    pub javascript_enabled: bool,
    pub images_enabled: bool,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            zoom_percent: ZOOM_DEFAULT,
            javascript_enabled: true,
            images_enabled: true,
            theme: Theme::Light,
        }
    }
}

impl Preferences {
    /// Zoom factor handed to render surfaces (1.0 == 100%).
    pub fn zoom_factor(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    pub fn set_zoom_percent(&mut self, percent: i64) -> Result<(), SettingsError> {
        if percent < i64::from(ZOOM_MIN) || percent > i64::from(ZOOM_MAX) {
            return Err(SettingsError::InvalidValue(format!(
                "zoom must be within {}..={}%, got {}",
                ZOOM_MIN, ZOOM_MAX, percent
            )));
        }
        self.zoom_percent = percent as u16;
        Ok(())
    }

    /// Moves zoom by `steps` increments of 10, clamped to the valid range.
    pub fn step_zoom(&mut self, steps: i32) -> u16 {
        let target = i32::from(self.zoom_percent) + steps * i32::from(ZOOM_STEP);
        self.zoom_percent = target.clamp(i32::from(ZOOM_MIN), i32::from(ZOOM_MAX)) as u16;
        self.zoom_percent
    }

    pub fn set_homepage(&mut self, homepage: &str) -> Result<(), SettingsError> {
        self.homepage = normalize_homepage(homepage)?;
        Ok(())
    }

    /// Checks every field; used after bulk edits and after loading from disk.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.zoom_percent < ZOOM_MIN || self.zoom_percent > ZOOM_MAX {
            return Err(SettingsError::InvalidValue(format!(
                "zoom must be within {}..={}%, got {}",
                ZOOM_MIN, ZOOM_MAX, self.zoom_percent
            )));
        }
        Url::parse(&self.homepage)
            .map_err(|e| SettingsError::InvalidValue(format!("homepage: {}", e)))?;
        Ok(())
    }
}

/// Turns user input into a syntactically valid URL string. No network check.
///
/// Input without a scheme gets `https://`.
pub fn normalize_homepage(input: &str) -> Result<String, SettingsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::InvalidValue("homepage cannot be empty".to_string()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(SettingsError::InvalidValue(format!(
            "homepage cannot contain whitespace: {}",
            trimmed
        )));
    }
    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Url::parse(&candidate)
        .map(|_| candidate)
        .map_err(|e| SettingsError::InvalidValue(format!("homepage '{}': {}", trimmed, e)))
}

fn has_scheme(s: &str) -> bool {
    s.contains("://") || s.starts_with("about:") || s.starts_with("data:")
}
