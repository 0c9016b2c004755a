//! Game settings
//!
//! Read from a JSON document (every field optional). Settings are not
//! written back; the host owns where they live.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::StoreError;
use crate::platform::KeyBindings;
use crate::tuning::Tuning;

/// Editor view and hit-testing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Multiplier applied per zoom-in step
    pub zoom_step: f32,
    /// Erase hit margin in screen pixels
    pub erase_tolerance: f32,
}

impl EditorSettings {
    /// NaN fails every check
    pub fn validate(&self) -> Result<(), StoreError> {
        let checks = [
            (self.min_zoom > 0.0, "editor.min_zoom must be positive"),
            (
                self.max_zoom >= self.min_zoom,
                "editor.max_zoom must not be below min_zoom",
            ),
            (self.zoom_step > 1.0, "editor.zoom_step must be greater than 1"),
            (
                self.erase_tolerance >= 0.0,
                "editor.erase_tolerance must not be negative",
            ),
        ];
        match checks.into_iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(StoreError::InvalidSettings(reason)),
            None => Ok(()),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            erase_tolerance: ERASE_TOLERANCE,
        }
    }
}

/// Everything configurable without recompiling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controls: KeyBindings,
    pub tuning: Tuning,
    pub editor: EditorSettings,
}

impl Settings {
    /// Parse and validate a settings document
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        self.tuning.validate()?;
        self.editor.validate()
    }

    /// Load settings from a JSON file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
