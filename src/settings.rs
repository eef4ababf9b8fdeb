//! Editor preferences
//!
//! Persisted separately from designs in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::grid::{Color, GridSize};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::store::KeyValueStore;

/// Editor settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid dimension used at startup
    pub grid_size: GridSize,
    /// Last selected paint color
    pub color: Color,
    /// Maximum undo steps kept
    pub history_limit: usize,
    /// Keep the in-progress drawing across reloads
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Small,
            color: Color::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "pixel-nostalgia-settings";

    /// Load settings, falling back to defaults if missing or unreadable
    pub fn load_from(store: &impl KeyValueStore) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save_to(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
