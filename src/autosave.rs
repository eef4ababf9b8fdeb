//! Autosave of the in-progress drawing
//!
//! The current buffer is written as a flat JSON array under its own key after
//! every change and restored on startup. Clearing the grid removes the key.
//! This key never holds the named design record.

use crate::error::StoreError;
use crate::grid::{GridSize, PixelBuffer};
use crate::store::KeyValueStore;

/// Storage key of the in-progress drawing
pub const AUTOSAVE_KEY: &str = "pixel-art";

#[derive(Debug)]
pub struct Autosave<S> {
    store: S,
}

impl<S: KeyValueStore> Autosave<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Last autosaved drawing, if it exists, parses and matches `size`
    pub fn restore(&self, size: GridSize) -> Option<PixelBuffer> {
        let json = match self.store.get(AUTOSAVE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Autosave unreadable: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<PixelBuffer>(&json) {
            Ok(pixels) if pixels.size() == size => {
                log::info!("Restored autosaved {} drawing", size.as_str());
                Some(pixels)
            }
            Ok(pixels) => {
                log::info!(
                    "Ignoring autosaved {} drawing for {} grid",
                    pixels.size().as_str(),
                    size.as_str()
                );
                None
            }
            Err(e) => {
                log::warn!("Discarding corrupt autosave: {}", e);
                None
            }
        }
    }

    /// Persist the drawing after a change; a blank grid removes the key
    pub fn sync(&mut self, pixels: &PixelBuffer) -> Result<(), StoreError> {
        if pixels.is_blank() {
            self.forget()
        } else {
            self.store(pixels)
        }
    }

    fn store(&mut self, pixels: &PixelBuffer) -> Result<(), StoreError> {
        let json = serde_json::to_string(pixels)?;
        self.store.set(AUTOSAVE_KEY, &json)?;
        Ok(())
    }

    fn forget(&mut self) -> Result<(), StoreError> {
        self.store.remove(AUTOSAVE_KEY)
    }
}
