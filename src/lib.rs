//! Pixel Nostalgia - an 8-bit pixel-art editor
//!
//! Core modules:
//! - `grid`: Grid sizes, colors and the pixel buffer
//! - `editor`: Paint/clear/mirror with undo/redo history
//! - `designs`: Named designs persisted as one JSON record
//! - `store`: Key-value storage (LocalStorage on web)
//! - `export`: PNG rasterization and download
//! - `settings`: Persisted preferences

pub mod autosave;
pub mod designs;
pub mod editor;
pub mod error;
pub mod export;
pub mod focus;
pub mod grid;
pub mod history;
pub mod settings;
pub mod store;

pub use designs::{DesignLibrary, Outcome, Prompter};
pub use editor::Editor;
pub use grid::{Color, GridSize, PixelBuffer};
pub use settings::Settings;
pub use store::{KeyValueStore, MemoryStore};
