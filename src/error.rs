//! Error types for the editor core

use thiserror::Error;

/// Errors raised while persisting a value to a key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Storage is not available (no window, private mode, quota disabled)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a read or write
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The value could not be encoded as JSON
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while building grid data from untrusted input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("unsupported grid size: {0}")]
    UnsupportedSize(usize),

    #[error("pixel buffer has {0} cells, expected 64, 256 or 1024")]
    BadLength(usize),

    #[error("color is empty")]
    EmptyColor,

    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Errors raised by the named design library
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("design name is empty")]
    EmptyName,

    #[error("design not found: {0}")]
    NotFound(String),

    #[error("stored designs are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while exporting the grid as an image
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("download failed: {0}")]
    Download(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_failure_is_an_encode_error() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(matches!(err, StoreError::Encode(_)));
        assert!(err.to_string().starts_with("encoding failed"));
    }
}
