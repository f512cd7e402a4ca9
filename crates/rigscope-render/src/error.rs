//! Asset loading error types.

use thiserror::Error;

/// Errors that can occur while a renderer loads a model or image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The asset file does not exist or cannot be read.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The asset was read but could not be decoded.
    #[error("failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// The renderer dropped the request without completing it.
    #[error("asset request abandoned")]
    Abandoned,
}

/// A specialized Result type for asset operations.
pub type AssetResult<T> = std::result::Result<T, AssetError>;
