//! Error types for rigscope.

use thiserror::Error;

/// The main error type for rigscope operations.
#[derive(Error, Debug)]
pub enum RigError {
    /// The dataset could not be fetched from its source.
    #[error("failed to fetch dataset '{location}': {cause}")]
    DatasetFetch {
        location: String,
        #[source]
        cause: std::io::Error,
    },

    /// The dataset was fetched but is not valid JSON (or lacks a camera list).
    #[error("failed to parse dataset '{location}': {cause}")]
    DatasetParse {
        location: String,
        #[source]
        cause: serde_json::Error,
    },

    /// A single camera entry is malformed.
    #[error("camera '{cam_id}' is invalid: {reason}")]
    CameraRecord { cam_id: String, reason: String },

    /// Two camera entries share the same id.
    #[error("camera '{0}' already exists")]
    DuplicateCamera(String),

    /// A camera with the given id was not found.
    #[error("camera '{0}' not found")]
    CameraNotFound(String),

    /// An asset (model or image) failed to load for a camera.
    #[error("{slot} asset for camera '{cam_id}' failed: {reason}")]
    Asset {
        cam_id: String,
        slot: String,
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RigError {
    /// Shorthand for a [`RigError::CameraRecord`].
    pub fn record(cam_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CameraRecord {
            cam_id: cam_id.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for rigscope operations.
pub type Result<T> = std::result::Result<T, RigError>;
