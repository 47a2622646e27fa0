// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture session

use crate::backends::camera::BackendError;
use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Photo(#[from] PhotoError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Acquisition failed; holds the message the user is shown
    #[error("{0}")]
    AccessDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the capture session
///
/// `CameraUnavailable` always displays the same fixed message; the backend
/// cause is kept only for logging.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera access denied or unavailable.")]
    CameraUnavailable(#[source] BackendError),

    /// The operation needs a granted camera
    #[error("Camera is not active")]
    NotGranted,

    #[error(transparent)]
    Photo(#[from] PhotoError),
}

/// Still capture and encoding errors
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("No frame available for capture")]
    NoFrameAvailable,

    #[error("Frame buffer is {actual} bytes, expected at least {expected}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("Encoding failed: {0}")]
    EncodingFailed(#[from] image::ImageError),

    #[error("Save failed: {0}")]
    SaveFailed(#[from] std::io::Error),
}

/// Still submission errors
///
/// These never reach the user; submission is best effort and failures are
/// only logged.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload endpoint answered {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to serialize upload body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid upload endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid upload URL {0:?}")]
    InvalidUploadUrl(String),
}
