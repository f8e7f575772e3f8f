//! Error types shared across stabkit crates.

use std::path::PathBuf;

/// Top-level error type for stabkit operations.
#[derive(Debug, thiserror::Error)]
pub enum StabkitError {
    /// The frame handed to the pipeline was missing or had no pixels.
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Motion estimation error: {message}")]
    Estimation { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StabkitError.
pub type StabkitResult<T> = Result<T, StabkitError>;

impl StabkitError {
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: msg.into(),
        }
    }

    pub fn estimation(msg: impl Into<String>) -> Self {
        Self::Estimation {
            message: msg.into(),
        }
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the caller can keep feeding frames after this error.
    ///
    /// Only an invalid frame stops the current iteration; the session
    /// itself is untouched, so the stream may continue.
    pub fn is_frame_scoped(&self) -> bool {
        matches!(self, Self::InvalidFrame { .. } | Self::Estimation { .. })
    }
}
