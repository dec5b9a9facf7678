//! Error types shared by every stage of the chord-movie pipeline.

use thiserror::Error;

/// Errors raised while reading a chord sheet, scheduling it, or writing frames.
///
/// Every variant is fatal for the batch: the pipeline never retries.
#[derive(Debug, Error)]
pub enum ChordError {
    /// The chord sheet or run configuration is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A tempo or frame-rate value makes the duration meaningless.
    #[error("arithmetic error at chord {index}: {message}")]
    Arithmetic { index: usize, message: String },

    /// A value is well-formed but outside its musical range.
    #[error("validation error at chord {index}: {message}")]
    Validation { index: usize, message: String },

    /// The input JSON could not be decoded.
    #[error("failed to parse chord sheet JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The video encoder is missing or exited unsuccessfully.
    #[error("video encoding failed: {0}")]
    Encode(String),
}

/// Result type alias for chord-movie operations.
pub type Result<T> = std::result::Result<T, ChordError>;
