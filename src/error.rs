//! Error types for `bimgltf`

use thiserror::Error;

/// The error type for `bimgltf` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Input Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The resolved scene contains no shape nodes.
    #[error("scene is empty: no shape nodes resolved")]
    EmptyScene,

    // ==================== Configuration Errors ====================
    /// The scale factor must be strictly positive.
    #[error("invalid scale factor: {scale} (must be > 0)")]
    InvalidScale {
        /// The rejected scale value.
        scale: f32,
    },

    /// The log verbosity is outside the supported range.
    #[error("invalid log level: {level} (must be 0, 1, or 2)")]
    InvalidLogLevel {
        /// The rejected verbosity value.
        level: u8,
    },

    /// The requested output format is not recognized.
    #[error("unknown output format: {format} (expected gltf or glb)")]
    UnknownFormat {
        /// The rejected format string.
        format: String,
    },

    // ==================== Output Errors ====================
    /// The output path has no usable file name.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),

    /// Failed to serialize the glTF document.
    #[error("glTF JSON serialization failed: {message}")]
    SerializationFailed {
        /// The serialization error message.
        message: String,
    },
}

/// A specialized Result type for `bimgltf` operations.
pub type Result<T> = std::result::Result<T, Error>;
