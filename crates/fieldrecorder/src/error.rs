//! Error types for fieldrecorder.
//!
//! This module defines all error types used throughout the fieldrecorder crate.
//! A coordinate that simply falls outside the National Grid is not an error:
//! conversions report that case as `Ok(None)`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fieldrecorder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Coordinate Errors ===
    /// Latitude or longitude is not a finite value within its degree range.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude} (expected -90..=90, -180..=180)")]
    InvalidCoordinate {
        /// The rejected latitude in degrees.
        latitude: f64,
        /// The rejected longitude in degrees.
        longitude: f64,
    },

    /// A grid reference string could not be parsed.
    #[error("invalid grid reference '{input}': {reason}")]
    InvalidGridReference {
        /// The text that failed to parse.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The two letters do not name a 100 km square on the National Grid.
    #[error("unknown 100km grid square '{0}'")]
    UnknownGridSquare(String),

    /// An iterative calculation failed to settle.
    #[error("calculation did not converge: {operation}")]
    Convergence {
        /// Description of the calculation.
        operation: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a track file.
    #[error("failed to read track file {path}: {source}")]
    TrackRead {
        /// Path of the track file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fieldrecorder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid coordinate error.
    #[must_use]
    pub fn invalid_coordinate(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinate {
            latitude,
            longitude,
        }
    }

    /// Create an invalid grid reference error.
    #[must_use]
    pub fn invalid_grid_reference(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGridReference {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by caller-supplied degrees out of range.
    #[must_use]
    pub fn is_invalid_coordinate(&self) -> bool {
        matches!(self, Self::InvalidCoordinate { .. })
    }

    /// Check if this error was caused by a malformed grid reference.
    #[must_use]
    pub fn is_grid_reference_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGridReference { .. } | Self::UnknownGridSquare(_)
        )
    }
}
