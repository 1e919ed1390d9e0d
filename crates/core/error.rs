//! Error types for geocluster.

use thiserror::Error;

/// Errors raised by geodesic math, configuration and index lifecycle.
///
/// Lookups never produce an error for a missing identity; they return `None`.
#[derive(Error, Debug)]
pub enum GeoClusterError {
    /// The ellipsoidal solver exhausted its bearing-nudge retries.
    #[error("geodesic solver failed to converge after {attempts} attempts")]
    Convergence { attempts: usize },

    /// The requested operation is disabled by policy.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("index has already been initialized")]
    AlreadyInitialized,

    #[error("index has not been initialized")]
    NotInitialized,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for geocluster operations.
pub type Result<T> = std::result::Result<T, GeoClusterError>;
