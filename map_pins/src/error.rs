//! Error types for the clustering core.

use thiserror::Error;

/// Malformed input handed to the core by its caller.
///
/// Soft conditions (a single-point cluster with no matching location) are never
/// reported through this type; they are recorded in the reconciliation result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionViolation {
    /// A coordinate component was NaN or infinite.
    #[error("Non-finite coordinate: ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// A cluster summary claimed to fold zero points.
    #[error("Cluster summary count must be positive")]
    ZeroCount,

    /// Two points in the same call share an identity.
    #[error("Duplicate point identity: {0}")]
    DuplicateIdentity(String),

    /// Requested zoom level is outside the configured range.
    #[error("Zoom must be between {min} and {max}, got {zoom}")]
    InvalidZoom { zoom: i64, min: u8, max: u8 },

    /// Clustering configuration is inconsistent.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, PreconditionViolation>;
