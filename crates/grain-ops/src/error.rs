//! Error types for grain operations.

use thiserror::Error;

/// Error type for grain operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Input format is not accepted by the operation.
    #[error("format error: {0}")]
    Format(String),

    /// Blend mode name is not recognized.
    #[error("invalid blend mode '{0}'")]
    InvalidMode(String),

    /// Degenerate geometry (zero extents, zero-length sequences, bad crops).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operands have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The grain generator failed or returned an unusable plane.
    #[error("grain generator: {0}")]
    Generator(String),

    /// Error from the frame model.
    #[error(transparent)]
    Core(#[from] grain_core::Error),
}

/// Result type for grain operations.
pub type OpsResult<T> = Result<T, OpsError>;
