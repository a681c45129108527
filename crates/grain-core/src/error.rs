//! Error types for grain-core operations.
//!
//! This module provides the error type shared by the plane, frame and clip
//! containers.
//!
//! # Overview
//!
//! The [`Error`] enum covers all failure modes that can occur while:
//! - Building planes and frames from raw sample buffers
//! - Validating sample formats and chroma subsampling
//! - Indexing and slicing frame sequences
//!
//! # Usage
//!
//! ```rust
//! use grain_core::{Error, Result};
//!
//! fn check_index(index: usize, len: usize) -> Result<()> {
//!     if index >= len {
//!         return Err(Error::FrameOutOfRange { index, len });
//!     }
//!     Ok(())
//! }
//! assert!(check_index(3, 2).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::plane::Plane`] - Buffer construction
//! - [`crate::frame::Frame`] - Plane layout checks
//! - [`crate::clip::Clip`] - Sequence operations
//! - `grain-ops` - Wrapped as `OpsError::Core`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or manipulating frame data.
///
/// # Categories
///
/// - **Dimension errors**: [`InvalidDimensions`](Error::InvalidDimensions), [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Format errors**: [`UnsupportedFormat`](Error::UnsupportedFormat), [`SampleMismatch`](Error::SampleMismatch), [`PlaneCount`](Error::PlaneCount)
/// - **Sequence errors**: [`FrameOutOfRange`](Error::FrameOutOfRange), [`EmptyClip`](Error::EmptyClip), [`ClipMismatch`](Error::ClipMismatch)
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid plane or frame dimensions.
    ///
    /// Returned when width or height is zero, when a buffer length does not
    /// match `width * height`, or when a frame size is not divisible by the
    /// chroma subsampling factor.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grain_core::Error;
    ///
    /// let err = Error::invalid_dimensions(0, 16, "width must be > 0");
    /// assert!(err.to_string().contains("0x16"));
    /// ```
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Two planes or frames that must agree in size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First width
        a_width: u32,
        /// First height
        a_height: u32,
        /// Second width
        b_width: u32,
        /// Second height
        b_height: u32,
    },

    /// The format descriptor is not representable.
    ///
    /// Integer formats must use 8 to 16 bits, float formats 32 bits, and
    /// gray formats cannot carry chroma subsampling.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// Format description
        format: String,
    },

    /// A plane's sample storage does not match the frame format.
    #[error("plane {plane} stores {got} samples, format expects {expected}")]
    SampleMismatch {
        /// Plane index
        plane: usize,
        /// Storage expected by the format
        expected: &'static str,
        /// Storage actually found
        got: &'static str,
    },

    /// Wrong number of planes for the format.
    #[error("plane count mismatch: expected {expected}, got {got}")]
    PlaneCount {
        /// Planes required by the format
        expected: usize,
        /// Planes supplied
        got: usize,
    },

    /// Frame index outside of the sequence.
    #[error("frame {index} out of range for clip of {len} frames")]
    FrameOutOfRange {
        /// Requested index
        index: usize,
        /// Clip length
        len: usize,
    },

    /// A clip must contain at least one frame.
    #[error("clip has no frames")]
    EmptyClip,

    /// Frames or clips joined together disagree in format or size.
    #[error("clip mismatch: {0}")]
    ClipMismatch(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FrameOutOfRange { index: 7, len: 5 };
        assert_eq!(err.to_string(), "frame 7 out of range for clip of 5 frames");

        let err = Error::dimension_mismatch((10, 20), (30, 40));
        assert!(err.to_string().contains("10x20"));
        assert!(err.to_string().contains("30x40"));
    }

    #[test]
    fn test_error_helpers() {
        let err = Error::unsupported_format("gray with subsampling");
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }
}
