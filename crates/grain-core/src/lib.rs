//! # grain-core
//!
//! Core types for film-grain compositing.
//!
//! This crate provides the sample model every grain operation is written
//! against:
//!
//! - [`Format`] - Sample type, bit depth, color family and chroma subsampling
//! - [`SampleLevels`] - `neutral`, `peak` and `factor` for a format
//! - [`Plane`] - One channel of samples (`u8`, `u16` or `f32` storage)
//! - [`Frame`] - Gray or YUV frame assembled from validated planes
//! - [`Clip`] - Non-empty, `Arc`-shared frame sequence with loop/splice/slice
//!
//! ## Sample Ranges
//!
//! Samples are always handled in their native range: 8-bit mid-gray is
//! `128.0`, float mid-gray is `0.5`. [`SampleLevels`] carries the constants
//! that make the blend formulas correct for 8/10/16-bit integer and 32-bit
//! float frames without separate code paths:
//!
//! ```rust
//! use grain_core::{Format, SampleLevels};
//!
//! let levels = SampleLevels::from_format(&Format::YUV420P8);
//! assert_eq!((levels.neutral, levels.peak), (128.0, 255.0));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! grain-core (this crate)
//!    ^
//!    |
//!    +-- grain-ops (blend modes, compositor, overlay, synthesis)
//!    +-- grain-cli (raw planar I/O, presets)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`Format`] by name

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clip;
pub mod error;
pub mod format;
pub mod frame;
pub mod plane;

pub use clip::{Clip, ClipInfo};
pub use error::{Error, Result};
pub use format::{ColorFamily, Format, SampleLevels, SampleType, Storage};
pub use frame::Frame;
pub use plane::{Plane, PlaneSamples};

/// Prelude module for convenient imports.
///
/// ```
/// use grain_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clip::{Clip, ClipInfo};
    pub use crate::error::{Error, Result};
    pub use crate::format::{ColorFamily, Format, SampleLevels, SampleType};
    pub use crate::frame::Frame;
    pub use crate::plane::{Plane, PlaneSamples};
}
