//! # grain-ops
//!
//! Film-grain compositing on top of the [`grain_core`] frame model.
//!
//! Two paths put grain on a clip:
//!
//! - **Pre-rendered grain**: [`composite_grain`] scales, tiles, crops,
//!   blurs and loops a grain clip to the target ([`geometry`]) and blends it
//!   on with one of nine photographic modes ([`overlay`], [`blend`])
//! - **Synthetic grain**: [`synthesize`] calls a [`GrainGenerator`] once per
//!   frame on luma with a frame-derived seed and merges the result at an
//!   opacity ([`synth`])
//!
//! # Modules
//!
//! - [`blend`] - Per-sample blend-mode formulas
//! - [`merge`] - Opacity merge
//! - [`geometry`] - Fitting grain to a target's size and length
//! - [`overlay`] - Blend orchestration with subsampling round trip
//! - [`synth`] - Per-frame seeded grain synthesis
//! - [`noise`] - Deterministic hash-noise generator
//! - [`source`] - Lazy frame sources and rendering
//! - [`resize`], [`filter`], [`transform`] - Resampling, box blur, crop and stacking
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, Format, Frame};
//! use grain_ops::{composite_grain, BlendMode, OverlayParams};
//!
//! let clip = Clip::repeat(Frame::filled(Format::YUV420P8, 64, 32, 90.0).unwrap(), 5).unwrap();
//! let grain = Clip::repeat(Frame::filled(Format::YUV420P8, 24, 16, 128.0).unwrap(), 2).unwrap();
//!
//! let params = OverlayParams { mode: BlendMode::GrainMerge, ..Default::default() };
//! let out = composite_grain(&clip, &grain, &params).unwrap();
//! assert_eq!(out.info(), clip.info());
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Render frames across the rayon pool
//! - `serde` - Serialize [`OverlayParams`], [`GrainParams`] and [`BlendMode`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod filter;
pub mod geometry;
pub mod merge;
pub mod noise;
pub mod overlay;
pub mod resize;
pub mod source;
pub mod synth;
pub mod transform;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use blend::BlendMode;
pub use error::{OpsError, OpsResult};
pub use geometry::{fit_grain, GrainGeometry};
pub use noise::HashNoise;
pub use overlay::{apply_overlay, composite_grain, Overlay, OverlayParams};
pub use resize::Filter;
pub use source::{render, FrameSource};
pub use synth::{synthesize, GrainGenerator, GrainParams, Synthesizer};
