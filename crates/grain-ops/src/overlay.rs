//! Blending one clip over another.
//!
//! [`Overlay`] is a lazy [`FrameSource`] that, for each frame:
//!
//! 1. Point-upsamples both operands to 4:4:4 when the format is subsampled
//!    and the mode is not `normal`, so chroma lines up with luma
//! 2. Blends with the overlay as `x` and the base as `y`
//! 3. Merges `base * (1 - opacity) + blended * opacity`
//! 4. Point-downsamples back to the original format
//!
//! Validation happens when the stage is built, before any frame is
//! requested. [`composite_grain`] chains [`fit_grain`] and an [`Overlay`]
//! for the pre-rendered grain path.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, Format, Frame};
//! use grain_ops::overlay::apply_overlay;
//!
//! let base = Clip::repeat(Frame::filled(Format::YUV420P8, 8, 8, 100.0).unwrap(), 2).unwrap();
//! let grain = Clip::repeat(Frame::filled(Format::YUV420P8, 8, 8, 128.0).unwrap(), 2).unwrap();
//! let out = apply_overlay(&base, &grain, 1.0, "grainmerge").unwrap();
//! assert_eq!(out.frame(0).unwrap().plane(0).sample(3, 3), 100.0);
//! ```

use crate::blend::{blend_frames, BlendMode};
use crate::geometry::fit_grain;
use crate::merge::{check_weight, merge_frames};
use crate::resize::{convert_subsampling, Filter};
use crate::source::{check_index, render, FrameSource};
use crate::{OpsError, OpsResult};
use grain_core::{Clip, ClipInfo, ColorFamily, Frame};
use std::sync::Arc;
use tracing::{debug, trace};

/// Parameters of the pre-rendered grain path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayParams {
    /// Scale applied to the grain before tiling.
    pub size: f64,
    /// Blend mode.
    pub mode: BlendMode,
    /// Blur strength; 0 disables the blur round trip.
    pub blur_strength: u32,
    /// Opacity of the blended grain.
    pub opacity: f32,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            mode: BlendMode::Overlay,
            blur_strength: 0,
            opacity: 1.0,
        }
    }
}

impl OverlayParams {
    /// Checks ranges that do not depend on the clips.
    pub fn validate(&self) -> OpsResult<()> {
        check_weight("opacity", self.opacity)?;
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "size must be > 0, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

/// Blends one frame pair.
///
/// `base` and `overlay` must share format and size.
pub fn overlay_frame(base: &Frame, overlay: &Frame, opacity: f32, mode: BlendMode) -> OpsResult<Frame> {
    if mode == BlendMode::Normal {
        return merge_frames(base, overlay, opacity);
    }

    let format = base.format();
    if format.is_subsampled() {
        let full = format.to_yuv444();
        let base_up = convert_subsampling(base, full, Filter::Point)?;
        let overlay_up = convert_subsampling(overlay, full, Filter::Point)?;
        let blended = blend_frames(&overlay_up, &base_up, mode)?;
        let merged = merge_frames(&base_up, &blended, opacity)?;
        return convert_subsampling(&merged, format, Filter::Point);
    }

    let blended = blend_frames(overlay, base, mode)?;
    merge_frames(base, &blended, opacity)
}

/// Lazy overlay of one frame source on another.
pub struct Overlay<B, O> {
    base: B,
    overlay: O,
    opacity: f32,
    mode: BlendMode,
    info: ClipInfo,
}

impl<B: FrameSource, O: FrameSource> Overlay<B, O> {
    /// Validates the operands and builds the stage.
    ///
    /// # Errors
    ///
    /// - [`OpsError::Format`] if the formats differ
    /// - [`OpsError::SizeMismatch`] if frame size or count differ
    /// - [`OpsError::InvalidParameter`] if `opacity` is outside `[0, 1]`
    pub fn new(base: B, overlay: O, opacity: f32, mode: BlendMode) -> OpsResult<Self> {
        check_weight("opacity", opacity)?;
        let info = base.info();
        let other = overlay.info();
        if info.format != other.format {
            return Err(OpsError::Format(format!(
                "base is {} but overlay is {}",
                info.format, other.format
            )));
        }
        if (info.width, info.height) != (other.width, other.height) {
            return Err(OpsError::SizeMismatch(format!(
                "base is {}x{} but overlay is {}x{}",
                info.width, info.height, other.width, other.height
            )));
        }
        if info.num_frames != other.num_frames {
            return Err(OpsError::SizeMismatch(format!(
                "base has {} frames but overlay has {}",
                info.num_frames, other.num_frames
            )));
        }
        debug!(mode = %mode, opacity, format = %info.format, "overlay::new");
        Ok(Self {
            base,
            overlay,
            opacity,
            mode,
            info,
        })
    }

    /// Like [`Overlay::new`], parsing the mode name first.
    ///
    /// An unknown name fails with [`OpsError::InvalidMode`] before either
    /// operand is inspected.
    pub fn with_mode_name(base: B, overlay: O, opacity: f32, mode: &str) -> OpsResult<Self> {
        let mode: BlendMode = mode.parse()?;
        Self::new(base, overlay, opacity, mode)
    }

    /// Blend mode in use.
    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// Opacity in use.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl<B: FrameSource, O: FrameSource> FrameSource for Overlay<B, O> {
    fn info(&self) -> ClipInfo {
        self.info
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        check_index(&self.info, index)?;
        trace!(index, "overlay::frame");
        let base = self.base.frame(index)?;
        let overlay = self.overlay.frame(index)?;
        Ok(Arc::new(overlay_frame(&base, &overlay, self.opacity, self.mode)?))
    }
}

/// Blends `overlay` onto `base` and renders the result.
///
/// `mode` is matched case-insensitively against the nine mode names.
pub fn apply_overlay(base: &Clip, overlay: &Clip, opacity: f32, mode: &str) -> OpsResult<Clip> {
    let stage = Overlay::with_mode_name(base, overlay, opacity, mode)?;
    render(&stage)
}

/// Fits a pre-rendered `grain` clip to `clip` and blends it on.
///
/// Both clips must be YUV with identical formats.
pub fn composite_grain(clip: &Clip, grain: &Clip, params: &OverlayParams) -> OpsResult<Clip> {
    if clip.format().color_family() != ColorFamily::Yuv
        || grain.format().color_family() != ColorFamily::Yuv
    {
        return Err(OpsError::Format(format!(
            "both clips must be YUV, got {} and {}",
            clip.format(),
            grain.format()
        )));
    }
    if clip.format() != grain.format() {
        return Err(OpsError::Format(format!(
            "both clips must have the same format, got {} and {}",
            clip.format(),
            grain.format()
        )));
    }
    params.validate()?;

    let fitted = fit_grain(grain, &clip.info(), params.size, params.blur_strength)?;
    let stage = Overlay::new(clip, &fitted, params.opacity, params.mode)?;
    render(&stage)
}
