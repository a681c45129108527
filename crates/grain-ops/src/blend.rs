//! Photographic blend modes for grain compositing.
//!
//! Every mode is a per-sample function of two operands `x` and `y` plus the
//! [`SampleLevels`] of the format, so the same formula serves 8/10/16-bit
//! integer and 32-bit float frames.
//!
//! # Blend Modes
//!
//! - [`BlendMode::Normal`] - `y`; blending happens through the opacity merge
//! - [`BlendMode::Average`] - mean of both operands
//! - [`BlendMode::GrainExtract`] / [`BlendMode::GrainMerge`] - difference and sum around neutral
//! - [`BlendMode::HardLight`], [`BlendMode::Overlay`] - multiply/screen switched on `y` or `x`
//! - [`BlendMode::LinearLight`], [`BlendMode::SoftLight`], [`BlendMode::VividLight`]
//!
//! Modes other than `average` are directional: `x` and `y` are not
//! interchangeable.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Format, SampleLevels};
//! use grain_ops::blend::{blend_sample, BlendMode};
//!
//! let levels = SampleLevels::from_format(&Format::YUV420P8);
//! let mode: BlendMode = "GrainMerge".parse().unwrap();
//! assert_eq!(blend_sample(100.0, 140.0, mode, &levels), 112.0);
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Format, Frame, Plane, SampleLevels};
use std::fmt;
use std::str::FromStr;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Blend mode for grain compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlendMode {
    /// Overlay value as-is.
    Normal,
    /// `(x + y) / 2`.
    Average,
    /// `x - y + neutral`.
    GrainExtract,
    /// `x + y - neutral`.
    GrainMerge,
    /// Multiply or screen, switched on `y`.
    HardLight,
    /// Linear burn or dodge, switched on `y`.
    LinearLight,
    /// Multiply or screen, switched on `x`.
    #[default]
    Overlay,
    /// Burn/screen weighted by the distance of `y` from neutral.
    SoftLight,
    /// Color burn or dodge with zero guards.
    VividLight,
}

impl BlendMode {
    /// Every recognized mode.
    pub const ALL: [BlendMode; 9] = [
        BlendMode::Normal,
        BlendMode::Average,
        BlendMode::GrainExtract,
        BlendMode::GrainMerge,
        BlendMode::HardLight,
        BlendMode::LinearLight,
        BlendMode::Overlay,
        BlendMode::SoftLight,
        BlendMode::VividLight,
    ];

    /// Lowercase mode name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Average => "average",
            Self::GrainExtract => "grainextract",
            Self::GrainMerge => "grainmerge",
            Self::HardLight => "hardlight",
            Self::LinearLight => "linearlight",
            Self::Overlay => "overlay",
            Self::SoftLight => "softlight",
            Self::VividLight => "vividlight",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = OpsError;

    /// Case-insensitive lookup; unknown names are [`OpsError::InvalidMode`].
    fn from_str(s: &str) -> OpsResult<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| OpsError::InvalidMode(s.to_string()))
    }
}

/// Blends one sample pair.
///
/// `x` is the first operand and `y` the second; see the module docs for
/// which modes switch on which operand. Arithmetic is plain `f32` in the
/// native sample range; callers quantize afterwards.
#[inline]
pub fn blend_sample(x: f32, y: f32, mode: BlendMode, levels: &SampleLevels) -> f32 {
    let n = levels.neutral;
    let p = levels.peak;
    let f = levels.factor;

    match mode {
        BlendMode::Normal => y,
        BlendMode::Average => (x + y) / 2.0,
        BlendMode::GrainExtract => x - y + n,
        BlendMode::GrainMerge => x + y - n,
        BlendMode::HardLight => {
            if y < n {
                2.0 * (y * x / p)
            } else {
                p - 2.0 * ((p - y) * (p - x) / p)
            }
        }
        BlendMode::LinearLight => {
            if y < n {
                y + 2.0 * x - p
            } else {
                y + 2.0 * (x - n)
            }
        }
        BlendMode::Overlay => {
            if x < n {
                2.0 * (x * y / p)
            } else {
                p - 2.0 * ((p - x) * (p - y) / p)
            }
        }
        BlendMode::SoftLight => {
            let weight = 0.5 - (y - n).abs() / p;
            if x > n {
                y + (p - y) * (x - n) / n * weight
            } else {
                y - y * (n - x) / n * weight
            }
        }
        BlendMode::VividLight => {
            if x < n {
                if x <= 0.0 {
                    2.0 * x
                } else {
                    p - (p - y) * f / (2.0 * x)
                }
            } else {
                let dodge = 2.0 * (x - n);
                if dodge >= p {
                    dodge
                } else {
                    y * f / (p - dodge)
                }
            }
        }
    }
}

/// Blends two planes sample by sample.
///
/// The result is quantized for `format`.
pub fn blend_plane(x: &Plane, y: &Plane, mode: BlendMode, format: &Format) -> OpsResult<Plane> {
    if x.dimensions() != y.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "blend planes {}x{} vs {}x{}",
            x.width(),
            x.height(),
            y.width(),
            y.height()
        )));
    }
    let levels = SampleLevels::from_format(format);
    let xs = x.to_f32();
    let ys = y.to_f32();
    let out: Vec<f32> = xs
        .iter()
        .zip(ys.iter())
        .map(|(&xv, &yv)| blend_sample(xv, yv, mode, &levels))
        .collect();
    Ok(Plane::from_f32(format, x.width(), x.height(), out)?)
}

/// Blends every plane of `x` with the matching plane of `y`.
///
/// # Errors
///
/// Returns [`OpsError::Format`] if the frames differ in format and
/// [`OpsError::SizeMismatch`] if they differ in size.
pub fn blend_frames(x: &Frame, y: &Frame, mode: BlendMode) -> OpsResult<Frame> {
    if x.format() != y.format() {
        return Err(OpsError::Format(format!(
            "cannot blend {} with {}",
            x.format(),
            y.format()
        )));
    }
    if x.dimensions() != y.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "blend frames {}x{} vs {}x{}",
            x.width(),
            x.height(),
            y.width(),
            y.height()
        )));
    }
    trace!(mode = %mode, width = x.width(), height = x.height(), "blend::frames");

    let format = x.format();
    let planes = x
        .planes()
        .iter()
        .zip(y.planes())
        .map(|(xp, yp)| blend_plane(xp, yp, mode, &format))
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, x.width(), x.height(), planes)?)
}
