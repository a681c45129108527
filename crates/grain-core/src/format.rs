//! Frame sample formats and blend levels.
//!
//! This module provides the canonical description of how a frame stores its
//! samples and the constants the blend formulas are parameterized by.
//!
//! # Types
//!
//! - [`SampleType`] - Integer or floating-point samples
//! - [`ColorFamily`] - Gray (one plane) or YUV (three planes)
//! - [`Format`] - Full descriptor: sample type, bit depth, family, subsampling
//! - [`SampleLevels`] - `neutral`, `peak` and scale `factor` for a format
//! - [`Storage`] - In-memory sample container used by a format
//!
//! # Usage
//!
//! ```rust
//! use grain_core::format::{Format, SampleLevels};
//!
//! let fmt: Format = "yuv420p10".parse().unwrap();
//! assert_eq!(fmt, Format::YUV420P10);
//!
//! let levels = SampleLevels::from_format(&fmt);
//! assert_eq!(levels.neutral, 512.0);
//! assert_eq!(levels.peak, 1023.0);
//! assert_eq!(levels.factor, 1024.0);
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Sample representation of every plane in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SampleType {
    /// Unsigned integer samples, 8 to 16 bits.
    Integer,
    /// 32-bit float samples, nominal range [0, 1].
    Float,
}

/// Color family of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorFamily {
    /// Single luma/gray plane.
    Gray,
    /// Luma plus two chroma planes.
    Yuv,
}

/// Container used to hold the samples of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// 8-bit integer samples.
    U8,
    /// 9 to 16-bit integer samples.
    U16,
    /// 32-bit float samples.
    F32,
}

impl Storage {
    /// Bytes used by one sample.
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }

    /// Short name for messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::F32 => "f32",
        }
    }
}

/// Describes the sample layout of a frame.
///
/// Subsampling factors are log2 shifts: `1` halves the chroma resolution
/// along that axis, `0` keeps it at full resolution. Gray formats never
/// carry subsampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    sample_type: SampleType,
    bits_per_sample: u32,
    color_family: ColorFamily,
    subsampling_w: u32,
    subsampling_h: u32,
}

impl Format {
    /// 8-bit gray.
    pub const GRAY8: Self = Self::raw(SampleType::Integer, 8, ColorFamily::Gray, 0, 0);
    /// 16-bit gray.
    pub const GRAY16: Self = Self::raw(SampleType::Integer, 16, ColorFamily::Gray, 0, 0);
    /// 32-bit float gray.
    pub const GRAYS: Self = Self::raw(SampleType::Float, 32, ColorFamily::Gray, 0, 0);
    /// 8-bit 4:2:0.
    pub const YUV420P8: Self = Self::raw(SampleType::Integer, 8, ColorFamily::Yuv, 1, 1);
    /// 10-bit 4:2:0.
    pub const YUV420P10: Self = Self::raw(SampleType::Integer, 10, ColorFamily::Yuv, 1, 1);
    /// 16-bit 4:2:0.
    pub const YUV420P16: Self = Self::raw(SampleType::Integer, 16, ColorFamily::Yuv, 1, 1);
    /// 8-bit 4:2:2.
    pub const YUV422P8: Self = Self::raw(SampleType::Integer, 8, ColorFamily::Yuv, 1, 0);
    /// 10-bit 4:2:2.
    pub const YUV422P10: Self = Self::raw(SampleType::Integer, 10, ColorFamily::Yuv, 1, 0);
    /// 8-bit 4:4:4.
    pub const YUV444P8: Self = Self::raw(SampleType::Integer, 8, ColorFamily::Yuv, 0, 0);
    /// 10-bit 4:4:4.
    pub const YUV444P10: Self = Self::raw(SampleType::Integer, 10, ColorFamily::Yuv, 0, 0);
    /// 16-bit 4:4:4.
    pub const YUV444P16: Self = Self::raw(SampleType::Integer, 16, ColorFamily::Yuv, 0, 0);
    /// 32-bit float 4:4:4.
    pub const YUV444PS: Self = Self::raw(SampleType::Float, 32, ColorFamily::Yuv, 0, 0);

    const fn raw(
        sample_type: SampleType,
        bits_per_sample: u32,
        color_family: ColorFamily,
        subsampling_w: u32,
        subsampling_h: u32,
    ) -> Self {
        Self {
            sample_type,
            bits_per_sample,
            color_family,
            subsampling_w,
            subsampling_h,
        }
    }

    /// Creates a validated format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for integer depths outside 8..=16,
    /// float depths other than 32, subsampling shifts above 2, or a gray
    /// format with subsampling.
    pub fn new(
        sample_type: SampleType,
        bits_per_sample: u32,
        color_family: ColorFamily,
        subsampling_w: u32,
        subsampling_h: u32,
    ) -> Result<Self> {
        let fmt = Self::raw(
            sample_type,
            bits_per_sample,
            color_family,
            subsampling_w,
            subsampling_h,
        );
        match sample_type {
            SampleType::Integer if !(8..=16).contains(&bits_per_sample) => {
                return Err(Error::unsupported_format(format!(
                    "{}-bit integer samples",
                    bits_per_sample
                )));
            }
            SampleType::Float if bits_per_sample != 32 => {
                return Err(Error::unsupported_format(format!(
                    "{}-bit float samples",
                    bits_per_sample
                )));
            }
            _ => {}
        }
        if color_family == ColorFamily::Gray && (subsampling_w != 0 || subsampling_h != 0) {
            return Err(Error::unsupported_format("gray format with chroma subsampling"));
        }
        if subsampling_w > 2 || subsampling_h > 2 {
            return Err(Error::unsupported_format(format!(
                "subsampling {}x{} exceeds 2",
                subsampling_w, subsampling_h
            )));
        }
        Ok(fmt)
    }

    /// Sample representation.
    #[inline]
    pub const fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    /// Bits per sample.
    #[inline]
    pub const fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    /// Color family.
    #[inline]
    pub const fn color_family(&self) -> ColorFamily {
        self.color_family
    }

    /// Horizontal chroma subsampling shift.
    #[inline]
    pub const fn subsampling_w(&self) -> u32 {
        self.subsampling_w
    }

    /// Vertical chroma subsampling shift.
    #[inline]
    pub const fn subsampling_h(&self) -> u32 {
        self.subsampling_h
    }

    /// Whether the samples are floating point.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self.sample_type, SampleType::Float)
    }

    /// Whether chroma planes have reduced resolution.
    #[inline]
    pub const fn is_subsampled(&self) -> bool {
        self.subsampling_w > 0 || self.subsampling_h > 0
    }

    /// Number of planes: 1 for gray, 3 for YUV.
    #[inline]
    pub const fn num_planes(&self) -> usize {
        match self.color_family {
            ColorFamily::Gray => 1,
            ColorFamily::Yuv => 3,
        }
    }

    /// Storage container for this format's samples.
    #[inline]
    pub const fn storage(&self) -> Storage {
        match self.sample_type {
            SampleType::Float => Storage::F32,
            SampleType::Integer if self.bits_per_sample <= 8 => Storage::U8,
            SampleType::Integer => Storage::U16,
        }
    }

    /// Returns the same format with different subsampling.
    ///
    /// Has no effect on gray formats.
    pub const fn with_subsampling(&self, subsampling_w: u32, subsampling_h: u32) -> Self {
        match self.color_family {
            ColorFamily::Gray => *self,
            ColorFamily::Yuv => Self::raw(
                self.sample_type,
                self.bits_per_sample,
                self.color_family,
                subsampling_w,
                subsampling_h,
            ),
        }
    }

    /// Returns the single-plane gray format with this sample type.
    pub const fn to_gray(&self) -> Self {
        Self::raw(self.sample_type, self.bits_per_sample, ColorFamily::Gray, 0, 0)
    }

    /// Returns this sample type as full-resolution YUV.
    pub const fn to_yuv444(&self) -> Self {
        Self::raw(self.sample_type, self.bits_per_sample, ColorFamily::Yuv, 0, 0)
    }

    /// Dimensions of `plane` for a frame of `width` x `height`.
    #[inline]
    pub const fn plane_dimensions(&self, plane: usize, width: u32, height: u32) -> (u32, u32) {
        if plane == 0 {
            (width, height)
        } else {
            (width >> self.subsampling_w, height >> self.subsampling_h)
        }
    }

    /// Checks that a frame size is compatible with the subsampling.
    pub fn check_frame_size(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "frame size must be > 0"));
        }
        let mod_w = 1u32 << self.subsampling_w;
        let mod_h = 1u32 << self.subsampling_h;
        if width % mod_w != 0 || height % mod_h != 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("{} requires width mod {} and height mod {}", self, mod_w, mod_h),
            ));
        }
        Ok(())
    }

    /// Rounds and clamps a computed value into the representable range.
    ///
    /// Integer formats round to nearest (ties to even) and clamp to
    /// `[0, peak]`. Float values pass through unchanged.
    #[inline]
    pub fn quantize(&self, v: f32) -> f32 {
        match self.sample_type {
            SampleType::Float => v,
            SampleType::Integer => {
                let peak = ((1u32 << self.bits_per_sample) - 1) as f32;
                v.round_ties_even().clamp(0.0, peak)
            }
        }
    }

    fn subsampling_name(&self) -> Option<&'static str> {
        match (self.subsampling_w, self.subsampling_h) {
            (0, 0) => Some("444"),
            (1, 0) => Some("422"),
            (1, 1) => Some("420"),
            (0, 1) => Some("440"),
            (2, 0) => Some("411"),
            (2, 2) => Some("410"),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = match self.sample_type {
            SampleType::Float => "S".to_string(),
            SampleType::Integer => self.bits_per_sample.to_string(),
        };
        match self.color_family {
            ColorFamily::Gray => write!(f, "GRAY{}", depth),
            ColorFamily::Yuv => match self.subsampling_name() {
                Some(ss) => write!(f, "YUV{}P{}", ss, depth),
                None => write!(
                    f,
                    "YUV(ss {}x{})P{}",
                    self.subsampling_w, self.subsampling_h, depth
                ),
            },
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    /// Parses names like `gray8`, `grays`, `yuv420p10`, `yuv444ps`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let bad = || Error::unsupported_format(format!("unknown format name '{}'", s));

        let parse_depth = |d: &str| -> Result<(SampleType, u32)> {
            match d {
                "s" => Ok((SampleType::Float, 32)),
                _ => d
                    .parse::<u32>()
                    .map(|bits| (SampleType::Integer, bits))
                    .map_err(|_| bad()),
            }
        };

        if let Some(depth) = lower.strip_prefix("gray") {
            let (st, bits) = parse_depth(depth)?;
            return Self::new(st, bits, ColorFamily::Gray, 0, 0);
        }

        let rest = lower.strip_prefix("yuv").ok_or_else(bad)?;
        if rest.len() < 5 || rest.as_bytes()[3] != b'p' {
            return Err(bad());
        }
        let (ssw, ssh) = match &rest[..3] {
            "444" => (0, 0),
            "422" => (1, 0),
            "420" => (1, 1),
            "440" => (0, 1),
            "411" => (2, 0),
            "410" => (2, 2),
            _ => return Err(bad()),
        };
        let (st, bits) = parse_depth(&rest[4..])?;
        Self::new(st, bits, ColorFamily::Yuv, ssw, ssh)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Format {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string().to_ascii_lowercase())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Format {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Constants that parameterize every blend formula.
///
/// - INTEGER(bits): `neutral = 2^(bits-1)`, `peak = 2^bits - 1`, `factor = 2^bits`
/// - FLOAT: `neutral = 0.5`, `peak = factor = 1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleLevels {
    /// Value meaning "no change" (mid-gray).
    pub neutral: f32,
    /// Largest representable value.
    pub peak: f32,
    /// Scale factor used by vivid light.
    pub factor: f32,
}

impl SampleLevels {
    /// Levels for a format's sample representation.
    pub fn from_format(format: &Format) -> Self {
        match format.sample_type() {
            SampleType::Integer => {
                let bits = format.bits_per_sample();
                Self {
                    neutral: (1u32 << (bits - 1)) as f32,
                    peak: ((1u32 << bits) - 1) as f32,
                    factor: (1u32 << bits) as f32,
                }
            }
            SampleType::Float => Self {
                neutral: 0.5,
                peak: 1.0,
                factor: 1.0,
            },
        }
    }
}

impl From<&Format> for SampleLevels {
    fn from(format: &Format) -> Self {
        Self::from_format(format)
    }
}
