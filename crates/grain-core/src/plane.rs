//! Single-channel sample grids.
//!
//! A [`Plane`] is one color channel of a frame: luma/gray for plane 0,
//! chroma for planes 1 and 2. Samples are stored row-major with no padding.
//!
//! Processing stages read a plane as native-range `f32` values (an 8-bit
//! sample of 200 reads as `200.0`, not `0.78`) and write results back with
//! [`Plane::from_f32`], which rounds and clamps for integer formats.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Format, Plane};
//!
//! let plane = Plane::filled(&Format::GRAY8, 4, 2, 128.0);
//! let values = plane.to_f32();
//! assert_eq!(values.len(), 8);
//! assert_eq!(values[0], 128.0);
//!
//! let back = Plane::from_f32(&Format::GRAY8, 4, 2, vec![300.0; 8]).unwrap();
//! assert_eq!(back.sample(0, 0), 255.0);
//! ```

use crate::{Error, Format, Result, Storage};

/// Typed sample storage of a plane.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneSamples {
    /// 8-bit integer samples.
    U8(Vec<u8>),
    /// 9 to 16-bit integer samples.
    U16(Vec<u16>),
    /// 32-bit float samples.
    F32(Vec<f32>),
}

impl PlaneSamples {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::F32(v) => v.len(),
        }
    }

    /// Whether there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind of these samples.
    #[inline]
    pub fn storage(&self) -> Storage {
        match self {
            Self::U8(_) => Storage::U8,
            Self::U16(_) => Storage::U16,
            Self::F32(_) => Storage::F32,
        }
    }

    /// Converts all samples to `f32` in their native range.
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            Self::U8(v) => v.iter().map(|&s| s as f32).collect(),
            Self::U16(v) => v.iter().map(|&s| s as f32).collect(),
            Self::F32(v) => v.clone(),
        }
    }

    #[inline]
    fn get(&self, idx: usize) -> f32 {
        match self {
            Self::U8(v) => v[idx] as f32,
            Self::U16(v) => v[idx] as f32,
            Self::F32(v) => v[idx],
        }
    }
}

/// One channel of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: u32,
    height: u32,
    samples: PlaneSamples,
}

impl Plane {
    /// Creates a plane from typed samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the size is zero or the sample
    /// count differs from `width * height`.
    pub fn new(width: u32, height: u32, samples: PlaneSamples) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "plane size must be > 0"));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, samples.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Creates a plane filled with `value` (quantized for the format).
    pub fn filled(format: &Format, width: u32, height: u32, value: f32) -> Self {
        let count = width as usize * height as usize;
        let value = format.quantize(value);
        let samples = match format.storage() {
            Storage::U8 => PlaneSamples::U8(vec![value as u8; count]),
            Storage::U16 => PlaneSamples::U16(vec![value as u16; count]),
            Storage::F32 => PlaneSamples::F32(vec![value; count]),
        };
        Self {
            width,
            height,
            samples,
        }
    }

    /// Builds a plane of `format` from native-range `f32` values.
    ///
    /// Integer formats round to nearest and clamp to `[0, peak]`.
    pub fn from_f32(format: &Format, width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let samples = match format.storage() {
            Storage::U8 => {
                PlaneSamples::U8(data.iter().map(|&v| format.quantize(v) as u8).collect())
            }
            Storage::U16 => {
                PlaneSamples::U16(data.iter().map(|&v| format.quantize(v) as u16).collect())
            }
            Storage::F32 => PlaneSamples::F32(data),
        };
        Self::new(width, height, samples)
    }

    /// Plane width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed plane.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Typed samples.
    #[inline]
    pub fn samples(&self) -> &PlaneSamples {
        &self.samples
    }

    /// Consumes the plane, returning its samples.
    pub fn into_samples(self) -> PlaneSamples {
        self.samples
    }

    /// Samples as native-range `f32`.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.to_f32()
    }

    /// Sample at `(x, y)` as `f32`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "sample ({x}, {y}) out of bounds");
        self.samples.get(y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_new_wrong_size() {
        let result = Plane::new(4, 4, PlaneSamples::U8(vec![0; 15]));
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_plane_zero_size() {
        assert!(Plane::new(0, 4, PlaneSamples::U8(vec![])).is_err());
    }

    #[test]
    fn test_from_f32_quantizes_integers() {
        let plane = Plane::from_f32(&Format::GRAY16, 2, 1, vec![-10.0, 70000.0]).unwrap();
        assert_eq!(plane.samples(), &PlaneSamples::U16(vec![0, 65535]));

        let plane = Plane::from_f32(&Format::GRAYS, 2, 1, vec![-0.25, 1.5]).unwrap();
        assert_eq!(plane.to_f32(), vec![-0.25, 1.5]);
    }

    #[test]
    fn test_storage_by_depth() {
        let fmt: Format = "yuv420p10".parse().unwrap();
        let plane = Plane::filled(&fmt, 2, 2, 512.0);
        assert_eq!(plane.samples().storage(), Storage::U16);
        assert_eq!(plane.sample(1, 1), 512.0);
    }
}
