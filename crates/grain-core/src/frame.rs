//! Video frames made of planes.
//!
//! A [`Frame`] couples a [`Format`] with one plane (gray) or three planes
//! (YUV). Construction checks that every plane has the size the format's
//! subsampling implies and the storage its sample type requires, so the
//! processing stages can index planes without re-validating.

use crate::{Error, Format, Plane, Result};

/// A single video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: Format,
    width: u32,
    height: u32,
    planes: Vec<Plane>,
}

impl Frame {
    /// Assembles a frame from its planes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if the frame size violates subsampling
    /// - [`Error::PlaneCount`] if the plane count differs from the format
    /// - [`Error::DimensionMismatch`] if a plane has the wrong size
    /// - [`Error::SampleMismatch`] if a plane has the wrong storage
    ///
    /// # Example
    ///
    /// ```rust
    /// use grain_core::{Format, Frame, Plane};
    ///
    /// let fmt = Format::YUV420P8;
    /// let planes = vec![
    ///     Plane::filled(&fmt, 8, 4, 16.0),
    ///     Plane::filled(&fmt, 4, 2, 128.0),
    ///     Plane::filled(&fmt, 4, 2, 128.0),
    /// ];
    /// let frame = Frame::new(fmt, 8, 4, planes).unwrap();
    /// assert_eq!(frame.plane(1).dimensions(), (4, 2));
    /// ```
    pub fn new(format: Format, width: u32, height: u32, planes: Vec<Plane>) -> Result<Self> {
        format.check_frame_size(width, height)?;
        if planes.len() != format.num_planes() {
            return Err(Error::PlaneCount {
                expected: format.num_planes(),
                got: planes.len(),
            });
        }
        let storage = format.storage();
        for (i, plane) in planes.iter().enumerate() {
            let expected = format.plane_dimensions(i, width, height);
            if plane.dimensions() != expected {
                return Err(Error::dimension_mismatch(expected, plane.dimensions()));
            }
            let got = plane.samples().storage();
            if got != storage {
                return Err(Error::SampleMismatch {
                    plane: i,
                    expected: storage.name(),
                    got: got.name(),
                });
            }
        }
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Creates a frame with every plane set to `value`.
    pub fn filled(format: Format, width: u32, height: u32, value: f32) -> Result<Self> {
        Self::filled_planes(format, width, height, &[value, value, value])
    }

    /// Creates a frame with plane `i` set to `values[i]`.
    ///
    /// Handy for YUV frames with neutral chroma, e.g. `[luma, 128.0, 128.0]`.
    pub fn filled_planes(format: Format, width: u32, height: u32, values: &[f32]) -> Result<Self> {
        format.check_frame_size(width, height)?;
        if values.len() < format.num_planes() {
            return Err(Error::PlaneCount {
                expected: format.num_planes(),
                got: values.len(),
            });
        }
        let planes = (0..format.num_planes())
            .map(|i| {
                let (w, h) = format.plane_dimensions(i, width, height);
                Plane::filled(&format, w, h, values[i])
            })
            .collect();
        Ok(Self {
            format,
            width,
            height,
            planes,
        })
    }

    /// Frame format.
    #[inline]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Luma width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Luma height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of planes.
    #[inline]
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Plane by index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_planes()`.
    #[inline]
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// All planes in order.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Consumes the frame, returning its planes.
    pub fn into_planes(self) -> Vec<Plane> {
        self.planes
    }
}
