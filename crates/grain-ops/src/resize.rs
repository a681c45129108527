//! Plane and frame resampling.
//!
//! Two filters cover what grain compositing needs:
//!
//! - [`Filter::Point`] - Nearest sample, used to move chroma between 4:2:0 /
//!   4:2:2 and 4:4:4 without inventing new values
//! - [`Filter::Bilinear`] - Linear interpolation, used to scale grain and for
//!   the 4x blur round trip
//!
//! Point upsampling by an integer factor duplicates samples, and point
//! downsampling by the same factor picks one of each duplicated group, so a
//! point up/down round trip returns the original chroma exactly.
//!
//! # Example
//!
//! ```rust
//! use grain_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.5f32; 16 * 16];
//! let dst = resize_f32(&src, 16, 16, 32, 32, Filter::Bilinear).unwrap();
//! assert_eq!(dst.len(), 32 * 32);
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Format, Frame, Plane};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest sample.
    Point,
    /// Bilinear (triangle) interpolation.
    #[default]
    Bilinear,
}

impl Filter {
    /// Support radius of the bilinear kernel.
    #[inline]
    fn support(&self) -> f32 {
        match self {
            Filter::Point => 0.5,
            Filter::Bilinear => 1.0,
        }
    }
}

/// Bilinear (triangle) weight function.
#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Resizes one plane of `f32` samples.
///
/// # Arguments
///
/// * `src` - Source samples, row-major
/// * `src_w`, `src_h` - Source size
/// * `dst_w`, `dst_h` - Destination size
/// * `filter` - Resampling filter
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    let expected = src_w * src_h;
    if src_w == 0 || src_h == 0 || src.len() != expected {
        return Err(OpsError::Geometry(format!(
            "source {}x{} with {} samples",
            src_w,
            src_h,
            src.len()
        )));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::Geometry("destination size must be > 0".into()));
    }
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.to_vec());
    }

    match filter {
        Filter::Point => Ok(resize_point(src, src_w, src_h, dst_w, dst_h)),
        Filter::Bilinear => {
            // Two-pass separable resize: horizontal then vertical
            let temp = resize_horizontal(src, src_w, src_h, dst_w, filter);
            Ok(resize_vertical(&temp, dst_w, src_h, dst_h, filter))
        }
    }
}

/// Maps a destination index to the nearest source index by sample centers.
#[inline]
fn point_index(dst: usize, src_len: usize, dst_len: usize) -> usize {
    let pos = (dst as f64 + 0.5) * src_len as f64 / dst_len as f64;
    (pos.floor() as usize).min(src_len - 1)
}

fn resize_point(src: &[f32], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<f32> {
    let cols: Vec<usize> = (0..dst_w).map(|x| point_index(x, src_w, dst_w)).collect();
    let mut dst = Vec::with_capacity(dst_w * dst_h);
    for y in 0..dst_h {
        let row = point_index(y, src_h, dst_h) * src_w;
        dst.extend(cols.iter().map(|&sx| src[row + sx]));
    }
    dst
}

/// Horizontal resize pass.
fn resize_horizontal(src: &[f32], src_w: usize, src_h: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..src_h {
        for x in 0..dst_w {
            // Map destination x to source x
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = ((center + support).ceil().max(0.0) as usize).min(src_w - 1);

            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;
            for sx in left..=right {
                let w = bilinear_weight((sx as f32 - center) / scale.max(1.0));
                weight_sum += w;
                sum += src[y * src_w + sx] * w;
            }

            dst[y * dst_w + x] = if weight_sum > 0.0 {
                sum / weight_sum
            } else {
                src[y * src_w + left.min(src_w - 1)]
            };
        }
    }

    dst
}

/// Vertical resize pass.
fn resize_vertical(src: &[f32], src_w: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h];
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);

    for y in 0..dst_h {
        // Map destination y to source y
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = ((center - support).floor() as isize).max(0) as usize;
        let bottom = ((center + support).ceil().max(0.0) as usize).min(src_h - 1);

        for x in 0..src_w {
            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;
            for sy in top..=bottom {
                let w = bilinear_weight((sy as f32 - center) / scale.max(1.0));
                weight_sum += w;
                sum += src[sy * src_w + x] * w;
            }

            dst[y * src_w + x] = if weight_sum > 0.0 {
                sum / weight_sum
            } else {
                src[top.min(src_h - 1) * src_w + x]
            };
        }
    }

    dst
}

/// Resizes a plane, quantizing the result for `format`.
pub fn resize_plane(
    plane: &Plane,
    dst_w: u32,
    dst_h: u32,
    filter: Filter,
    format: &Format,
) -> OpsResult<Plane> {
    let data = resize_f32(
        &plane.to_f32(),
        plane.width() as usize,
        plane.height() as usize,
        dst_w as usize,
        dst_h as usize,
        filter,
    )?;
    Ok(Plane::from_f32(format, dst_w, dst_h, data)?)
}

/// Resizes every plane of a frame to a new luma size.
///
/// Chroma planes follow the format's subsampling.
///
/// # Errors
///
/// Returns [`OpsError::Geometry`] if the new size is zero or not divisible by
/// the chroma subsampling.
pub fn resize_frame(frame: &Frame, dst_w: u32, dst_h: u32, filter: Filter) -> OpsResult<Frame> {
    let format = frame.format();
    format
        .check_frame_size(dst_w, dst_h)
        .map_err(|e| OpsError::Geometry(e.to_string()))?;
    trace!(
        src_w = frame.width(),
        src_h = frame.height(),
        dst_w,
        dst_h,
        ?filter,
        "resize::frame"
    );

    let planes = frame
        .planes()
        .iter()
        .enumerate()
        .map(|(i, plane)| {
            let (w, h) = format.plane_dimensions(i, dst_w, dst_h);
            resize_plane(plane, w, h, filter, &format)
        })
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, dst_w, dst_h, planes)?)
}

/// Converts a frame to another chroma subsampling of the same sample type.
///
/// Luma is carried over untouched; chroma planes are resampled with
/// `filter`.
pub fn convert_subsampling(frame: &Frame, target: Format, filter: Filter) -> OpsResult<Frame> {
    let format = frame.format();
    if format.to_yuv444() != target.to_yuv444() || format.color_family() != target.color_family() {
        return Err(OpsError::Format(format!(
            "cannot convert {} to {} by resampling chroma",
            format, target
        )));
    }
    if format == target {
        return Ok(frame.clone());
    }
    target
        .check_frame_size(frame.width(), frame.height())
        .map_err(|e| OpsError::Geometry(e.to_string()))?;

    let planes = frame
        .planes()
        .iter()
        .enumerate()
        .map(|(i, plane)| {
            if i == 0 {
                return Ok(plane.clone());
            }
            let (w, h) = target.plane_dimensions(i, frame.width(), frame.height());
            resize_plane(plane, w, h, filter, &target)
        })
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(target, frame.width(), frame.height(), planes)?)
}
