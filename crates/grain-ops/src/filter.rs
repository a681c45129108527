//! Separable box blur.
//!
//! A box blur of radius `r` averages `2r + 1` samples along one axis;
//! repeating it (`passes`) approaches a Gaussian. Samples beyond the plane
//! edge repeat the edge sample.
//!
//! # Example
//!
//! ```rust
//! use grain_ops::filter::box_blur;
//!
//! let src = vec![0.5f32; 16 * 16];
//! let blurred = box_blur(&src, 16, 16, 2, 2).unwrap();
//! assert!(blurred.iter().all(|v| (v - 0.5).abs() < 1e-5));
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Format, Frame, Plane};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Blurs a plane of `f32` samples with a box of `radius`, `passes` times per
/// axis.
///
/// A radius or pass count of zero returns the input unchanged.
pub fn box_blur(
    src: &[f32],
    width: usize,
    height: usize,
    radius: usize,
    passes: usize,
) -> OpsResult<Vec<f32>> {
    if width == 0 || height == 0 {
        return Err(OpsError::Geometry(
            "width and height must be > 0".into(),
        ));
    }
    let expected = width.checked_mul(height).ok_or_else(|| {
        OpsError::Geometry("image dimensions overflow".into())
    })?;
    if src.len() != expected {
        return Err(OpsError::SizeMismatch(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    radius
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| OpsError::InvalidParameter("radius too large, causes overflow".into()))?;

    let mut data = src.to_vec();
    if radius == 0 || passes == 0 {
        return Ok(data);
    }
    for _ in 0..passes {
        data = blur_horizontal(&data, width, height, radius);
    }
    for _ in 0..passes {
        data = blur_vertical(&data, width, height, radius);
    }
    Ok(data)
}

/// Sliding-window pass along rows.
fn blur_horizontal(src: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let inv_size = 1.0 / (2 * radius + 1) as f32;
    let mut dst = vec![0.0f32; width * height];

    for (y, row) in dst.chunks_exact_mut(width).enumerate() {
        let line = &src[y * width..(y + 1) * width];
        // Initialize window centered on x = 0, left side clamped to the edge
        let mut sum = line[0] * radius as f32;
        for kx in 0..=radius {
            sum += line[kx.min(width - 1)];
        }

        for x in 0..width {
            row[x] = sum * inv_size;

            let left = x.saturating_sub(radius);
            let right = (x + radius + 1).min(width - 1);
            sum -= line[left];
            sum += line[right];
        }
    }

    dst
}

/// Sliding-window pass along columns.
fn blur_vertical(src: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let inv_size = 1.0 / (2 * radius + 1) as f32;
    let mut dst = vec![0.0f32; width * height];
    let at = |x: usize, y: usize| src[y * width + x];

    for x in 0..width {
        let mut sum = at(x, 0) * radius as f32;
        for ky in 0..=radius {
            sum += at(x, ky.min(height - 1));
        }

        for y in 0..height {
            dst[y * width + x] = sum * inv_size;

            let top = y.saturating_sub(radius);
            let bottom = (y + radius + 1).min(height - 1);
            sum -= at(x, top);
            sum += at(x, bottom);
        }
    }

    dst
}

/// Box-blurs one plane, quantizing the result for `format`.
pub fn box_blur_plane(plane: &Plane, radius: usize, passes: usize, format: &Format) -> OpsResult<Plane> {
    let data = box_blur(
        &plane.to_f32(),
        plane.width() as usize,
        plane.height() as usize,
        radius,
        passes,
    )?;
    Ok(Plane::from_f32(format, plane.width(), plane.height(), data)?)
}

/// Box-blurs every plane of a frame.
pub fn box_blur_frame(frame: &Frame, radius: usize, passes: usize) -> OpsResult<Frame> {
    trace!(radius, passes, "filter::box_blur_frame");
    let format = frame.format();
    let planes = frame
        .planes()
        .iter()
        .map(|p| box_blur_plane(p, radius, passes, &format))
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, frame.width(), frame.height(), planes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_blur_impulse() {
        // single bright sample in the middle of a 5x1 row
        let src = vec![0.0, 0.0, 3.0, 0.0, 0.0];
        let out = box_blur(&src, 5, 1, 1, 1).unwrap();
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(out[3], 1.0, epsilon = 1e-6);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box_blur_edges_clamp() {
        let src = vec![3.0, 0.0, 0.0];
        let out = box_blur(&src, 3, 1, 1, 1).unwrap();
        // left window is [3, 3, 0]
        assert_relative_eq!(out[0], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box_blur_preserves_mean_of_constant() {
        let src = vec![7.0f32; 9 * 7];
        let out = box_blur(&src, 9, 7, 3, 2).unwrap();
        assert!(out.iter().all(|v| (v - 7.0).abs() < 1e-4));
    }

    #[test]
    fn test_box_blur_radius_zero_is_identity() {
        let src: Vec<f32> = (0..12).map(|v| v as f32).collect();
        assert_eq!(box_blur(&src, 4, 3, 0, 2).unwrap(), src);
    }

    #[test]
    fn test_box_blur_vertical() {
        let src = vec![0.0, 0.0, 3.0, 0.0, 0.0]; // 1x5 column
        let out = box_blur(&src, 1, 5, 1, 1).unwrap();
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(out[4], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_box_blur_size_mismatch() {
        assert!(box_blur(&[0.0; 5], 2, 2, 1, 1).is_err());
        assert!(box_blur(&[], 0, 2, 1, 1).is_err());
    }
}
