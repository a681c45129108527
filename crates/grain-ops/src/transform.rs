//! Spatial edits on frames: crop and stacking.
//!
//! # Operations
//!
//! - [`crop`] - Extract a region from one plane of samples
//! - [`crop_frame`] - Remove borders from every plane of a frame
//! - [`stack_horizontal`] / [`stack_vertical`] - Place frames edge to edge
//!
//! Crop offsets on subsampled frames must be multiples of the subsampling
//! factor so chroma stays aligned with luma.
//!
//! # Example
//!
//! ```rust
//! use grain_ops::transform::crop;
//!
//! let src = vec![0.5f32; 64 * 64];
//! let cropped = crop(&src, 64, 64, 16, 16, 32, 32).unwrap();
//! assert_eq!(cropped.len(), 32 * 32);
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Frame, Plane, PlaneSamples};

/// Crops a region from one plane of samples.
///
/// # Arguments
///
/// * `src` - Source samples
/// * `src_w`, `src_h` - Source dimensions
/// * `x`, `y` - Crop origin (top-left)
/// * `w`, `h` - Crop dimensions
pub fn crop<T: Copy>(
    src: &[T],
    src_w: usize,
    src_h: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> OpsResult<Vec<T>> {
    // Validate bounds
    if w == 0 || h == 0 || x + w > src_w || y + h > src_h {
        return Err(OpsError::Geometry(format!(
            "crop region {}x{} at ({},{}) exceeds {}x{}",
            w, h, x, y, src_w, src_h
        )));
    }

    let mut dst = Vec::with_capacity(w * h);
    for row in y..(y + h) {
        let start = row * src_w + x;
        dst.extend_from_slice(&src[start..start + w]);
    }

    Ok(dst)
}

fn crop_samples(
    samples: &PlaneSamples,
    src_w: usize,
    src_h: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
) -> OpsResult<PlaneSamples> {
    Ok(match samples {
        PlaneSamples::U8(v) => PlaneSamples::U8(crop(v, src_w, src_h, x, y, w, h)?),
        PlaneSamples::U16(v) => PlaneSamples::U16(crop(v, src_w, src_h, x, y, w, h)?),
        PlaneSamples::F32(v) => PlaneSamples::F32(crop(v, src_w, src_h, x, y, w, h)?),
    })
}

/// Removes `left`, `top`, `right`, `bottom` samples of border from a frame.
///
/// Samples are copied without conversion.
///
/// # Errors
///
/// Returns [`OpsError::Geometry`] if nothing would remain or an offset is
/// not a multiple of the chroma subsampling.
pub fn crop_frame(frame: &Frame, left: u32, top: u32, right: u32, bottom: u32) -> OpsResult<Frame> {
    let format = frame.format();
    let (width, height) = frame.dimensions();
    if left + right >= width || top + bottom >= height {
        return Err(OpsError::Geometry(format!(
            "crop {}/{}/{}/{} leaves nothing of {}x{}",
            left, top, right, bottom, width, height
        )));
    }
    let mod_w = 1 << format.subsampling_w();
    let mod_h = 1 << format.subsampling_h();
    if left % mod_w != 0 || right % mod_w != 0 || top % mod_h != 0 || bottom % mod_h != 0 {
        return Err(OpsError::Geometry(format!(
            "crop {}/{}/{}/{} is not aligned to {} subsampling",
            left, top, right, bottom, format
        )));
    }

    let new_w = width - left - right;
    let new_h = height - top - bottom;
    let planes = frame
        .planes()
        .iter()
        .enumerate()
        .map(|(i, plane)| {
            let (shift_w, shift_h) = if i == 0 {
                (0, 0)
            } else {
                (format.subsampling_w(), format.subsampling_h())
            };
            let samples = crop_samples(
                plane.samples(),
                plane.width() as usize,
                plane.height() as usize,
                (left >> shift_w) as usize,
                (top >> shift_h) as usize,
                (new_w >> shift_w) as usize,
                (new_h >> shift_h) as usize,
            )?;
            Ok(Plane::new(new_w >> shift_w, new_h >> shift_h, samples)?)
        })
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, new_w, new_h, planes)?)
}

fn check_stackable(frames: &[&Frame]) -> OpsResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| OpsError::Geometry("nothing to stack".into()))?;
    if frames.iter().any(|f| f.format() != first.format()) {
        return Err(OpsError::Format("stacked frames must share a format".into()));
    }
    Ok(())
}

fn concat_rows<T: Copy>(parts: &[(&[T], usize)], height: usize) -> Vec<T> {
    let total: usize = parts.iter().map(|(_, w)| w).sum();
    let mut dst = Vec::with_capacity(total * height);
    for y in 0..height {
        for (src, w) in parts {
            dst.extend_from_slice(&src[y * w..(y + 1) * w]);
        }
    }
    dst
}

fn pick_u8(s: &PlaneSamples) -> Option<&[u8]> {
    match s {
        PlaneSamples::U8(v) => Some(v.as_slice()),
        _ => None,
    }
}

fn pick_u16(s: &PlaneSamples) -> Option<&[u16]> {
    match s {
        PlaneSamples::U16(v) => Some(v.as_slice()),
        _ => None,
    }
}

fn pick_f32(s: &PlaneSamples) -> Option<&[f32]> {
    match s {
        PlaneSamples::F32(v) => Some(v.as_slice()),
        _ => None,
    }
}

/// Borrows plane `index` of every frame as a typed slice with its width.
fn collect_parts<'a, T>(
    frames: &[&'a Frame],
    index: usize,
    pick: fn(&PlaneSamples) -> Option<&[T]>,
) -> OpsResult<Vec<(&'a [T], usize)>> {
    frames
        .iter()
        .map(|f| {
            let plane = f.plane(index);
            pick(plane.samples())
                .map(|s| (s, plane.width() as usize))
                .ok_or_else(|| OpsError::Format("mixed sample storage in stack".into()))
        })
        .collect()
}

fn join<T: Copy>(
    frames: &[&Frame],
    index: usize,
    pick: fn(&PlaneSamples) -> Option<&[T]>,
    horizontal: bool,
    plane_height: usize,
) -> OpsResult<Vec<T>> {
    let parts = collect_parts(frames, index, pick)?;
    Ok(if horizontal {
        concat_rows(&parts, plane_height)
    } else {
        parts.iter().flat_map(|(s, _)| s.iter().copied()).collect()
    })
}

fn stack(frames: &[&Frame], width: u32, height: u32, horizontal: bool) -> OpsResult<Frame> {
    let format = frames[0].format();
    let planes = (0..format.num_planes())
        .map(|i| {
            let (pw, ph) = format.plane_dimensions(i, width, height);
            let ph_us = ph as usize;
            let samples = match frames[0].plane(i).samples() {
                PlaneSamples::U8(_) => PlaneSamples::U8(join(frames, i, pick_u8, horizontal, ph_us)?),
                PlaneSamples::U16(_) => PlaneSamples::U16(join(frames, i, pick_u16, horizontal, ph_us)?),
                PlaneSamples::F32(_) => PlaneSamples::F32(join(frames, i, pick_f32, horizontal, ph_us)?),
            };
            Ok(Plane::new(pw, ph, samples)?)
        })
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, width, height, planes)?)
}

/// Places frames side by side, left to right.
///
/// All frames must share format and height.
pub fn stack_horizontal(frames: &[&Frame]) -> OpsResult<Frame> {
    check_stackable(frames)?;
    let height = frames[0].height();
    if frames.iter().any(|f| f.height() != height) {
        return Err(OpsError::SizeMismatch(
            "horizontally stacked frames must share a height".into(),
        ));
    }
    let width: u32 = frames.iter().map(|f| f.width()).sum();
    stack(frames, width, height, true)
}

/// Places frames on top of each other, top to bottom.
///
/// All frames must share format and width.
pub fn stack_vertical(frames: &[&Frame]) -> OpsResult<Frame> {
    check_stackable(frames)?;
    let width = frames[0].width();
    if frames.iter().any(|f| f.width() != width) {
        return Err(OpsError::SizeMismatch(
            "vertically stacked frames must share a width".into(),
        ));
    }
    let height: u32 = frames.iter().map(|f| f.height()).sum();
    stack(frames, width, height, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::Format;

    fn gradient(fmt: Format, w: u32, h: u32) -> Frame {
        let planes = (0..fmt.num_planes())
            .map(|i| {
                let (pw, ph) = fmt.plane_dimensions(i, w, h);
                let data = (0..pw * ph).map(|v| (v % 200) as f32).collect();
                Plane::from_f32(&fmt, pw, ph, data).unwrap()
            })
            .collect();
        Frame::new(fmt, w, h, planes).unwrap()
    }

    #[test]
    fn test_crop() {
        // 4x4 gradient
        let src: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let cropped = crop(&src, 4, 4, 1, 1, 2, 2).unwrap();
        assert_eq!(cropped, vec![5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let src = vec![0.0f32; 4 * 4];
        assert!(crop(&src, 4, 4, 3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_crop_frame_asymmetric() {
        let frame = gradient(Format::YUV444P8, 121, 10);
        let out = crop_frame(&frame, 10, 0, 11, 0).unwrap();
        assert_eq!(out.dimensions(), (100, 10));
        assert_eq!(out.plane(0).sample(0, 0), frame.plane(0).sample(10, 0));
        assert_eq!(out.plane(2).sample(99, 9), frame.plane(2).sample(109, 9));
    }

    #[test]
    fn test_crop_frame_subsampled() {
        let frame = gradient(Format::YUV420P8, 16, 8);
        let out = crop_frame(&frame, 2, 2, 4, 0).unwrap();
        assert_eq!(out.dimensions(), (10, 6));
        assert_eq!(out.plane(1).dimensions(), (5, 3));
        assert_eq!(out.plane(1).sample(0, 0), frame.plane(1).sample(1, 1));

        // odd offset would split a chroma sample
        assert!(matches!(
            crop_frame(&frame, 1, 0, 1, 0),
            Err(OpsError::Geometry(_))
        ));
    }

    #[test]
    fn test_stack_horizontal() {
        let a = Frame::filled_planes(Format::YUV420P8, 4, 2, &[1.0, 2.0, 3.0]).unwrap();
        let b = Frame::filled_planes(Format::YUV420P8, 2, 2, &[7.0, 8.0, 9.0]).unwrap();
        let out = stack_horizontal(&[&a, &b, &a]).unwrap();
        assert_eq!(out.dimensions(), (10, 2));
        assert_eq!(out.plane(1).dimensions(), (5, 1));
        assert_eq!(out.plane(0).sample(3, 1), 1.0);
        assert_eq!(out.plane(0).sample(4, 1), 7.0);
        assert_eq!(out.plane(0).sample(6, 0), 1.0);
        assert_eq!(out.plane(2).sample(2, 0), 9.0);
    }

    #[test]
    fn test_stack_vertical() {
        let a = Frame::filled(Format::GRAYS, 3, 1, 0.25).unwrap();
        let b = Frame::filled(Format::GRAYS, 3, 2, 0.75).unwrap();
        let out = stack_vertical(&[&a, &b]).unwrap();
        assert_eq!(out.dimensions(), (3, 3));
        assert_eq!(out.plane(0).sample(2, 0), 0.25);
        assert_eq!(out.plane(0).sample(0, 2), 0.75);
    }

    #[test]
    fn test_stack_mismatch() {
        let a = Frame::filled(Format::GRAY8, 3, 1, 0.0).unwrap();
        let b = Frame::filled(Format::GRAY8, 3, 2, 0.0).unwrap();
        assert!(stack_horizontal(&[&a, &b]).is_err());
        assert!(stack_vertical(&[]).is_err());
    }
}
