//! Fitting a grain clip to a target clip.
//!
//! [`fit_grain`] makes an arbitrary grain sequence spatially and temporally
//! congruent with a target:
//!
//! 1. Scale by `size` (bilinear), independent of the target size
//! 2. Tile edge to edge until the target is covered, `ceil(W / w)` times
//! 3. Center-crop to the target size
//! 4. Optionally blur inside a 4x bilinear up/down round trip
//! 5. Loop and splice to the target frame count
//!
//! Steps 1-4 only touch the unique grain frames. Looping shares them.
//! Subsampled grain is point-upsampled to 4:4:4 for steps 1-4 and brought
//! back to its own subsampling afterwards, so odd scaled sizes and odd crop
//! offsets never split a chroma sample.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, ClipInfo, Format, Frame};
//! use grain_ops::geometry::fit_grain;
//!
//! let grain = Clip::repeat(Frame::filled(Format::YUV444P8, 40, 30, 128.0).unwrap(), 10).unwrap();
//! let target = ClipInfo { format: Format::YUV444P8, width: 100, height: 50, num_frames: 25 };
//! let fitted = fit_grain(&grain, &target, 1.0, 0).unwrap();
//! assert_eq!((fitted.width(), fitted.height(), fitted.num_frames()), (100, 50, 25));
//! ```

use crate::filter::box_blur_frame;
use crate::resize::{convert_subsampling, resize_frame, Filter};
use crate::source::map_indices;
use crate::transform::{crop_frame, stack_horizontal, stack_vertical};
use crate::{OpsError, OpsResult};
use grain_core::{Clip, ClipInfo, Frame};
use tracing::{debug, trace};

/// Upsampling factor of the blur round trip.
const BLUR_SCALE: u32 = 4;

/// Box blur passes per axis.
const BLUR_PASSES: usize = 2;

/// Tile counts and crop offsets for one grain/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainGeometry {
    /// Grain width after scaling.
    pub scaled_width: u32,
    /// Grain height after scaling.
    pub scaled_height: u32,
    /// Copies placed side by side.
    pub tiles_h: u32,
    /// Copies placed top to bottom.
    pub tiles_v: u32,
    /// Columns removed on the left.
    pub crop_left: u32,
    /// Columns removed on the right.
    pub crop_right: u32,
    /// Rows removed at the top.
    pub crop_top: u32,
    /// Rows removed at the bottom.
    pub crop_bottom: u32,
}

/// Number of tiles of `grain_extent` needed to cover `target_extent`.
///
/// # Errors
///
/// Returns [`OpsError::Geometry`] if either extent is zero.
pub fn tile_count(target_extent: u32, grain_extent: u32) -> OpsResult<u32> {
    if target_extent == 0 || grain_extent == 0 {
        return Err(OpsError::Geometry(format!(
            "cannot tile {} samples of grain over {}",
            grain_extent, target_extent
        )));
    }
    Ok(target_extent.div_ceil(grain_extent))
}

/// Center-crop offsets taking `tiled_extent` down to `target_extent`.
///
/// Returns `(before, after)`; an odd difference puts the extra sample after.
pub fn center_crop(tiled_extent: u32, target_extent: u32) -> OpsResult<(u32, u32)> {
    if tiled_extent < target_extent {
        return Err(OpsError::Geometry(format!(
            "tiled extent {} is smaller than target {}",
            tiled_extent, target_extent
        )));
    }
    let excess = tiled_extent - target_extent;
    let before = excess / 2;
    Ok((before, excess - before))
}

/// Truncated `extent * size`, rejecting results that vanish.
fn scaled_extent(extent: u32, size: f64) -> OpsResult<u32> {
    if !size.is_finite() || size <= 0.0 {
        return Err(OpsError::Geometry(format!("grain size must be > 0, got {}", size)));
    }
    let scaled = (extent as f64 * size).trunc();
    if scaled < 1.0 || scaled > u32::MAX as f64 {
        return Err(OpsError::Geometry(format!(
            "grain extent {} scaled by {} gives {}",
            extent, size, scaled
        )));
    }
    Ok(scaled as u32)
}

impl GrainGeometry {
    /// Plans scale, tiling and crop of a `grain_w x grain_h` grain for a
    /// `target_w x target_h` target.
    pub fn compute(
        grain_w: u32,
        grain_h: u32,
        target_w: u32,
        target_h: u32,
        size: f64,
    ) -> OpsResult<Self> {
        let scaled_width = scaled_extent(grain_w, size)?;
        let scaled_height = scaled_extent(grain_h, size)?;
        let tiles_h = tile_count(target_w, scaled_width)?;
        let tiles_v = tile_count(target_h, scaled_height)?;
        let (crop_left, crop_right) = center_crop(scaled_width * tiles_h, target_w)?;
        let (crop_top, crop_bottom) = center_crop(scaled_height * tiles_v, target_h)?;
        Ok(Self {
            scaled_width,
            scaled_height,
            tiles_h,
            tiles_v,
            crop_left,
            crop_right,
            crop_top,
            crop_bottom,
        })
    }

    /// Width of the tiled grain before cropping.
    pub fn tiled_width(&self) -> u32 {
        self.scaled_width * self.tiles_h
    }

    /// Height of the tiled grain before cropping.
    pub fn tiled_height(&self) -> u32 {
        self.scaled_height * self.tiles_v
    }

    fn needs_crop(&self) -> bool {
        self.crop_left + self.crop_right + self.crop_top + self.crop_bottom > 0
    }
}

/// Softens a frame by a 4x bilinear round trip with a box blur of radius
/// `strength - 1` in between.
///
/// Strength 0 returns the frame untouched. Strength 1 still resamples.
pub fn blur_frame(frame: &Frame, strength: u32) -> OpsResult<Frame> {
    if strength == 0 {
        return Ok(frame.clone());
    }
    let (w, h) = frame.dimensions();
    let big_w = w
        .checked_mul(BLUR_SCALE)
        .ok_or_else(|| OpsError::Geometry("blur upsample overflows".into()))?;
    let big_h = h
        .checked_mul(BLUR_SCALE)
        .ok_or_else(|| OpsError::Geometry("blur upsample overflows".into()))?;

    let mut big = resize_frame(frame, big_w, big_h, Filter::Bilinear)?;
    if strength > 1 {
        big = box_blur_frame(&big, (strength - 1) as usize, BLUR_PASSES)?;
    }
    resize_frame(&big, w, h, Filter::Bilinear)
}

/// Scales, tiles, crops and blurs one grain frame.
///
/// The result has the frame's own format at the target size.
pub fn fit_frame(frame: &Frame, geometry: &GrainGeometry, blur_strength: u32) -> OpsResult<Frame> {
    let format = frame.format();
    let full;
    let work = if format.is_subsampled() {
        full = convert_subsampling(frame, format.with_subsampling(0, 0), Filter::Point)?;
        &full
    } else {
        frame
    };

    let mut out = resize_frame(
        work,
        geometry.scaled_width,
        geometry.scaled_height,
        Filter::Bilinear,
    )?;
    if geometry.tiles_h > 1 {
        out = {
            let row = vec![&out; geometry.tiles_h as usize];
            stack_horizontal(&row)?
        };
    }
    if geometry.tiles_v > 1 {
        out = {
            let column = vec![&out; geometry.tiles_v as usize];
            stack_vertical(&column)?
        };
    }
    if geometry.needs_crop() {
        out = crop_frame(
            &out,
            geometry.crop_left,
            geometry.crop_top,
            geometry.crop_right,
            geometry.crop_bottom,
        )?;
    }
    out = blur_frame(&out, blur_strength)?;

    if format.is_subsampled() {
        out = convert_subsampling(&out, format, Filter::Point)?;
    }
    Ok(out)
}

/// Loops and splices `clip` to exactly `target_frames` frames.
///
/// The clip is played `target_frames / len` whole times and the first
/// `target_frames % len` frames are appended. A target shorter than the clip
/// keeps only its first `target_frames` frames.
pub fn loop_to_length(clip: &Clip, target_frames: usize) -> OpsResult<Clip> {
    if target_frames == 0 {
        return Err(OpsError::Geometry("target has no frames".into()));
    }
    let len = clip.num_frames();
    let loops = target_frames / len;
    let remaining = target_frames - loops * len;
    trace!(len, target_frames, loops, remaining, "geometry::loop_to_length");

    if loops == 0 {
        return Ok(clip.slice(0..target_frames)?);
    }
    let looped = clip.looped(loops)?;
    if remaining == 0 {
        return Ok(looped);
    }
    let head = clip.slice(0..remaining)?;
    Ok(Clip::splice(&[&looped, &head])?)
}

/// Resizes, tiles, crops, blurs and loops `grain` to match `target`.
///
/// # Arguments
///
/// * `grain` - Pre-rendered grain clip
/// * `target` - Size and length to match
/// * `size` - Scale applied to the grain before tiling
/// * `blur_strength` - 0 disables the blur round trip
///
/// # Errors
///
/// Returns [`OpsError::Geometry`] for zero extents, a vanishing scale, or a
/// target size the grain's subsampling cannot represent.
pub fn fit_grain(grain: &Clip, target: &ClipInfo, size: f64, blur_strength: u32) -> OpsResult<Clip> {
    if target.width == 0 || target.height == 0 || target.num_frames == 0 {
        return Err(OpsError::Geometry(format!(
            "target {}x{} with {} frames is empty",
            target.width, target.height, target.num_frames
        )));
    }
    let geometry = GrainGeometry::compute(
        grain.width(),
        grain.height(),
        target.width,
        target.height,
        size,
    )?;
    debug!(
        grain_w = grain.width(),
        grain_h = grain.height(),
        grain_frames = grain.num_frames(),
        ?geometry,
        blur_strength,
        "geometry::fit_grain"
    );

    // Only frames that survive the temporal trim need spatial work.
    let unique = grain.num_frames().min(target.num_frames);
    let frames = map_indices(unique, |n| {
        fit_frame(grain.frame(n)?, &geometry, blur_strength)
    })?;
    let fitted = Clip::from_frames(frames)?;
    loop_to_length(&fitted, target.num_frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::Format;
    use std::sync::Arc;

    fn numbered(format: Format, w: u32, h: u32, n: usize) -> Clip {
        let frames = (0..n)
            .map(|i| Frame::filled(format, w, h, i as f32).unwrap())
            .collect();
        Clip::from_frames(frames).unwrap()
    }

    #[test]
    fn test_tile_count() {
        assert_eq!(tile_count(100, 40).unwrap(), 3);
        assert_eq!(tile_count(100, 100).unwrap(), 1);
        assert_eq!(tile_count(100, 400).unwrap(), 1);
        assert!(matches!(tile_count(100, 0), Err(OpsError::Geometry(_))));
    }

    #[test]
    fn test_center_crop() {
        assert_eq!(center_crop(120, 100).unwrap(), (10, 10));
        assert_eq!(center_crop(121, 100).unwrap(), (10, 11));
        assert_eq!(center_crop(100, 100).unwrap(), (0, 0));
        assert!(center_crop(90, 100).is_err());
    }

    #[test]
    fn test_geometry_compute() {
        let g = GrainGeometry::compute(80, 60, 100, 50, 0.5).unwrap();
        assert_eq!((g.scaled_width, g.scaled_height), (40, 30));
        assert_eq!((g.tiles_h, g.tiles_v), (3, 2));
        assert_eq!((g.tiled_width(), g.tiled_height()), (120, 60));
        assert_eq!((g.crop_left, g.crop_right), (10, 10));
        assert_eq!((g.crop_top, g.crop_bottom), (5, 5));
    }

    #[test]
    fn test_geometry_rejects_vanishing_scale() {
        assert!(GrainGeometry::compute(10, 10, 100, 100, 0.05).is_err());
        assert!(GrainGeometry::compute(10, 10, 100, 100, 0.0).is_err());
        assert!(GrainGeometry::compute(10, 10, 100, 100, f64::NAN).is_err());
    }

    #[test]
    fn test_loop_to_length() {
        let grain = numbered(Format::GRAY8, 2, 2, 10);
        let out = loop_to_length(&grain, 25).unwrap();
        assert_eq!(out.num_frames(), 25);
        for n in 0..25 {
            assert!(Arc::ptr_eq(out.frame(n).unwrap(), grain.frame(n % 10).unwrap()));
        }
    }

    #[test]
    fn test_loop_to_length_exact_and_short() {
        let grain = numbered(Format::GRAY8, 2, 2, 10);
        assert_eq!(loop_to_length(&grain, 20).unwrap().num_frames(), 20);
        let short = loop_to_length(&grain, 3).unwrap();
        assert_eq!(short.num_frames(), 3);
        assert_eq!(short.frame(2).unwrap().plane(0).sample(0, 0), 2.0);
        assert!(loop_to_length(&grain, 0).is_err());
    }

    #[test]
    fn test_fit_grain_shape() {
        let grain = numbered(Format::YUV444P8, 40, 30, 10);
        let target = ClipInfo {
            format: Format::YUV444P8,
            width: 100,
            height: 50,
            num_frames: 25,
        };
        let out = fit_grain(&grain, &target, 1.0, 0).unwrap();
        assert_eq!(out.info(), target);
        // constant frames survive tiling and cropping unchanged
        assert_eq!(out.frame(13).unwrap().plane(2).sample(99, 49), 3.0);
    }

    #[test]
    fn test_fit_grain_tiles_pattern() {
        // 4x1 ramp tiled over 10 columns: 0 1 2 3 | 0 1 2 3 | 0 1 2 3, crop 1/1
        let ramp = grain_core::Plane::from_f32(&Format::GRAY8, 4, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let frame = Frame::new(Format::GRAY8, 4, 1, vec![ramp]).unwrap();
        let grain = Clip::repeat(frame, 1).unwrap();
        let target = ClipInfo {
            format: Format::GRAY8,
            width: 10,
            height: 1,
            num_frames: 1,
        };
        let out = fit_grain(&grain, &target, 1.0, 0).unwrap();
        let row: Vec<f32> = (0..10).map(|x| out.frame(0).unwrap().plane(0).sample(x, 0)).collect();
        assert_eq!(row, vec![1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_fit_grain_blur_keeps_shape_and_flat_level() {
        let grain = numbered(Format::YUV420P8, 16, 8, 2);
        let target = ClipInfo {
            format: Format::YUV420P8,
            width: 16,
            height: 8,
            num_frames: 3,
        };
        for strength in [1, 3] {
            let out = fit_grain(&grain, &target, 1.0, strength).unwrap();
            assert_eq!(out.info(), target);
            assert_eq!(out.frame(1).unwrap().plane(0).sample(7, 3), 1.0);
        }
    }

    #[test]
    fn test_fit_grain_odd_crop_on_subsampled() {
        // 34 wide tiled 3x over 100 leaves a crop of 1/1
        let grain = numbered(Format::YUV420P8, 34, 16, 2);
        let target = ClipInfo {
            format: Format::YUV420P8,
            width: 100,
            height: 16,
            num_frames: 5,
        };
        let g = GrainGeometry::compute(34, 16, 100, 16, 1.0).unwrap();
        assert_eq!((g.crop_left, g.crop_right), (1, 1));

        let out = fit_grain(&grain, &target, 1.0, 0).unwrap();
        assert_eq!(out.info(), target);
        assert_eq!(out.frame(3).unwrap().plane(1).dimensions(), (50, 8));
        assert_eq!(out.frame(3).unwrap().plane(2).sample(49, 7), 1.0);
    }

    #[test]
    fn test_fit_grain_odd_scaled_size_on_subsampled() {
        // 96x54 at 0.33 scales to 31x17
        let grain = numbered(Format::YUV420P8, 96, 54, 1);
        let target = ClipInfo {
            format: Format::YUV420P8,
            width: 64,
            height: 36,
            num_frames: 2,
        };
        let g = GrainGeometry::compute(96, 54, 64, 36, 0.33).unwrap();
        assert_eq!((g.scaled_width, g.scaled_height), (31, 17));

        for blur in [0, 2] {
            let out = fit_grain(&grain, &target, 0.33, blur).unwrap();
            assert_eq!(out.info(), target);
        }
    }

    #[test]
    fn test_fit_frame_subsampled_ramp_keeps_columns() {
        // chroma ramp 0..4 on a 4:2:2 grain survives an odd crop column-wise
        let format = Format::YUV422P10;
        let luma = grain_core::Plane::filled(&format, 10, 2, 0.0);
        let ramp: Vec<f32> = (0..2).flat_map(|_| (0..5).map(|v| v as f32 * 100.0)).collect();
        let chroma = grain_core::Plane::from_f32(&format, 5, 2, ramp).unwrap();
        let frame = Frame::new(format, 10, 2, vec![luma, chroma.clone(), chroma]).unwrap();

        // 10 wide tiled 2x over 18 leaves a crop of 1/1
        let g = GrainGeometry::compute(10, 2, 18, 2, 1.0).unwrap();
        let out = fit_frame(&frame, &g, 0).unwrap();
        assert_eq!(out.format(), format);
        assert_eq!(out.plane(1).dimensions(), (9, 2));
        // 4:4:4 row after the crop is 0 100 100 200 200 .. and each output
        // chroma sample takes the right-hand column of its pair
        let row: Vec<f32> = (0..9).map(|x| out.plane(1).sample(x, 1)).collect();
        assert_eq!(row, vec![100.0, 200.0, 300.0, 400.0, 0.0, 100.0, 200.0, 300.0, 400.0]);
    }
}
