//! Opacity merge of two frames.
//!
//! `result = a * (1 - weight) + b * weight`, per sample and per plane.
//! A weight of exactly 0 or 1 returns the corresponding operand untouched.
//! Integer results round half up, like a fixed-point `(.. + half) >> shift`
//! merge, then clamp to the format's range.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Format, Frame};
//! use grain_ops::merge::merge_frames;
//!
//! let a = Frame::filled(Format::GRAYS, 2, 2, 0.2).unwrap();
//! let b = Frame::filled(Format::GRAYS, 2, 2, 0.6).unwrap();
//! let m = merge_frames(&a, &b, 0.5).unwrap();
//! assert!((m.plane(0).sample(0, 0) - 0.4).abs() < 1e-6);
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Format, Frame, Plane};

/// Checks that a weight lies in `[0, 1]`.
pub fn check_weight(name: &str, weight: f32) -> OpsResult<()> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(OpsError::InvalidParameter(format!(
            "{} must be in [0, 1], got {}",
            name, weight
        )));
    }
    Ok(())
}

/// Merges two planes of the same size.
pub fn merge_plane(a: &Plane, b: &Plane, weight: f32, format: &Format) -> OpsResult<Plane> {
    check_weight("merge weight", weight)?;
    if a.dimensions() != b.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "merge planes {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    if weight == 0.0 {
        return Ok(a.clone());
    }
    if weight == 1.0 {
        return Ok(b.clone());
    }

    let inv = 1.0 - weight;
    let round = !format.is_float();
    let out: Vec<f32> = a
        .to_f32()
        .into_iter()
        .zip(b.to_f32())
        .map(|(av, bv)| {
            let v = av * inv + bv * weight;
            if round { (v + 0.5).floor() } else { v }
        })
        .collect();
    Ok(Plane::from_f32(format, a.width(), a.height(), out)?)
}

/// Merges every plane of `b` over `a` at `weight`.
pub fn merge_frames(a: &Frame, b: &Frame, weight: f32) -> OpsResult<Frame> {
    if a.format() != b.format() {
        return Err(OpsError::Format(format!(
            "cannot merge {} with {}",
            a.format(),
            b.format()
        )));
    }
    let format = a.format();
    let planes = a
        .planes()
        .iter()
        .zip(b.planes())
        .map(|(ap, bp)| merge_plane(ap, bp, weight, &format))
        .collect::<OpsResult<Vec<_>>>()?;
    Ok(Frame::new(format, a.width(), a.height(), planes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_endpoints_are_exact() {
        let a = Plane::from_f32(&Format::GRAYS, 2, 1, vec![0.1, 0.7]).unwrap();
        let b = Plane::from_f32(&Format::GRAYS, 2, 1, vec![0.9, 0.3]).unwrap();
        assert_eq!(merge_plane(&a, &b, 0.0, &Format::GRAYS).unwrap(), a);
        assert_eq!(merge_plane(&a, &b, 1.0, &Format::GRAYS).unwrap(), b);
    }

    #[test]
    fn test_merge_integer_rounds_half_up() {
        let a = Plane::filled(&Format::GRAY8, 1, 1, 10.0);
        let b = Plane::filled(&Format::GRAY8, 1, 1, 11.0);
        // 10.5 rounds up, not to the even neighbour
        let out = merge_plane(&a, &b, 0.5, &Format::GRAY8).unwrap();
        assert_eq!(out.sample(0, 0), 11.0);

        let a = Plane::filled(&Format::GRAY16, 1, 1, 1000.0);
        let b = Plane::filled(&Format::GRAY16, 1, 1, 1003.0);
        let out = merge_plane(&a, &b, 0.5, &Format::GRAY16).unwrap();
        assert_eq!(out.sample(0, 0), 1002.0);
    }

    #[test]
    fn test_merge_float_not_rounded() {
        let a = Plane::filled(&Format::GRAYS, 1, 1, 10.0);
        let b = Plane::filled(&Format::GRAYS, 1, 1, 11.0);
        let out = merge_plane(&a, &b, 0.5, &Format::GRAYS).unwrap();
        assert_eq!(out.sample(0, 0), 10.5);
    }

    #[test]
    fn test_merge_weight_out_of_range() {
        let a = Plane::filled(&Format::GRAY8, 1, 1, 0.0);
        assert!(matches!(
            merge_plane(&a, &a, 1.5, &Format::GRAY8),
            Err(OpsError::InvalidParameter(_))
        ));
        assert!(merge_plane(&a, &a, f32::NAN, &Format::GRAY8).is_err());
    }

    #[test]
    fn test_merge_frames_subsampled() {
        let a = Frame::filled_planes(Format::YUV420P8, 4, 4, &[0.0, 100.0, 200.0]).unwrap();
        let b = Frame::filled_planes(Format::YUV420P8, 4, 4, &[100.0, 200.0, 0.0]).unwrap();
        let m = merge_frames(&a, &b, 0.25).unwrap();
        assert_eq!(m.plane(0).sample(0, 0), 25.0);
        assert_eq!(m.plane(1).sample(1, 1), 125.0);
        assert_eq!(m.plane(2).sample(1, 0), 150.0);
    }
}
