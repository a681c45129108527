//! Raw planar clip files.
//!
//! Frames are stored back to back with their planes in order (Y, U, V or
//! just Y for gray). 8-bit samples are single bytes, 9 to 16-bit samples
//! are little-endian `u16`, float samples are little-endian `f32`. There is
//! no header: format and size come from the command line.

use anyhow::{bail, Context, Result};
use grain_core::{Clip, Format, Frame, Plane, PlaneSamples, Storage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Bytes taken by one frame of `format` at `width x height`.
pub fn frame_size(format: &Format, width: u32, height: u32) -> usize {
    let bytes = format.storage().bytes_per_sample();
    (0..format.num_planes())
        .map(|i| {
            let (pw, ph) = format.plane_dimensions(i, width, height);
            pw as usize * ph as usize * bytes
        })
        .sum()
}

fn decode_plane(bytes: &[u8], storage: Storage, width: u32, height: u32) -> Result<Plane> {
    let samples = match storage {
        Storage::U8 => PlaneSamples::U8(bytes.to_vec()),
        Storage::U16 => PlaneSamples::U16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        ),
        Storage::F32 => PlaneSamples::F32(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
    };
    Ok(Plane::new(width, height, samples)?)
}

/// Splits raw bytes into a clip.
pub fn decode_clip(bytes: &[u8], format: Format, width: u32, height: u32) -> Result<Clip> {
    format.check_frame_size(width, height)?;
    let size = frame_size(&format, width, height);
    if bytes.is_empty() {
        bail!("no frames in input");
    }
    if bytes.len() % size != 0 {
        bail!(
            "{} bytes is not a whole number of {}x{} {} frames ({} bytes each)",
            bytes.len(),
            width,
            height,
            format,
            size
        );
    }

    let bytes_per_sample = format.storage().bytes_per_sample();
    let frames = bytes
        .chunks_exact(size)
        .map(|chunk| {
            let mut offset = 0;
            let mut planes = Vec::with_capacity(format.num_planes());
            for i in 0..format.num_planes() {
                let (pw, ph) = format.plane_dimensions(i, width, height);
                let len = pw as usize * ph as usize * bytes_per_sample;
                planes.push(decode_plane(&chunk[offset..offset + len], format.storage(), pw, ph)?);
                offset += len;
            }
            Ok(Frame::new(format, width, height, planes)?)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Clip::from_frames(frames)?)
}

/// Reads a raw planar clip.
pub fn read_clip(path: &Path, format: Format, width: u32, height: u32) -> Result<Clip> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let clip = decode_clip(&bytes, format, width, height)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    debug!(
        path = %path.display(),
        frames = clip.num_frames(),
        %format,
        width,
        height,
        "io::read_clip"
    );
    Ok(clip)
}

fn encode_plane<W: Write>(out: &mut W, plane: &Plane) -> std::io::Result<()> {
    match plane.samples() {
        PlaneSamples::U8(v) => out.write_all(v),
        PlaneSamples::U16(v) => v.iter().try_for_each(|s| out.write_all(&s.to_le_bytes())),
        PlaneSamples::F32(v) => v.iter().try_for_each(|s| out.write_all(&s.to_le_bytes())),
    }
}

/// Writes every frame of `clip` to `out`.
pub fn encode_clip<W: Write>(out: &mut W, clip: &Clip) -> std::io::Result<()> {
    for frame in clip.frames() {
        for plane in frame.planes() {
            encode_plane(out, plane)?;
        }
    }
    Ok(())
}

/// Writes a raw planar clip.
pub fn write_clip(path: &Path, clip: &Clip) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    encode_clip(&mut out, clip)
        .and_then(|_| out.flush())
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    debug!(path = %path.display(), frames = clip.num_frames(), "io::write_clip");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_clip(format: Format) -> Clip {
        let frames = (0..3)
            .map(|n| {
                let planes = (0..format.num_planes())
                    .map(|i| {
                        let (pw, ph) = format.plane_dimensions(i, 8, 4);
                        let data = (0..pw * ph).map(|v| ((v + n * 5 + i as u32) % 250) as f32).collect();
                        Plane::from_f32(&format, pw, ph, data).unwrap()
                    })
                    .collect();
                Frame::new(format, 8, 4, planes).unwrap()
            })
            .collect();
        Clip::from_frames(frames).unwrap()
    }

    #[test]
    fn test_frame_size() {
        assert_eq!(frame_size(&Format::YUV420P8, 8, 4), 32 + 8 + 8);
        assert_eq!(frame_size(&Format::YUV420P10, 8, 4), 2 * 48);
        assert_eq!(frame_size(&Format::GRAYS, 8, 4), 4 * 32);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        for format in [Format::YUV420P8, Format::YUV422P10, Format::YUV444PS, Format::GRAY16] {
            let clip = sample_clip(format);
            let path = dir.path().join(format!("{}.raw", format));
            write_clip(&path, &clip).unwrap();
            assert_eq!(
                std::fs::metadata(&path).unwrap().len() as usize,
                3 * frame_size(&format, 8, 4)
            );
            let back = read_clip(&path, format, 8, 4).unwrap();
            assert_eq!(back.num_frames(), 3);
            for (a, b) in clip.frames().iter().zip(back.frames()) {
                assert_eq!(**a, **b);
            }
        }
    }

    #[test]
    fn test_u16_little_endian() {
        let bytes = [0x34, 0x12, 0xff, 0x03];
        let clip = decode_clip(&bytes, Format::GRAY16, 2, 1).unwrap();
        let plane = clip.frame(0).unwrap().plane(0);
        assert_eq!(plane.sample(0, 0), 0x1234 as f32);
        assert_eq!(plane.sample(1, 0), 1023.0);
    }

    #[test]
    fn test_partial_frame_rejected() {
        let bytes = vec![0u8; frame_size(&Format::YUV420P8, 8, 4) + 1];
        assert!(decode_clip(&bytes, Format::YUV420P8, 8, 4).is_err());
        assert!(decode_clip(&[], Format::YUV420P8, 8, 4).is_err());
        // odd width for 4:2:0
        assert!(decode_clip(&[0u8; 64], Format::YUV420P8, 7, 4).is_err());
    }
}
