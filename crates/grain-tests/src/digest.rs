//! SHA-256 digests of rendered clips.
//!
//! Used to compare renders that must be bit-identical: the same clip
//! rendered twice, or rendered on pools of different sizes. Float samples
//! are hashed through their bit patterns, so `-0.0` and `0.0` differ.

use grain_core::{Clip, PlaneSamples};
use sha2::{Digest, Sha256};

/// Hex digest over format, size and every sample of `clip`.
pub fn clip_digest(clip: &Clip) -> String {
    let mut hasher = Sha256::new();
    hasher.update(clip.format().to_string().as_bytes());
    hasher.update(clip.width().to_le_bytes());
    hasher.update(clip.height().to_le_bytes());
    hasher.update((clip.num_frames() as u64).to_le_bytes());

    for frame in clip.frames() {
        for plane in frame.planes() {
            match plane.samples() {
                PlaneSamples::U8(v) => hasher.update(v),
                PlaneSamples::U16(v) => v.iter().for_each(|s| hasher.update(s.to_le_bytes())),
                PlaneSamples::F32(v) => v.iter().for_each(|s| hasher.update(s.to_bits().to_le_bytes())),
            }
        }
    }
    hex::encode(hasher.finalize())
}

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut s = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0xf) as usize] as char);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::{Format, Frame};

    #[test]
    fn test_digest_shape() {
        let clip = Clip::repeat(Frame::filled(Format::GRAY8, 2, 2, 1.0).unwrap(), 1).unwrap();
        let d = clip_digest(&clip);
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_sensitive_to_samples() {
        let a = Clip::repeat(Frame::filled(Format::GRAY8, 2, 2, 1.0).unwrap(), 1).unwrap();
        let b = Clip::repeat(Frame::filled(Format::GRAY8, 2, 2, 2.0).unwrap(), 1).unwrap();
        assert_ne!(clip_digest(&a), clip_digest(&b));
        assert_eq!(clip_digest(&a), clip_digest(&a.clone()));
    }
}
