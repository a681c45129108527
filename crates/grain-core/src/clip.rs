//! Finite frame sequences.
//!
//! A [`Clip`] is an ordered, non-empty list of frames sharing one format and
//! size. Frames are held behind [`Arc`], so the temporal edits here
//! ([`Clip::slice`], [`Clip::looped`], [`Clip::splice`]) never copy sample
//! data and never touch the clip they were derived from.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, Format, Frame};
//!
//! let frames = (0..10)
//!     .map(|i| Frame::filled(Format::GRAY8, 4, 4, i as f32).unwrap())
//!     .collect();
//! let grain = Clip::from_frames(frames).unwrap();
//!
//! // two full loops plus the first five frames
//! let looped = grain.looped(2).unwrap();
//! let head = grain.slice(0..5).unwrap();
//! let target = Clip::splice(&[&looped, &head]).unwrap();
//! assert_eq!(target.num_frames(), 25);
//! ```

use crate::{Error, Format, Frame, Result};
use std::ops::Range;
use std::sync::Arc;

/// Size, format and length of a frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipInfo {
    /// Sample format of every frame.
    pub format: Format,
    /// Luma width.
    pub width: u32,
    /// Luma height.
    pub height: u32,
    /// Number of frames.
    pub num_frames: usize,
}

impl ClipInfo {
    /// Whether two sequences agree in format and frame size.
    pub fn same_layout(&self, other: &ClipInfo) -> bool {
        self.format == other.format && self.width == other.width && self.height == other.height
    }
}

/// An owned sequence of frames.
#[derive(Debug, Clone)]
pub struct Clip {
    format: Format,
    width: u32,
    height: u32,
    frames: Vec<Arc<Frame>>,
}

impl Clip {
    /// Builds a clip from owned frames.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        Self::from_shared(frames.into_iter().map(Arc::new).collect())
    }

    /// Builds a clip from shared frames.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyClip`] if `frames` is empty
    /// - [`Error::ClipMismatch`] if frames differ in format or size
    pub fn from_shared(frames: Vec<Arc<Frame>>) -> Result<Self> {
        let first = frames.first().ok_or(Error::EmptyClip)?;
        let (format, width, height) = (first.format(), first.width(), first.height());
        for (i, frame) in frames.iter().enumerate().skip(1) {
            if frame.format() != format || frame.dimensions() != (width, height) {
                return Err(Error::ClipMismatch(format!(
                    "frame {} is {} {}x{}, expected {} {}x{}",
                    i,
                    frame.format(),
                    frame.width(),
                    frame.height(),
                    format,
                    width,
                    height
                )));
            }
        }
        Ok(Self {
            format,
            width,
            height,
            frames,
        })
    }

    /// A clip showing the same frame `count` times.
    pub fn repeat(frame: Frame, count: usize) -> Result<Self> {
        let frame = Arc::new(frame);
        Self::from_shared(vec![frame; count])
    }

    /// Format of every frame.
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

    /// Number of frames (always at least one).
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Summary of this clip.
    #[inline]
    pub fn info(&self) -> ClipInfo {
        ClipInfo {
            format: self.format,
            width: self.width,
            height: self.height,
            num_frames: self.frames.len(),
        }
    }

    /// Frame `index`.
    pub fn frame(&self, index: usize) -> Result<&Arc<Frame>> {
        self.frames.get(index).ok_or(Error::FrameOutOfRange {
            index,
            len: self.frames.len(),
        })
    }

    /// All frames in order.
    #[inline]
    pub fn frames(&self) -> &[Arc<Frame>] {
        &self.frames
    }

    /// Frames `range.start..range.end`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameOutOfRange`] if the range ends past the clip and
    /// [`Error::EmptyClip`] if it selects nothing.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.end > self.frames.len() {
            return Err(Error::FrameOutOfRange {
                index: range.end.saturating_sub(1),
                len: self.frames.len(),
            });
        }
        if range.start >= range.end {
            return Err(Error::EmptyClip);
        }
        Ok(Self {
            format: self.format,
            width: self.width,
            height: self.height,
            frames: self.frames[range].to_vec(),
        })
    }

    /// The clip played `times` times back to back.
    ///
    /// `times == 0` is rejected: a looped clip must have frames.
    pub fn looped(&self, times: usize) -> Result<Self> {
        if times == 0 {
            return Err(Error::EmptyClip);
        }
        let mut frames = Vec::with_capacity(self.frames.len() * times);
        for _ in 0..times {
            frames.extend(self.frames.iter().cloned());
        }
        Ok(Self {
            format: self.format,
            width: self.width,
            height: self.height,
            frames,
        })
    }

    /// Concatenates clips of identical format and size.
    pub fn splice(clips: &[&Clip]) -> Result<Self> {
        let first = clips.first().ok_or(Error::EmptyClip)?;
        let mut frames = Vec::with_capacity(clips.iter().map(|c| c.num_frames()).sum());
        for clip in clips {
            if !clip.info().same_layout(&first.info()) {
                return Err(Error::ClipMismatch(format!(
                    "cannot splice {} {}x{} onto {} {}x{}",
                    clip.format, clip.width, clip.height, first.format, first.width, first.height
                )));
            }
            frames.extend(clip.frames.iter().cloned());
        }
        Ok(Self {
            format: first.format,
            width: first.width,
            height: first.height,
            frames,
        })
    }
}
