//! Lazy frame sequences.
//!
//! A [`FrameSource`] reports its [`ClipInfo`] up front and produces frame `n`
//! only when asked. Stages such as [`Overlay`](crate::overlay::Overlay) and
//! [`Synthesizer`](crate::synth::Synthesizer) validate their inputs when they
//! are built and do per-sample work in [`FrameSource::frame`], so frames can
//! be pulled in any order, from any thread, or not at all.
//!
//! [`render`] materializes a source into a [`Clip`], evaluating frames in
//! parallel when the `parallel` feature is enabled.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, Format, Frame};
//! use grain_ops::source::{render, FrameSource};
//!
//! let clip = Clip::repeat(Frame::filled(Format::GRAY8, 4, 4, 16.0).unwrap(), 3).unwrap();
//! assert_eq!(clip.info().num_frames, 3);
//! let copy = render(&clip).unwrap();
//! assert_eq!(copy.num_frames(), 3);
//! ```

use crate::{OpsError, OpsResult};
use grain_core::{Clip, ClipInfo, Frame};
use std::sync::Arc;
use tracing::{debug, trace};

/// A frame sequence that produces frames on demand.
///
/// Implementations must be pure: asking for the same index twice yields the
/// same frame.
pub trait FrameSource: Sync {
    /// Format, size and length of the sequence.
    fn info(&self) -> ClipInfo;

    /// Produces frame `index`.
    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>>;

    /// Number of frames.
    fn num_frames(&self) -> usize {
        self.info().num_frames
    }
}

impl FrameSource for Clip {
    fn info(&self) -> ClipInfo {
        Clip::info(self)
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        Ok(Arc::clone(Clip::frame(self, index)?))
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    fn info(&self) -> ClipInfo {
        (**self).info()
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        (**self).frame(index)
    }
}

impl<S: FrameSource + Send + ?Sized> FrameSource for Arc<S> {
    fn info(&self) -> ClipInfo {
        (**self).info()
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        (**self).frame(index)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn info(&self) -> ClipInfo {
        (**self).info()
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        (**self).frame(index)
    }
}

/// Rejects an index past the end of `source`.
pub(crate) fn check_index(info: &ClipInfo, index: usize) -> OpsResult<()> {
    if index >= info.num_frames {
        return Err(OpsError::Core(grain_core::Error::FrameOutOfRange {
            index,
            len: info.num_frames,
        }));
    }
    Ok(())
}

/// Runs `f` for every index, in parallel when the `parallel` feature is on.
pub(crate) fn map_indices<T, F>(count: usize, f: F) -> OpsResult<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> OpsResult<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        crate::parallel::map_indices(count, f)
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

/// Evaluates every frame of `source` and collects them into a [`Clip`].
pub fn render<S: FrameSource + ?Sized>(source: &S) -> OpsResult<Clip> {
    let info = source.info();
    debug!(
        format = %info.format,
        width = info.width,
        height = info.height,
        frames = info.num_frames,
        "source::render"
    );
    let frames = map_indices(info.num_frames, |n| source.frame(n))?;
    Ok(Clip::from_shared(frames)?)
}

/// Iterates the frames of `source` in index order, producing each lazily.
pub fn frames<S: FrameSource + ?Sized>(source: &S) -> Frames<'_, S> {
    Frames {
        source,
        next: 0,
        len: source.num_frames(),
    }
}

/// Iterator returned by [`frames`].
pub struct Frames<'a, S: ?Sized> {
    source: &'a S,
    next: usize,
    len: usize,
}

impl<S: FrameSource + ?Sized> Iterator for Frames<'_, S> {
    type Item = OpsResult<Arc<Frame>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let n = self.next;
        self.next += 1;
        trace!(index = n, "source::frames");
        Some(self.source.frame(n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.len - self.next;
        (rest, Some(rest))
    }
}

impl<S: FrameSource + ?Sized> ExactSizeIterator for Frames<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_core::Format;

    fn counting_clip(n: usize) -> Clip {
        let frames = (0..n)
            .map(|i| Frame::filled(Format::GRAY8, 2, 2, i as f32).unwrap())
            .collect();
        Clip::from_frames(frames).unwrap()
    }

    #[test]
    fn test_clip_source() {
        let clip = counting_clip(4);
        let src: &dyn FrameSource = &clip;
        assert_eq!(src.num_frames(), 4);
        assert_eq!(src.frame(3).unwrap().plane(0).sample(0, 0), 3.0);
        assert!(src.frame(4).is_err());
    }

    #[test]
    fn test_render_preserves_order_and_shares() {
        let clip = counting_clip(16);
        let out = render(&clip).unwrap();
        for (a, b) in clip.frames().iter().zip(out.frames()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn test_frames_iterator() {
        let clip = counting_clip(5);
        let it = frames(&clip);
        assert_eq!(it.len(), 5);
        let values: Vec<f32> = it.map(|f| f.unwrap().plane(0).sample(1, 1)).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_check_index() {
        let info = counting_clip(2).info();
        assert!(check_index(&info, 1).is_ok());
        assert!(check_index(&info, 2).is_err());
    }
}
