//! Per-frame grain synthesis on luma.
//!
//! [`Synthesizer`] isolates plane 0 of a `GRAYS` or `YUV444PS` clip, asks a
//! [`GrainGenerator`] for a grained luma plane per frame, merges it over the
//! original luma at `opacity` and puts the untouched chroma planes back.
//!
//! Frame `n` of a clip with luma width `w` is generated with seed `n * w`,
//! so a frame's grain depends only on its index and resolution. Frames can
//! be produced in any order or in parallel.
//!
//! # Example
//!
//! ```rust
//! use grain_core::{Clip, Format, Frame};
//! use grain_ops::noise::HashNoise;
//! use grain_ops::synth::{synthesize, GrainParams};
//!
//! let clip = Clip::repeat(Frame::filled(Format::YUV444PS, 16, 16, 0.5).unwrap(), 3).unwrap();
//! let grained = synthesize(&clip, &HashNoise, &GrainParams::default()).unwrap();
//! assert_eq!(grained.num_frames(), 3);
//! // chroma is carried over
//! assert_eq!(grained.frame(1).unwrap().plane(2), clip.frame(1).unwrap().plane(2));
//! ```

use crate::merge::{check_weight, merge_plane};
use crate::source::{check_index, render, FrameSource};
use crate::{OpsError, OpsResult};
use grain_core::{Clip, ClipInfo, Format, Frame, Plane, Storage};
use std::sync::Arc;
use tracing::{debug, trace};

/// Statistical parameters handed to the grain generator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrainParams {
    /// Generator iterations.
    pub iterations: u32,
    /// Mean grain radius.
    pub radius: f32,
    /// Standard deviation of the grain radius.
    pub deviation: f32,
    /// Blur applied by the generator.
    pub sigma: f32,
    /// Opacity of the grained luma over the original.
    pub opacity: f32,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            iterations: 800,
            radius: 0.1,
            deviation: 0.0,
            sigma: 0.8,
            opacity: 1.0,
        }
    }
}

impl GrainParams {
    /// Checks parameter ranges.
    pub fn validate(&self) -> OpsResult<()> {
        if self.iterations == 0 {
            return Err(OpsError::InvalidParameter("iterations must be > 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "radius must be > 0, got {}",
                self.radius
            )));
        }
        if !self.deviation.is_finite() || self.deviation < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "deviation must be >= 0, got {}",
                self.deviation
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "sigma must be >= 0, got {}",
                self.sigma
            )));
        }
        check_weight("opacity", self.opacity)
    }
}

/// Renders grain for one luma plane.
///
/// `generate` must be deterministic in `(source, seed, params)` and return a
/// float plane the size of `source`. Implementations that only produce
/// noise may ignore `source`.
pub trait GrainGenerator: Send + Sync {
    /// Produces the grained version of `source`.
    fn generate(&self, source: &Plane, seed: u64, params: &GrainParams) -> OpsResult<Plane>;
}

impl<G: GrainGenerator + ?Sized> GrainGenerator for &G {
    fn generate(&self, source: &Plane, seed: u64, params: &GrainParams) -> OpsResult<Plane> {
        (**self).generate(source, seed, params)
    }
}

impl<G: GrainGenerator + ?Sized> GrainGenerator for Box<G> {
    fn generate(&self, source: &Plane, seed: u64, params: &GrainParams) -> OpsResult<Plane> {
        (**self).generate(source, seed, params)
    }
}

impl<G: GrainGenerator + ?Sized> GrainGenerator for Arc<G> {
    fn generate(&self, source: &Plane, seed: u64, params: &GrainParams) -> OpsResult<Plane> {
        (**self).generate(source, seed, params)
    }
}

/// Seed for frame `index` of a clip whose luma is `luma_width` wide.
pub fn frame_seed(index: usize, luma_width: u32) -> u64 {
    index as u64 * luma_width as u64
}

/// Lazy grain synthesis over a frame source.
pub struct Synthesizer<S, G> {
    source: S,
    generator: G,
    params: GrainParams,
    info: ClipInfo,
}

impl<S: FrameSource, G: GrainGenerator> Synthesizer<S, G> {
    /// Validates the source format and parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Format`] unless the source is `GRAYS` or
    /// `YUV444PS`, and [`OpsError::InvalidParameter`] for out-of-range
    /// parameters.
    pub fn new(source: S, generator: G, params: GrainParams) -> OpsResult<Self> {
        let info = source.info();
        if info.format != Format::GRAYS && info.format != Format::YUV444PS {
            return Err(OpsError::Format(format!(
                "grain synthesis needs GRAYS or YUV444PS, got {}",
                info.format
            )));
        }
        params.validate()?;
        debug!(format = %info.format, frames = info.num_frames, ?params, "synth::new");
        Ok(Self {
            source,
            generator,
            params,
            info,
        })
    }

    /// Parameters in use.
    pub fn params(&self) -> &GrainParams {
        &self.params
    }

    fn grain_luma(&self, luma: &Plane, index: usize) -> OpsResult<Plane> {
        let seed = frame_seed(index, self.info.width);
        trace!(index, seed, "synth::generate");
        let grained = self.generator.generate(luma, seed, &self.params)?;
        if grained.dimensions() != luma.dimensions() {
            return Err(OpsError::Generator(format!(
                "expected a {}x{} plane, got {}x{}",
                luma.width(),
                luma.height(),
                grained.width(),
                grained.height()
            )));
        }
        if grained.samples().storage() != Storage::F32 {
            return Err(OpsError::Generator(format!(
                "expected f32 samples, got {}",
                grained.samples().storage().name()
            )));
        }
        merge_plane(luma, &grained, self.params.opacity, &Format::GRAYS)
    }
}

impl<S: FrameSource, G: GrainGenerator> FrameSource for Synthesizer<S, G> {
    fn info(&self) -> ClipInfo {
        self.info
    }

    fn frame(&self, index: usize) -> OpsResult<Arc<Frame>> {
        check_index(&self.info, index)?;
        let frame = self.source.frame(index)?;
        let luma = self.grain_luma(frame.plane(0), index)?;

        let mut planes = Vec::with_capacity(frame.num_planes());
        planes.push(luma);
        planes.extend(frame.planes()[1..].iter().cloned());
        Ok(Arc::new(Frame::new(
            frame.format(),
            frame.width(),
            frame.height(),
            planes,
        )?))
    }
}

/// Adds generated grain to every frame of `clip` and renders the result.
pub fn synthesize<G: GrainGenerator>(clip: &Clip, generator: G, params: &GrainParams) -> OpsResult<Clip> {
    let stage = Synthesizer::new(clip, generator, *params)?;
    render(&stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Writes the seed into every sample and records calls.
    struct SeedProbe {
        calls: AtomicUsize,
        seeds: Mutex<Vec<u64>>,
    }

    impl SeedProbe {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seeds: Mutex::new(Vec::new()),
            }
        }
    }

    impl GrainGenerator for SeedProbe {
        fn generate(&self, source: &Plane, seed: u64, _: &GrainParams) -> OpsResult<Plane> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seeds.lock().unwrap().push(seed);
            Ok(Plane::filled(&Format::GRAYS, source.width(), source.height(), seed as f32))
        }
    }

    struct WrongSize;

    impl GrainGenerator for WrongSize {
        fn generate(&self, _: &Plane, _: u64, _: &GrainParams) -> OpsResult<Plane> {
            Ok(Plane::filled(&Format::GRAYS, 1, 1, 0.0))
        }
    }

    fn yuv_clip(n: usize) -> Clip {
        let frames = (0..n)
            .map(|i| Frame::filled_planes(Format::YUV444PS, 8, 4, &[0.5, 0.25 + i as f32, 0.75]).unwrap())
            .collect();
        Clip::from_frames(frames).unwrap()
    }

    #[test]
    fn test_params_default() {
        let p = GrainParams::default();
        assert_eq!(p.iterations, 800);
        assert_eq!(p.radius, 0.1);
        assert_eq!(p.deviation, 0.0);
        assert_eq!(p.sigma, 0.8);
        assert_eq!(p.opacity, 1.0);
        assert!(p.validate().is_ok());
        assert!(GrainParams { iterations: 0, ..p }.validate().is_err());
        assert!(GrainParams { radius: -1.0, ..p }.validate().is_err());
        assert!(GrainParams { opacity: 1.5, ..p }.validate().is_err());
    }

    #[test]
    fn test_seed_rule() {
        assert_eq!(frame_seed(0, 1920), 0);
        assert_eq!(frame_seed(7, 1920), 13440);
    }

    #[test]
    fn test_rejects_formats() {
        for format in [Format::YUV420P8, Format::YUV444P16, Format::GRAY8, Format::GRAY16] {
            let clip = Clip::repeat(Frame::filled(format, 4, 4, 0.0).unwrap(), 1).unwrap();
            assert!(matches!(
                Synthesizer::new(&clip, SeedProbe::new(), GrainParams::default()),
                Err(OpsError::Format(_))
            ));
        }
    }

    #[test]
    fn test_luma_seeded_chroma_kept() {
        let clip = yuv_clip(4);
        let probe = SeedProbe::new();
        let out = synthesize(&clip, &probe, &GrainParams::default()).unwrap();

        assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
        let mut seeds = probe.seeds.lock().unwrap().clone();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![0, 8, 16, 24]);

        for n in 0..4 {
            let frame = out.frame(n).unwrap();
            assert_eq!(frame.plane(0).sample(5, 3), (n * 8) as f32);
            assert_eq!(frame.plane(1), clip.frame(n).unwrap().plane(1));
            assert_eq!(frame.plane(2), clip.frame(n).unwrap().plane(2));
        }
    }

    #[test]
    fn test_opacity_merge() {
        let clip = Clip::repeat(Frame::filled(Format::GRAYS, 4, 2, 0.5).unwrap(), 2).unwrap();
        let params = GrainParams {
            opacity: 0.25,
            ..GrainParams::default()
        };
        let out = synthesize(&clip, SeedProbe::new(), &params).unwrap();
        // frame 1 seed is 4: 0.5 * 0.75 + 4 * 0.25
        assert!((out.frame(1).unwrap().plane(0).sample(0, 0) - 1.375).abs() < 1e-6);
    }

    #[test]
    fn test_generator_size_checked() {
        let clip = yuv_clip(1);
        assert!(matches!(
            synthesize(&clip, WrongSize, &GrainParams::default()),
            Err(OpsError::Generator(_))
        ));
    }
}
