//! Synth command: add generated grain to luma.

use crate::preset::apply;
use crate::SynthArgs;
use anyhow::{Context, Result};
use grain_ops::{synthesize, GrainParams, HashNoise};
use tracing::info;

pub fn run(args: SynthArgs, mut params: GrainParams, verbose: u8) -> Result<()> {
    apply(&mut params.iterations, args.iterations);
    apply(&mut params.radius, args.radius);
    apply(&mut params.deviation, args.deviation);
    apply(&mut params.sigma, args.sigma);
    apply(&mut params.opacity, args.opacity);

    let clip = super::load_clip(&args.input, &args.layout)?;
    if verbose > 0 {
        println!(
            "Synthesizing grain for {} ({} {}x{}, {} frames)",
            args.input.display(),
            clip.format(),
            clip.width(),
            clip.height(),
            clip.num_frames()
        );
    }
    info!(?params, "synth");

    let out = synthesize(&clip, HashNoise, &params).context("Grain synthesis failed")?;
    super::save_clip(&args.output, &out)?;

    if verbose > 0 {
        println!("Wrote {} frames to {}", out.num_frames(), args.output.display());
    }
    Ok(())
}
