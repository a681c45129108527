//! Overlay command: fit pre-rendered grain and blend it onto a clip.

use crate::preset::apply;
use crate::{OverlayArgs, RawLayout};
use anyhow::{Context, Result};
use grain_ops::{composite_grain, OverlayParams};
use tracing::info;

pub fn run(args: OverlayArgs, mut params: OverlayParams, verbose: u8) -> Result<()> {
    apply(&mut params.mode, args.mode);
    apply(&mut params.opacity, args.opacity);
    apply(&mut params.size, args.size);
    apply(&mut params.blur_strength, args.blur);

    let clip = super::load_clip(&args.input, &args.layout)?;
    let grain_layout = RawLayout {
        format: args.layout.format,
        width: args.grain_width.unwrap_or(args.layout.width),
        height: args.grain_height.unwrap_or(args.layout.height),
    };
    let grain = super::load_clip(&args.grain, &grain_layout)?;

    if verbose > 0 {
        println!(
            "Overlaying {} ({}x{}, {} frames) on {} ({}x{}, {} frames), mode '{}', opacity {}",
            args.grain.display(),
            grain.width(),
            grain.height(),
            grain.num_frames(),
            args.input.display(),
            clip.width(),
            clip.height(),
            clip.num_frames(),
            params.mode,
            params.opacity
        );
    }
    info!(?params, "overlay");

    let out = composite_grain(&clip, &grain, &params).context("Grain overlay failed")?;
    super::save_clip(&args.output, &out)?;

    if verbose > 0 {
        println!("Wrote {} frames to {}", out.num_frames(), args.output.display());
    }
    Ok(())
}
