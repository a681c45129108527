//! Format info command.
//!
//! Prints the blend constants of a format and, given a frame size, its
//! plane layout and raw frame size.

use crate::io::frame_size;
use crate::InfoArgs;
use anyhow::{bail, Result};
use grain_core::{Format, SampleLevels};

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let format = args.format;
    let levels = SampleLevels::from_format(&format);

    println!("{}", format);
    println!("  Sample type: {:?}", format.sample_type());
    println!("  Bits:        {}", format.bits_per_sample());
    println!("  Planes:      {}", format.num_planes());
    println!(
        "  Subsampling: {}x{}",
        format.subsampling_w(),
        format.subsampling_h()
    );
    println!("  Neutral:     {}", levels.neutral);
    println!("  Peak:        {}", levels.peak);
    println!("  Factor:      {}", levels.factor);

    match (args.width, args.height) {
        (Some(width), Some(height)) => print_layout(&format, width, height, verbose)?,
        (None, None) => {}
        _ => bail!("--width and --height must be given together"),
    }
    Ok(())
}

fn print_layout(format: &Format, width: u32, height: u32, verbose: u8) -> Result<()> {
    format.check_frame_size(width, height)?;
    for i in 0..format.num_planes() {
        let (pw, ph) = format.plane_dimensions(i, width, height);
        println!("  Plane {}:     {}x{}", i, pw, ph);
    }
    let bytes = frame_size(format, width, height) as u64;
    println!("  Frame size:  {}", super::format_size(bytes));
    if verbose > 0 {
        println!("  Frame bytes: {}", bytes);
    }
    Ok(())
}
