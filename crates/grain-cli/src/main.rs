//! grain - Film-grain compositing CLI
//!
//! Blends pre-rendered grain onto raw planar video, or adds synthetic grain
//! to its luma.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use grain_core::Format;
use grain_ops::BlendMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod io;
mod preset;

#[derive(Parser)]
#[command(name = "grain")]
#[command(author, version, about = "Film-grain compositing for raw planar video")]
#[command(long_about = "
Composites film grain onto raw planar video.

Inputs and outputs are headerless planar files: frames back to back, planes
in order, 8-bit as bytes, 9-16 bit as little-endian u16, float as
little-endian f32.

Examples:
  grain overlay clip.yuv grain.yuv -o out.yuv -f yuv420p8 -w 1920 -H 1080
  grain overlay clip.yuv grain.yuv -o out.yuv -f yuv420p10 -w 1920 -H 1080 \\
        --grain-width 1024 --grain-height 576 --mode softlight --size 0.5
  grain synth clip.raw -o out.raw -f yuv444ps -w 1280 -H 720 --opacity 0.7
  grain --config film.yaml overlay clip.yuv grain.yuv -o out.yuv -f yuv420p8 -w 720 -H 480
  grain info -f yuv420p10 -w 1920 -H 1080
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML preset with overlay and synth parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a pre-rendered grain clip to the input and blend it on
    #[command(visible_alias = "o")]
    Overlay(OverlayArgs),

    /// Add generated grain to the luma of a GRAYS or YUV444PS clip
    #[command(visible_alias = "s")]
    Synth(SynthArgs),

    /// Show sample levels and plane layout of a format
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Layout of a raw input file.
#[derive(Args, Clone)]
struct RawLayout {
    /// Sample format, e.g. yuv420p8, yuv444ps, grays
    #[arg(short, long)]
    format: Format,

    /// Frame width
    #[arg(short, long)]
    width: u32,

    /// Frame height
    #[arg(short = 'H', long)]
    height: u32,
}

#[derive(Args)]
struct OverlayArgs {
    /// Input clip
    input: PathBuf,

    /// Grain clip (same format as the input)
    grain: PathBuf,

    /// Output clip
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    layout: RawLayout,

    /// Grain frame width (defaults to the input width)
    #[arg(long)]
    grain_width: Option<u32>,

    /// Grain frame height (defaults to the input height)
    #[arg(long)]
    grain_height: Option<u32>,

    /// Blend mode: normal, average, grainextract, grainmerge, hardlight,
    /// linearlight, overlay, softlight, vividlight
    #[arg(short, long)]
    mode: Option<BlendMode>,

    /// Opacity of the blended grain (0-1)
    #[arg(long)]
    opacity: Option<f32>,

    /// Grain scale before tiling
    #[arg(short, long)]
    size: Option<f64>,

    /// Blur strength (0 = off)
    #[arg(short, long)]
    blur: Option<u32>,
}

#[derive(Args)]
struct SynthArgs {
    /// Input clip (GRAYS or YUV444PS)
    input: PathBuf,

    /// Output clip
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    layout: RawLayout,

    /// Generator iterations
    #[arg(long)]
    iterations: Option<u32>,

    /// Mean grain radius
    #[arg(short, long)]
    radius: Option<f32>,

    /// Grain radius deviation
    #[arg(short, long)]
    deviation: Option<f32>,

    /// Generator blur sigma
    #[arg(long)]
    sigma: Option<f32>,

    /// Opacity of the grained luma (0-1)
    #[arg(long)]
    opacity: Option<f32>,
}

#[derive(Args)]
struct InfoArgs {
    /// Sample format
    #[arg(short, long)]
    format: Format,

    /// Frame width, to print plane sizes
    #[arg(short, long)]
    width: Option<u32>,

    /// Frame height, to print plane sizes
    #[arg(short = 'H', long)]
    height: Option<u32>,
}

/// Installs the log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let preset = preset::Preset::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Overlay(args) => commands::overlay::run(args, preset.overlay, cli.verbose),
        Commands::Synth(args) => commands::synth::run(args, preset.synth, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
