//! CLI command implementations

pub mod info;
pub mod overlay;
pub mod synth;

use crate::io;
use crate::RawLayout;
use anyhow::Result;
use grain_core::Clip;
use std::path::Path;

/// Load a raw clip with the given layout
pub fn load_clip(path: &Path, layout: &RawLayout) -> Result<Clip> {
    io::read_clip(path, layout.format, layout.width, layout.height)
}

/// Save a clip as raw planar data
pub fn save_clip(path: &Path, clip: &Clip) -> Result<()> {
    io::write_clip(path, clip)
}

/// Format byte counts for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
