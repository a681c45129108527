//! YAML parameter presets.
//!
//! ```yaml
//! overlay:
//!   size: 0.5
//!   mode: softlight
//!   blur_strength: 2
//!   opacity: 0.6
//! synth:
//!   iterations: 400
//!   radius: 0.08
//! ```
//!
//! Missing sections and fields keep their defaults. Command-line flags win
//! over preset values.

use anyhow::{Context, Result};
use grain_ops::{GrainParams, OverlayParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters loaded from a preset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preset {
    /// Pre-rendered grain path.
    pub overlay: OverlayParams,
    /// Synthetic grain path.
    pub synth: GrainParams,
}

impl Preset {
    /// Parses a preset from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Invalid preset")
    }

    /// Loads a preset file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Failed to parse preset: {}", path.display()))
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map(Self::load).unwrap_or_else(|| Ok(Self::default()))
    }
}

/// Replaces `target` with `value` when a flag was given.
pub fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_ops::BlendMode;

    #[test]
    fn test_partial_preset() {
        let preset = Preset::from_yaml(
            "overlay:\n  mode: softlight\n  opacity: 0.6\nsynth:\n  iterations: 400\n",
        )
        .unwrap();
        assert_eq!(preset.overlay.mode, BlendMode::SoftLight);
        assert_eq!(preset.overlay.opacity, 0.6);
        assert_eq!(preset.overlay.size, 1.0);
        assert_eq!(preset.synth.iterations, 400);
        assert_eq!(preset.synth.radius, 0.1);
    }

    #[test]
    fn test_empty_preset_is_default() {
        assert_eq!(Preset::from_yaml("{}").unwrap(), Preset::default());
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Preset::from_yaml("overlay:\n  mode: sparkle\n").is_err());
        assert!(Preset::from_yaml("colour: red\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip_and_load() {
        let mut preset = Preset::default();
        preset.overlay.blur_strength = 3;
        preset.synth.sigma = 0.0;
        let text = serde_yaml::to_string(&preset).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.yaml");
        std::fs::write(&path, text).unwrap();
        assert_eq!(Preset::load(&path).unwrap(), preset);
        assert!(Preset::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_apply() {
        let mut v = 1.0f32;
        apply(&mut v, None);
        assert_eq!(v, 1.0);
        apply(&mut v, Some(0.5));
        assert_eq!(v, 0.5);
    }
}
