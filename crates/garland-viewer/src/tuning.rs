//! Viewer tuning file: window and post-processing parameters
//!
//! Everything is optional in the TOML; missing fields fall back to the
//! defaults below. Particle counts are compile-time constants and are
//! deliberately not tunable here.

use anyhow::{Context, Result};
use garland_render::PostProcessConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerTuning {
    pub window_width: u32,
    pub window_height: u32,
    pub exposure: f32,
    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
}

impl Default for ViewerTuning {
    fn default() -> Self {
        let post = PostProcessConfig::default();
        Self {
            window_width: 1280,
            window_height: 720,
            exposure: post.exposure,
            bloom_intensity: post.bloom_intensity,
            bloom_threshold: post.bloom_threshold,
        }
    }
}

impl ViewerTuning {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tuning file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse tuning file: {}", path.display()))
    }

    pub fn post_config(&self) -> PostProcessConfig {
        PostProcessConfig {
            exposure: self.exposure,
            bloom_intensity: self.bloom_intensity,
            bloom_threshold: self.bloom_threshold,
            ..PostProcessConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let tuning: ViewerTuning = toml::from_str("").unwrap();
        let defaults = ViewerTuning::default();
        assert_eq!(tuning.window_width, defaults.window_width);
        assert_eq!(tuning.exposure, defaults.exposure);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let tuning: ViewerTuning = toml::from_str("exposure = 1.4\nwindow_width = 1920").unwrap();
        assert_eq!(tuning.window_width, 1920);
        assert_eq!(tuning.exposure, 1.4);
        assert_eq!(tuning.window_height, ViewerTuning::default().window_height);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(toml::from_str::<ViewerTuning>("particle_count = 99").is_err());
    }

    #[test]
    fn post_config_carries_tuning() {
        let tuning: ViewerTuning = toml::from_str("bloom_intensity = 0.3").unwrap();
        let config = tuning.post_config();
        assert_eq!(config.bloom_intensity, 0.3);
    }
}
