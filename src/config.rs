use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::math::Rgb;
use crate::vr::VrSettings;

/// Viewer settings; every field falls back to its default when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub background: Rgb,
    pub default_part_color: Rgb,
    pub vr_target_fps: f32,
    /// Degrees per second about the vertical axis
    pub vr_rotation_speed: f32,
    pub status_capacity: usize,
    pub top_level_parts: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            default_part_color: Rgb::SENTINEL,
            vr_target_fps: 90.0,
            vr_rotation_speed: 0.0,
            status_capacity: 64,
            top_level_parts: 3,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid viewer config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json_str(&text).with_context(|| format!("In config file {:?}", path))
    }

    pub fn vr_settings(&self) -> VrSettings {
        VrSettings {
            target_fps: self.vr_target_fps,
            rotation_speed: self.vr_rotation_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ViewerConfig::from_json_str(r#"{ "vr_target_fps": 30.0 }"#).unwrap();
        assert_eq!(config.vr_target_fps, 30.0);
        assert_eq!(config.top_level_parts, 3);
        assert_eq!(config.default_part_color, Rgb::SENTINEL);
    }

    #[test]
    fn test_colour_fields_parse() {
        let config =
            ViewerConfig::from_json_str(r#"{ "background": { "r": 0, "g": 0, "b": 0 } }"#).unwrap();
        assert_eq!(config.background, Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(ViewerConfig::from_json_str("{ \"status_capacity\": -1 }").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ViewerConfig::from_json_file("/definitely/not/here.json").is_err());
    }
}
