//! Configuration loading and defaults

use crate::constants::{
    DEFAULT_COLOR, DEFAULT_FADE_RATE, DEFAULT_FRAME_RATE, DEFAULT_HEIGHT_FRACTION,
    DEFAULT_HOTKEY, PROGRAM_NAME,
};
use crate::input::{hotkey::keysym_from_name, Hotkeys};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub appearance: AppearanceConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub hotkey: HotkeyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Panel height as a fraction of the monitor height (0.0 - 1.0]
    #[serde(default = "default_height_fraction")]
    pub height_fraction: f32,

    /// Gradient base color as [r, g, b]
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Fade progress per second (0.5 = two second fade)
    #[serde(default = "default_fade_rate")]
    pub fade_rate: f32,

    /// Target frame rate
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key used with Alt (toggle) and Alt+Shift (quit)
    #[serde(default = "default_hotkey")]
    pub key: String,
}

// Default value functions
fn default_height_fraction() -> f32 {
    DEFAULT_HEIGHT_FRACTION
}
fn default_color() -> [u8; 3] {
    DEFAULT_COLOR
}
fn default_fade_rate() -> f32 {
    DEFAULT_FADE_RATE
}
fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}
fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            height_fraction: default_height_fraction(),
            color: default_color(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fade_rate: default_fade_rate(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            key: default_hotkey(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(Self::default_config_path);

        if let Some(ref path) = config_path {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                config.validate()?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Get the default config file path
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", PROGRAM_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reject values the overlay cannot run with
    pub fn validate(&self) -> Result<()> {
        let fraction = self.appearance.height_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            bail!("appearance.height_fraction must be in (0, 1], got {}", fraction);
        }
        if !(self.animation.fade_rate > 0.0 && self.animation.fade_rate.is_finite()) {
            bail!("animation.fade_rate must be positive, got {}", self.animation.fade_rate);
        }
        if self.animation.frame_rate == 0 {
            bail!("animation.frame_rate must be positive");
        }
        if keysym_from_name(&self.hotkey.key).is_none() {
            bail!("hotkey.key '{}' is not a known key name", self.hotkey.key);
        }
        Ok(())
    }

    /// Hotkey chords for the configured key
    pub fn hotkeys(&self) -> Result<Hotkeys> {
        Hotkeys::from_key_name(&self.hotkey.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.appearance.height_fraction, 0.2);
        assert_eq!(config.animation.fade_rate, 0.5);
        assert_eq!(config.animation.frame_rate, 30);
        assert_eq!(config.hotkey.key, "Tab");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [animation]
            frame_rate = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.animation.frame_rate, 60);
        assert_eq!(config.animation.fade_rate, 0.5);
        assert_eq!(config.appearance, AppearanceConfig::default());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut config = Config::default();
        config.appearance.color = [1, 2, 3];
        config.hotkey.key = "F9".to_string();

        let toml_str = toml::to_string(&config).unwrap();
        let loaded: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.appearance.height_fraction = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.animation.fade_rate = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.animation.frame_rate = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hotkey.key = "NoSuchKey".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NoSuchKey"));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[appearance]\nheight_fraction = 0.3\n")?;

        let config = Config::load(Some(&path))?;
        assert_eq!(config.appearance.height_fraction, 0.3);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_uses_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let config = Config::load(Some(&temp.path().join("absent.toml")))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_invalid_file_errors() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[animation]\nframe_rate = 0\n")?;

        assert!(Config::load(Some(&path)).is_err());
        Ok(())
    }
}
