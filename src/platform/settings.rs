//! Preferred-device settings.
//!
//! Persisted as TOML under the user's configuration directory:
//!
//! ```toml
//! [capture]
//! name = "Microphone"
//! volume = 70
//!
//! [render]
//! name = "Speaker"
//! volume = 30
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audio::Direction;

const APP_DIR: &str = "mute";
const SETTINGS_FILE: &str = "settings.toml";

/// Preferences for one direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Friendly name of the preferred device (fuzzy matched)
    pub name: String,

    /// Volume applied when the device is first resolved (0-100)
    pub volume: u8,
}

impl DeviceSettings {
    fn capture_default() -> Self {
        Self {
            name: "Microphone".to_string(),
            volume: 70,
        }
    }

    fn render_default() -> Self {
        Self {
            name: "Speaker".to_string(),
            volume: 30,
        }
    }

    fn fill_defaults(partial: PartialDeviceSettings, defaults: Self) -> Self {
        Self {
            name: partial.name.unwrap_or(defaults.name),
            volume: partial
                .volume
                .map_or(defaults.volume, |volume| volume.clamp(0, 100) as u8),
        }
    }
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub capture: DeviceSettings,
    pub render: DeviceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture: DeviceSettings::capture_default(),
            render: DeviceSettings::render_default(),
        }
    }
}

impl Settings {
    /// Settings for the given direction.
    pub fn for_direction(&self, direction: Direction) -> &DeviceSettings {
        match direction {
            Direction::Capture => &self.capture,
            Direction::Render => &self.render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialDeviceSettings {
    name: Option<String>,
    // Wider than the stored type so out-of-range values clamp instead of failing
    volume: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSettings {
    #[serde(default)]
    capture: PartialDeviceSettings,
    #[serde(default)]
    render: PartialDeviceSettings,
}

impl From<PartialSettings> for Settings {
    fn from(partial: PartialSettings) -> Self {
        Self {
            capture: DeviceSettings::fill_defaults(
                partial.capture,
                DeviceSettings::capture_default(),
            ),
            render: DeviceSettings::fill_defaults(partial.render, DeviceSettings::render_default()),
        }
    }
}

/// Manages loading and creating the settings file.
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Creates a new SettingsManager with the default configuration directory.
    pub fn new() -> Result<Self> {
        let settings_path = Self::default_settings_path()?;
        Ok(Self { settings_path })
    }

    /// Creates a new SettingsManager with a specified configuration directory.
    pub fn with_config_dir<P: AsRef<Path>>(dir: P) -> Self {
        let settings_path = dir.as_ref().join(SETTINGS_FILE);
        Self { settings_path }
    }

    /// Returns the default path to the settings file.
    pub fn default_settings_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Loads the settings, writing the defaults first if no file exists.
    pub fn load_or_create(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            info!("Created default settings at {:?}", self.settings_path);
            return Ok(settings);
        }

        let content = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings file at {:?}", self.settings_path))?;

        let partial: PartialSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file at {:?}", self.settings_path))?;

        Ok(partial.into())
    }

    /// Saves the settings to the settings file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let dir = self
            .settings_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.settings_path))?;

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create settings directory at {:?}", dir))?;

        let serialized = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.settings_path, serialized)
            .with_context(|| format!("Failed to write settings file at {:?}", self.settings_path))?;

        Ok(())
    }

    /// Returns the path to the settings file.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_creates_defaults_on_first_run() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path().join("mute"));

        let settings = manager.load_or_create().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(manager.settings_path().exists());

        let written = fs::read_to_string(manager.settings_path()).unwrap();
        assert!(written.contains("[capture]"));
        assert!(written.contains("name = \"Microphone\""));
        assert!(written.contains("[render]"));
        assert!(written.contains("name = \"Speaker\""));
    }

    #[test]
    fn test_reads_existing_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path());
        fs::write(
            manager.settings_path(),
            "[capture]\nname = \"Yeti Stereo\"\nvolume = 55\n\n[render]\nname = \"Headphones\"\n",
        )
        .unwrap();

        let settings = manager.load_or_create().unwrap();
        assert_eq!(settings.capture.name, "Yeti Stereo");
        assert_eq!(settings.capture.volume, 55);
        assert_eq!(settings.render.name, "Headphones");
        assert_eq!(settings.render.volume, 30);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path());
        fs::write(manager.settings_path(), "[render]\nvolume = 10\n").unwrap();

        let settings = manager.load_or_create().unwrap();
        assert_eq!(settings.capture, DeviceSettings::capture_default());
        assert_eq!(settings.render.name, "Speaker");
        assert_eq!(settings.render.volume, 10);
    }

    #[test]
    fn test_volume_is_clamped() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path());
        fs::write(manager.settings_path(), "[capture]\nvolume = 250\n").unwrap();

        let settings = manager.load_or_create().unwrap();
        assert_eq!(settings.capture.volume, 100);
    }

    #[test]
    fn test_volume_beyond_byte_range_keeps_name() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path());
        fs::write(
            manager.settings_path(),
            "[capture]\nname = \"Yeti\"\nvolume = 300\n\n[render]\nname = \"Headphones\"\nvolume = -5\n",
        )
        .unwrap();

        let settings = manager.load_or_create().unwrap();
        assert_eq!(settings.capture.name, "Yeti");
        assert_eq!(settings.capture.volume, 100);
        assert_eq!(settings.render.name, "Headphones");
        assert_eq!(settings.render.volume, 0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = SettingsManager::with_config_dir(temp.path());
        fs::write(manager.settings_path(), "capture = [").unwrap();

        assert!(manager.load_or_create().is_err());
    }

    #[test]
    fn test_for_direction() {
        let settings = Settings::default();
        assert_eq!(settings.for_direction(Direction::Capture).name, "Microphone");
        assert_eq!(settings.for_direction(Direction::Render).volume, 30);
    }
}
