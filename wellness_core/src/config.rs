//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wellness/config.toml`.

use crate::breath::{DEFAULT_SESSION_MINUTES, DURATION_PRESETS};
use crate::history::{BMI_HISTORY_CAPACITY, BODY_FAT_HISTORY_CAPACITY};
use crate::{ActivityLevel, Error, Gender, Result, UnitSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub breathing: BreathingConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Who is using the app and their usual form settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub unit_system: UnitSystem,

    #[serde(default)]
    pub activity_level: ActivityLevel,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            gender: Gender::default(),
            unit_system: UnitSystem::default(),
            activity_level: ActivityLevel::default(),
        }
    }
}

/// Breathing exercise settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,

    #[serde(default = "default_duration_options")]
    pub duration_options: Vec<u32>,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            duration_options: default_duration_options(),
        }
    }
}

/// How many recent results each calculator keeps on screen
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_bmi_capacity")]
    pub bmi_capacity: usize,

    #[serde(default = "default_body_fat_capacity")]
    pub body_fat_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            bmi_capacity: default_bmi_capacity(),
            body_fat_capacity: default_body_fat_capacity(),
        }
    }
}

// Default value functions
fn default_display_name() -> String {
    "User".into()
}

fn default_minutes() -> u32 {
    DEFAULT_SESSION_MINUTES
}

fn default_duration_options() -> Vec<u32> {
    DURATION_PRESETS.to_vec()
}

fn default_bmi_capacity() -> usize {
    BMI_HISTORY_CAPACITY
}

fn default_body_fat_capacity() -> usize {
    BODY_FAT_HISTORY_CAPACITY
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::info!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("wellness").join("config.toml"))
    }

    /// Reject settings no screen could work with
    pub fn validate(&self) -> Result<()> {
        if self.breathing.default_minutes == 0 {
            return Err(Error::Config(
                "breathing.default_minutes must be at least 1".into(),
            ));
        }
        if self.breathing.duration_options.iter().any(|m| *m == 0) {
            return Err(Error::Config(
                "breathing.duration_options must not contain 0".into(),
            ));
        }
        if !self
            .breathing
            .duration_options
            .contains(&self.breathing.default_minutes)
        {
            return Err(Error::Config(format!(
                "breathing.default_minutes ({}) must be one of breathing.duration_options",
                self.breathing.default_minutes
            )));
        }
        if self.history.bmi_capacity == 0 || self.history.body_fat_capacity == 0 {
            return Err(Error::Config("history capacities must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.profile.display_name, "User");
        assert_eq!(config.breathing.default_minutes, 5);
        assert_eq!(config.breathing.duration_options, vec![3, 5, 10, 15, 20]);
        assert_eq!(config.history.bmi_capacity, 5);
        assert_eq!(config.history.body_fat_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.profile.display_name, parsed.profile.display_name);
        assert_eq!(
            config.breathing.duration_options,
            parsed.breathing.duration_options
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[profile]
display_name = "Sam"
gender = "female"
activity_level = "very_active"

[breathing]
default_minutes = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profile.display_name, "Sam");
        assert_eq!(config.profile.gender, Gender::Female);
        assert_eq!(config.profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(config.profile.unit_system, UnitSystem::Metric); // default
        assert_eq!(config.breathing.default_minutes, 10);
        assert_eq!(config.history.bmi_capacity, 5); // default
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nbmi_capacity = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.history.bmi_capacity, 3);
        assert_eq!(config.history.body_fat_capacity, 10);
    }

    #[test]
    fn test_load_rejects_zero_duration() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[breathing]\ndefault_minutes = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_minutes_must_be_an_option() {
        let config: Config =
            toml::from_str("[breathing]\ndefault_minutes = 7\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config: Config = toml::from_str(
            "[breathing]\ndefault_minutes = 7\nduration_options = [1, 7]\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_spelling_of_activity_level_parses() {
        let config: Config =
            toml::from_str("[profile]\nactivity_level = \"veryActive\"\n").unwrap();
        assert_eq!(config.profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(
            config.profile.activity_level.to_string().parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryActive
        );
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[profile\ndisplay_name = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
