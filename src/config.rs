use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::{default_activities, ActivityRegistry, TrackedActivityDefinition};

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Vocabulary mode
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    /// Tracked activities, in registry order
    #[serde(default = "default_activities")]
    pub activities: Vec<TrackedActivityDefinition>,
    /// Logging
    pub telemetry: TelemetryConfig,
}

/// Vocabulary settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct VocabularyConfig {
    /// Admit every detected activity regardless of the registry
    #[serde(default)]
    pub open: bool,
}

/// Logging settings
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    /// Log to a file instead of stdout
    pub enabled: bool,
    /// Log file path, `~/` is expanded
    pub log_path: String,
}

const DEFAULT_CONFIG: &str = r#"[vocabulary]
open = false

[telemetry]
enabled = false
log_path = "~/.habit-voice/habit-voice.log"

[[activities]]
id = "pushups"
name = "Pushups"
keywords = ["pushup", "push-ups", "push ups"]

[[activities]]
id = "meditated"
name = "Meditated"
keywords = ["meditat", "meditation"]

[[activities]]
id = "run"
name = "Run"
keywords = ["run", "running", "ran"]

[[activities]]
id = "walk"
name = "Walk"
keywords = ["walk", "walking", "walked"]

[[activities]]
id = "sit-ups"
name = "Sit-ups"
keywords = ["situp", "sit-up", "sit ups", "situps"]

[[activities]]
id = "squats"
name = "Squats"
keywords = ["squat", "squats"]
"#;

impl Config {
    /// Load config from ~/.habit-voice.toml, creating it with defaults if missing
    ///
    /// # Errors
    /// Returns error if HOME is unset or the file cannot be written, read or parsed
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default(&config_path).context("failed to create default config")?;
        }

        let contents = fs::read_to_string(&config_path).context("failed to read config file")?;

        Self::from_toml_str(&contents)
    }

    /// Parse config from TOML text
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or missing required fields
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config TOML")
    }

    /// Registry snapshot described by this config
    #[must_use]
    pub fn registry(&self) -> ActivityRegistry {
        ActivityRegistry::new(self.activities.clone()).with_open_vocabulary(self.vocabulary.open)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".habit-voice.toml"))
    }

    fn create_default(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_CONFIG).context("failed to write default config")?;
        Ok(())
    }
}
