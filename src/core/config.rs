use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::tasks::engine::DailyTasksConfig;

/// Game tick length used by the live loop.
pub const DEFAULT_TICK_MILLIS: u64 = 600;

/// Application settings with daily task configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// JSON var snapshot kept up to date by the host
    pub vars_path: PathBuf,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// Daily task configuration
    #[serde(default = "DailyTasksConfig::default_enabled")]
    pub daily_tasks: DailyTasksConfig,
}

fn default_tick_millis() -> u64 {
    DEFAULT_TICK_MILLIS
}

impl Default for Settings {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            vars_path: base.join("daily-tasks").join("vars.json"),
            tick_millis: DEFAULT_TICK_MILLIS,
            daily_tasks: DailyTasksConfig::default_enabled(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    /// Default location under the platform config directory.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daily-tasks")
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load settings, falling back to defaults if the file is absent or invalid.
    pub fn load(&self) -> Settings {
        self.try_load().unwrap_or_else(|e| {
            log::warn!("Invalid settings in {:?}, using defaults: {}", self.config_path, e);
            Settings::default()
        })
    }

    /// Load settings, reporting unreadable or invalid files to the caller.
    /// An absent file yields the defaults.
    pub fn try_load(&self) -> io::Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&content).map_err(io::Error::from)
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
