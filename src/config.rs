use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::conflict::DEFAULT_CLASS_MINUTES;

const APP_DIR: &str = "class-reminder";
pub const CONFIG_ENV: &str = "CLASS_REMINDER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub poll_interval_secs: u64,
    pub class_duration_minutes: u32,
    pub shutdown_timeout_ms: u64,
    pub theme: ThemeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            log_file: None,
            poll_interval_secs: 30,
            class_duration_minutes: DEFAULT_CLASS_MINUTES,
            shutdown_timeout_ms: 1000,
            theme: ThemeSettings::default(),
        }
    }
}

/// Raw color settings; the UI turns these into styles.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
}

impl Config {
    /// `$CLASS_REMINDER_CONFIG`, else `<config_dir>/class-reminder/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Read `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| data_dir().join("class_schedule.json"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join("class-reminder.log"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn class_duration_minutes(&self) -> u32 {
        self.class_duration_minutes.max(1)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::parse(
            r##"
            data_file = "/tmp/schedule.json"
            class_duration_minutes = 90

            [theme]
            preset = "nord"
            today_bg = "#ff8800"
            "##,
        )
        .unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/tmp/schedule.json"));
        assert_eq!(config.class_duration_minutes(), 90);
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.theme.preset.as_deref(), Some("nord"));
        assert_eq!(config.theme.today_bg.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn zero_values_are_clamped() {
        let config = Config::parse("poll_interval_secs = 0\nclass_duration_minutes = 0").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.class_duration_minutes(), 1);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("poll_interval_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
