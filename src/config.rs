//! Configuration loading and management
//!
//! Handles parsing of `focal.toml` configuration files. The config file
//! is optional; every setting has a default. Discovery order: explicit
//! `--data-dir`, then `FOCAL_DATA_DIR`, then the platform data directory
//! (e.g. `~/.local/share/focal`), with `focal.toml` read from the data
//! directory itself.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::streak::{DEFAULT_HISTORY_LIMIT, DEFAULT_WINDOW_DAYS};

const CONFIG_FILE: &str = "focal.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Streak/history settings
    #[serde(default)]
    pub streaks: StreaksConfig,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            streaks: StreaksConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Streak and history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreaksConfig {
    /// Upper bound on completion history returned by streak summaries
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Rolling-window length for the week view
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

impl Default for StreaksConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            window_days: default_window_days(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Lock acquisition timeout in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `focal.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_data_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.streaks.history_limit == 0 {
            return Err(Error::InvalidConfig(
                "streaks.history_limit must be > 0".to_string(),
            ));
        }
        if self.streaks.window_days == 0 {
            return Err(Error::InvalidConfig(
                "streaks.window_days must be > 0".to_string(),
            ));
        }
        if self.streaks.window_days > 366 {
            return Err(Error::InvalidConfig(
                "streaks.window_days must be <= 366".to_string(),
            ));
        }
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the data directory: explicit flag, then `FOCAL_DATA_DIR`,
/// then the platform data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    if let Ok(env_dir) = std::env::var("FOCAL_DATA_DIR") {
        let trimmed = env_dir.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let dirs = directories::ProjectDirs::from("", "", "focal").ok_or_else(|| {
        Error::OperationFailed("could not determine a data directory for this platform".to_string())
    })?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.streaks.history_limit, 30);
        assert_eq!(cfg.streaks.window_days, 7);
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("focal.toml");
        let content = r#"
[streaks]
history_limit = 90
window_days = 14

[storage]
lock_timeout_ms = 1000
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.streaks.history_limit, 90);
        assert_eq!(cfg.streaks.window_days, 14);
        assert_eq!(cfg.storage.lock_timeout_ms, 1000);
    }

    #[test]
    fn zero_window_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("focal.toml");
        fs::write(&path, "[streaks]\nwindow_days = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_history_limit_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("focal.toml");
        fs::write(&path, "[streaks]\nhistory_limit = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_from_data_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_data_dir(dir.path());
        assert_eq!(cfg.streaks.window_days, 7);
    }

    #[test]
    fn load_from_data_dir_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("focal.toml"),
            "[streaks]\nwindow_days = 10",
        )
        .expect("write config");

        let cfg = Config::load_from_data_dir(dir.path());
        assert_eq!(cfg.streaks.window_days, 10);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("history_limit = 30"));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let resolved = resolve_data_dir(Some(PathBuf::from("/tmp/focal-test"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/focal-test"));
    }
}
