//! Application settings and paths.
//!
//! Settings live in an optional JSON file under the XDG config directory
//! (`~/.config/ghostport/settings.json` on Linux). Every field has a default,
//! so a partial file is fine and a missing file means "all defaults".

use crate::error::{ConfigError, ConfigResult, ScanResult};
use crate::scanner::StrategyKind;
use crate::types::{PortError, PortRange};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/ghostport)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "ghostport", "ghostport")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Port range used when `--range` is absent.
    pub default_range: String,
    /// Strategy name or mode number used when neither `--mode` nor `--strategy` is given.
    pub default_strategy: String,
    /// Timeout override in milliseconds (otherwise the strategy preset applies).
    pub timeout_ms: Option<u64>,
    /// Worker count / in-flight limit override.
    pub concurrency: Option<usize>,
    /// Inter-probe delay override in milliseconds.
    pub delay_ms: Option<u64>,
    /// Enable verbose output by default.
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_range: "1-1024".to_string(),
            default_strategy: "sequential".to_string(),
            timeout_ms: None,
            concurrency: None,
            delay_ms: None,
            verbose: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no settings file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded settings");
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// The configured default port range.
    pub fn range(&self) -> Result<PortRange, PortError> {
        self.default_range.parse()
    }

    /// The configured default strategy.
    pub fn strategy(&self) -> ScanResult<StrategyKind> {
        self.default_strategy.parse()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}
