use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for efd-exif.
///
/// Controls where exiftool lives, how strictly camera codes are validated,
/// and output behavior (dry run, backups).
///
/// # Loading
///
/// ```rust,no_run
/// use efd_exif::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.validation.strict = false;
/// config.exiftool.path = "/usr/local/bin/exiftool".into();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// exiftool executable and extra arguments.
    pub exiftool: ExifToolConfig,
    /// Code validation policy.
    pub validation: ValidationConfig,
    /// Output behavior (dry run, backups, logging).
    pub output: OutputConfig,
}

/// How to invoke exiftool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifToolConfig {
    /// Executable name or path.
    pub path: String,
    /// Extra arguments passed before the tag assignments (e.g. `-P`).
    pub extra_args: Vec<String>,
}

/// Validation policy for camera codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// If `true`, any code outside the known tables aborts the export.
    /// If `false`, such fields are left out. Invalid dates always abort.
    pub strict: bool,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// If `true`, show what would be written without modifying any files.
    pub dry_run: bool,
    /// If `true`, create a `.bak` backup before modifying an image.
    pub backup_originals: bool,
    /// Optional path to a log file.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exiftool: ExifToolConfig::default(),
            validation: ValidationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup_originals: true,
            log_file: None,
        }
    }
}

impl Default for ExifToolConfig {
    fn default() -> Self {
        Self {
            path: "exiftool".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve the config file path, next to the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::debug!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
