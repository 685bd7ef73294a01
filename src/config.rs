//! Configuration for DiversityBase.
//!
//! Stored as TOML at `<workspace root>/config/config.toml`, where the
//! workspace root is `DIVERSITYBASE_HOME` or the OS data directory. A missing
//! file means defaults.

use crate::generation::ImageSettings;
use crate::selection::SamplingPolicies;
use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const HOME_ENV: &str = "DIVERSITYBASE_HOME";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Anti-repetition window and weight policies.
    #[serde(default)]
    pub sampling: SamplingPolicies,
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Image service endpoint.
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Batch limits, output location and default image parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Largest accepted batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
    /// Output root; relative paths resolve against the workspace root.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub image: ImageSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            output_dir: default_output_dir(),
            image: ImageSettings::default(),
        }
    }
}

impl GenerationSettings {
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        if self.output_dir.is_absolute() {
            Ok(self.output_dir.clone())
        } else {
            Ok(workspace_root()?.join(&self.output_dir))
        }
    }
}

const fn default_max_batch_size() -> u32 {
    500
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_timeout", rename = "timeout_secs")]
    pub timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:7860".to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogSettings {
    /// JSON or YAML file replacing builtin option lists.
    #[serde(default)]
    pub overrides_file: Option<PathBuf>,
}

/// Returns the root directory where DiversityBase stores data.
///
/// Order of precedence:
/// 1. `DIVERSITYBASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("DiversityBase"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        load_from(&path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Reads and checks one config file.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let cfg: AppConfig = toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    cfg.sampling
        .validate()
        .with_context(|| format!("Invalid [sampling] section in {:?}", path))?;
    Ok(cfg)
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(config_dir()?)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}
