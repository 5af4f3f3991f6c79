use crate::core::fallback::FallbackRate;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const HISTORY_FILE_NAME: &str = "conversion_history.json";
const LOG_FILE_NAME: &str = "xfx.log";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchangerate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchangerate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub history_path: Option<String>,
    #[serde(default)]
    pub log_path: Option<String>,
    #[serde(default)]
    pub fallback_rates: Option<Vec<FallbackRate>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_key: None,
            providers: ProvidersConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_path: None,
            log_path: None,
            fallback_rates: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xfx", "xfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Loads the config file at `path`. A missing file yields the defaults;
    /// any other read or parse failure is an error.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        // Accepts both YAML and JSON objects
        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        self.providers
            .exchangerate
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |p| &p.base_url)
    }

    pub fn history_path(&self) -> Result<PathBuf> {
        data_file_path(self.history_path.as_deref(), HISTORY_FILE_NAME)
    }

    /// File receiving a copy of the log, next to the history by default.
    pub fn log_path(&self) -> Result<PathBuf> {
        data_file_path(self.log_path.as_deref(), LOG_FILE_NAME)
    }
}

fn data_file_path(custom_path: Option<&str>, file_name: &str) -> Result<PathBuf> {
    if let Some(custom_path) = custom_path {
        return Ok(PathBuf::from(custom_path));
    }
    let proj_dirs =
        ProjectDirs::from("dev", "xfx", "xfx").context("Could not determine project directories")?;
    Ok(proj_dirs.data_dir().join(file_name))
}
