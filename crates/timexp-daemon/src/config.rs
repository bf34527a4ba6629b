use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use timexp_common::config::{AdviceConfig, GeneralConfig, ReminderConfig};
use tracing::{debug, info, warn};

/// Environment variables checked, in order, for the advice API key.
pub const ADVICE_KEY_VARS: [&str; 2] = ["TIMEXP_ADVICE_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub reminders: ReminderConfig,

    #[serde(default)]
    pub advice: AdviceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub encryption_key: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: config_dir().join("timexp.db").to_string_lossy().to_string(),
            encryption_key: None,
        }
    }
}

/// `<config_dir>/timexp`, falling back to `/tmp/timexp`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join("timexp")
}

impl DaemonConfig {
    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        config_dir().join("daemon.toml")
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading configuration from {:?}", config_path);

        if !config_path.exists() {
            info!(
                "Configuration file not found at {:?}, creating default configuration",
                config_path
            );
            let default_config = Self::default();
            default_config.save_to_path(config_path)?;
            return Ok(default_config);
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: DaemonConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        debug!("Saving configuration to {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// Database location, with `DATABASE_URL` taking precedence over the file.
    pub fn database_path(&self) -> String {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                url.trim_start_matches("sqlite://").trim_start_matches("sqlite:").to_string()
            }
            _ => self.database.path.clone(),
        }
    }

    /// Advice API key from the environment; it is never stored in the config file.
    pub fn advice_api_key(&self) -> Option<SecretString> {
        ADVICE_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty() && value != "undefined")
            .map(SecretString::from)
    }

    /// Validate the configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create database directory: {:?}", parent))?;
        }

        if self.reminders.poll_interval_secs == 0 {
            anyhow::bail!("reminders.poll_interval_secs must be greater than zero");
        }

        if self.database.encryption_key.is_none() {
            warn!("Database encryption is disabled - schedules and logs are stored in plaintext");
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}
