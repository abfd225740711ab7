/*!
 * Store configuration.
 *
 * Loading, validating and saving the store settings, plus the fixed
 * constants collaborators may reference.
 */

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Name of the persistent database holding both tables
pub const DATABASE_NAME: &str = "TG_TRANSLATES_TEST_1";

/// Number of favorites returned when no explicit limit is given
pub const DEFAULT_LIMIT_FAVORITES: usize = 32;

/// Number of histories returned when no explicit limit is given
pub const DEFAULT_LIMIT_HISTORIES: usize = 32;

/// Directory created under the user's local data directory
const DEFAULT_DB_DIRNAME: &str = "tg-translates";

/// File extension of the on-disk database
const DB_EXTENSION: &str = "sqlite";

/// Represents the store configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StoreConfig {
    /// Database file; `None` selects the platform default location
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level. Opening a store never installs a logger; the embedding
    /// application applies this with [`crate::logging::init`].
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl StoreConfig {
    /// Configuration pointing at an explicit database file
    pub fn with_database_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Default database path under the user's data directory
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir
            .join(DEFAULT_DB_DIRNAME)
            .join(format!("{}.{}", DATABASE_NAME, DB_EXTENSION)))
    }

    /// The database file this configuration selects
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path(),
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.database_path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("Database path must not be empty"));
            }
            if path.is_dir() {
                return Err(anyhow!("Database path {:?} is a directory", path));
            }
        }

        Ok(())
    }

    /// Load a configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let config = if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
        } else {
            warn!("Config file not found at {:?}, creating default config.", config_path);

            let config = Self::default();
            config.save(config_path)?;
            config
        };

        config.validate().context("Configuration validation failed")?;

        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();

        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", config_path))?;

        Ok(())
    }
}
