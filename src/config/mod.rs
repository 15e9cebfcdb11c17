//! Configuration module for the Dactrie application.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML/JSON/YAML file, then `DACTRIE__*` environment variables.
//! The merged result is validated before use.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::data_structures::double_array_trie::{Alphabet, DatrieConfig};
use crate::error::config::ConfigError;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default configuration location
pub const DEFAULT_CONFIG_PATH: &str = "config/dactrie.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "DACTRIE";

/// Loads the configuration at [`DEFAULT_CONFIG_PATH`], falling back to the
/// defaults (still overridable from the environment) when the file is absent.
pub fn load_default_config() -> ConfigResult<AppConfig> {
    match ConfigLoader::new(Some(DEFAULT_CONFIG_PATH), ENV_PREFIX).load() {
        Err(ConfigError::FileNotFound(_)) => {
            tracing::warn!(
                "Default configuration file not found at: {}",
                DEFAULT_CONFIG_PATH
            );
            ConfigLoader::new(None::<&Path>, ENV_PREFIX).load()
        }
        other => other,
    }
}

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for the Dactrie application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Trie sizing and reclamation
    pub trie: DatrieConfig,

    /// Symbols keys are built from
    pub alphabet: AlphabetConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl Validate for AppConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.trie.validate()?;
        self.alphabet.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

impl Validate for DatrieConfig {
    fn validate(&self) -> ConfigResult<()> {
        DatrieConfig::validate(self).map_err(ConfigError::from)
    }
}

/// The key alphabet, as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphabetConfig {
    /// Single-character stop symbol, never accepted in keys
    pub stop: String,

    /// Key symbols in code order
    pub symbols: String,
}

impl Default for AlphabetConfig {
    fn default() -> Self {
        Self {
            stop: "#".to_string(),
            symbols: "abcdefghijklmnopqrstuvwxyz1234567890".to_string(),
        }
    }
}

impl AlphabetConfig {
    /// Builds the alphabet this configuration describes.
    pub fn build(&self) -> ConfigResult<Alphabet<char>> {
        let mut stop = self.stop.chars();
        match (stop.next(), stop.next()) {
            (Some(stop), None) => Ok(Alphabet::from_str_symbols(stop, &self.symbols)?),
            _ => Err(ConfigError::ValidationError(format!(
                "alphabet stop must be a single character, got {:?}",
                self.stop
            ))),
        }
    }
}

impl Validate for AlphabetConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.build().map(|_| ())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            source_location: false,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for the Dactrie application.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Loads the configuration from a file and environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(AppConfig)` if the configuration was loaded successfully
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&AppConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => return Err(ConfigError::UnsupportedFormat(path.clone())),
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            ExternalConfigError::FileParse { uri, cause } => ConfigError::ParseError(format!(
                "{}: {cause}",
                uri.unwrap_or_else(|| "<unknown>".to_string())
            )),
            other => ConfigError::ParseError(other.to_string()),
        })?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        app_config.validate()?;
        tracing::debug!(config = ?self.config_path, "configuration loaded");

        Ok(app_config)
    }
}
