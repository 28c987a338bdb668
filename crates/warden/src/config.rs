//! Layered configuration for every Warden component.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from warden.toml)
//! - `~/.config/warden/warden.toml`
//! - `./warden.toml`
//! - `WARDEN__*` environment variables, after loading `.env`

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use warden_cache::HashStoreConfig;
use warden_error::{ConfigError, WardenResult};
use warden_net::HttpGateConfig;
use warden_rate_limit::BackoffConfig;

const DEFAULT_CONFIG: &str = include_str!("../../../warden.toml");

/// Settings for the hash store, the HTTP gate and the backoff controller.
///
/// # Example
///
/// ```no_run
/// use warden::WardenConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WardenConfig::load()?;
/// println!("store at {}", config.store().url());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct WardenConfig {
    /// Remote hash store connection
    #[serde(default)]
    store: HashStoreConfig,

    /// Shared HTTP client
    #[serde(default)]
    http: HttpGateConfig,

    /// Retry schedule
    #[serde(default)]
    backoff: BackoffConfig,
}

impl WardenConfig {
    /// Load configuration from a specific file path, without defaults or
    /// environment overrides.
    ///
    /// Keys missing from the file take their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> WardenResult<Self> {
        debug!("Loading configuration from file");

        let built = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| ConfigError::unreadable(path.as_ref().display().to_string(), e))?;
        deserialize(built)
    }

    /// Load bundled defaults overlaid with `overrides`, in order.
    ///
    /// Missing override files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed.
    pub fn layered(overrides: &[PathBuf]) -> WardenResult<Self> {
        let sources = overrides
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>();
        let built = overrides
            .iter()
            .fold(defaults(), |builder, path| {
                builder.add_source(File::from(path.as_path()).required(false))
            })
            .build()
            .map_err(|e| {
                ConfigError::unreadable(format!("defaults + [{}]", sources.join(", ")), e)
            })?;
        deserialize(built)
    }

    /// Load configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> WardenResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut builder = defaults();
        if let Some(home) = dirs::home_dir() {
            builder = builder
                .add_source(File::from(home.join(".config/warden/warden.toml")).required(false));
        }
        builder = builder.add_source(File::with_name("warden").required(false));
        builder = builder.add_source(
            Environment::with_prefix("WARDEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let built = builder
            .build()
            .map_err(|e| ConfigError::unreadable("layered sources", e))?;
        deserialize(built)
    }
}

fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

fn deserialize(built: Config) -> WardenResult<WardenConfig> {
    Ok(built
        .try_deserialize()
        .map_err(|e| ConfigError::invalid(e))?)
}
