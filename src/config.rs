//! Configuration management for the `DineMap` library
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::DineMapError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DineMapConfig {
    /// Remote document store configuration
    pub store: StoreConfig,
    /// Favourites search configuration
    pub search: SearchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the document store REST endpoint
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
    /// API key, if the deployment requires one
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_store_max_retries")]
    pub max_retries: u32,
}

/// Favourites search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius in kilometers within which a favourite counts as nearby
    #[serde(default = "default_search_radius")]
    pub radius_km: f64,
    /// Timeout for each per-restaurant location lookup, in seconds
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_seconds: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_store_base_url() -> String {
    "https://api.dinemap.app/v1".to_string()
}

fn default_store_timeout() -> u32 {
    30
}

fn default_store_max_retries() -> u32 {
    3
}

fn default_search_radius() -> f64 {
    15.0
}

fn default_lookup_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            api_key: None,
            timeout_seconds: default_store_timeout(),
            max_retries: default_store_max_retries(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: default_search_radius(),
            lookup_timeout_seconds: default_lookup_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DineMapConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with DINEMAP_ prefix
        builder = builder.add_source(
            Environment::with_prefix("DINEMAP")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DineMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dinemap").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.store.base_url.is_empty() {
            self.store.base_url = default_store_base_url();
        }
        if self.store.timeout_seconds == 0 {
            self.store.timeout_seconds = default_store_timeout();
        }
        if self.search.radius_km <= 0.0 {
            self.search.radius_km = default_search_radius();
        }
        if self.search.lookup_timeout_seconds == 0 {
            self.search.lookup_timeout_seconds = default_lookup_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.store.timeout_seconds > 300 {
            return Err(
                DineMapError::config("Store request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.store.max_retries > 10 {
            return Err(DineMapError::config("Store max retries cannot exceed 10").into());
        }

        if self.search.radius_km > 500.0 {
            return Err(DineMapError::config("Search radius cannot exceed 500 km").into());
        }

        if self.search.lookup_timeout_seconds > self.store.timeout_seconds.max(60) {
            return Err(DineMapError::config(
                "Per-lookup timeout cannot exceed the store request timeout",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DineMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DineMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.store.base_url.starts_with("http://")
            && !self.store.base_url.starts_with("https://")
        {
            return Err(
                DineMapError::config("Store base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if let Some(api_key) = &self.store.api_key {
            if api_key.is_empty() {
                return Err(DineMapError::config(
                    "Store API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }
}

/// Initialize a `tracing` subscriber from the logging configuration.
///
/// Intended for binaries and tests embedding this library; calling it twice
/// is a no-op rather than an error.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    // Already-initialized subscribers are fine
    let _ = result;
}
