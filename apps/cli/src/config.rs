//! Layered configuration
//!
//! Built-in defaults, then `piqi-map.toml` (or the `--config` file), then
//! `PIQI_MAP__*` environment variables, e.g. `PIQI_MAP__LOGGING__LEVEL=debug`.
//! Command-line flags are applied on top by the caller.

use anyhow::Context;
use ::config::{Config, Environment, File};
use piqi_map::FhirVersion;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "piqi-map.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fhir_version: String,
    pub pretty: bool,
    pub validate: bool,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fhir_version: FhirVersion::R4.to_string(),
            pretty: false,
            validate: false,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// `PIQI_MAP__*` variables; values stay strings so `4.0` is not read as a float
fn environment() -> Environment {
    Environment::with_prefix("PIQI_MAP").separator("__")
}

impl AppConfig {
    /// Load the configuration; an explicit `path` must exist
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        builder = builder.add_source(env);

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(config)
    }

    pub fn fhir_version(&self) -> anyhow::Result<FhirVersion> {
        self.fhir_version
            .parse()
            .with_context(|| format!("Invalid fhir_version '{}' in configuration", self.fhir_version))
    }
}
