//! Configuration file support for cloudscan.
//!
//! Provides YAML-based configuration through `cloudscan.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::shared::security::validate_path_component;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "cloudscan.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub services: Option<Vec<String>>,
    pub severities: Option<Vec<String>>,
    pub cache_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_cache_age_secs: Option<u64>,
    pub scanner_url: Option<String>,
    /// Provider namespace for cache keys and scan errors (default `aws`).
    pub provider: Option<String>,
    /// Services queried from the scanner at once.
    pub max_concurrent_requests: Option<usize>,
    /// Replaces the built-in list of supported services.
    pub supported_services: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // An empty file deserializes to YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    tracing::debug!("Using config file {}", config_path.display());
    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn validate_names(field: &str, names: &[String]) -> Result<()> {
    if let Some(i) = names.iter().position(|n| n.trim().is_empty()) {
        bail!(
            "Invalid config: {}[{}] must not be empty.\n\n\
             💡 Hint: Remove the empty entry or give it a service name (e.g., \"s3\").",
            field,
            i
        );
    }
    Ok(())
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref services) = config.services {
        validate_names("services", services)?;
    }

    if let Some(ref supported) = config.supported_services {
        if supported.is_empty() {
            bail!(
                "Invalid config: supported_services must not be empty.\n\n\
                 💡 Hint: Remove the field to use the built-in service list."
            );
        }
        validate_names("supported_services", supported)?;
    }

    if config.timeout_secs == Some(0) {
        bail!("Invalid config: timeout_secs must be greater than zero.");
    }

    if config.max_concurrent_requests == Some(0) {
        bail!("Invalid config: max_concurrent_requests must be greater than zero.");
    }

    if let Some(ref provider) = config.provider {
        validate_path_component(provider, "provider")
            .with_context(|| "Invalid config: provider")?;
    }

    if let Some(ref url) = config.scanner_url {
        if url.trim().is_empty() {
            bail!("Invalid config: scanner_url must not be empty.");
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        tracing::warn!("Unknown config field '{}' will be ignored", key);
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}
