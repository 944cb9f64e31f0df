//! Configuration module for deep-research
//!
//! Handles loading settings from YAML files and environment variables, and
//! the construction-time validation errors raised by providers.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Invalid or incomplete configuration detected while building a provider
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: {0}")]
    MissingCredential(String),
    #[error("invalid setting {name}: {reason}")]
    Invalid { name: String, reason: String },
    #[error("unknown engine type: {0}")]
    UnknownEngine(String),
    #[error("no search engine could be loaded")]
    NoEngines,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Locate and load settings, falling back to defaults
///
/// Environment overrides are applied in every case.
pub fn load() -> Result<Settings> {
    if let Ok(path) = std::env::var("DEEP_RESEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("deep-research/settings.yml"));
    }

    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
