//! Engine loader for initializing engines from configuration

use super::registry::EngineRegistry;
use super::traits::Engine;
use super::{brave, duckduckgo, google, wikipedia};
use crate::config::{ConfigError, EngineConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Load all enabled engines
    ///
    /// Every engine that is not disabled must initialize and validate; an
    /// enabled Google engine without credentials is a configuration error.
    pub fn load(configs: &[EngineConfig]) -> Result<EngineRegistry, ConfigError> {
        let mut registry = EngineRegistry::new();

        for config in configs {
            if config.disabled {
                info!("Skipping disabled engine: {}", config.name);
                continue;
            }

            let engine = Self::create_engine(&config.engine, config).map_err(|e| {
                warn!("Failed to load engine {}: {}", config.name, e);
                e
            })?;
            info!("Loaded engine: {} ({})", config.name, config.engine);
            registry.register(engine, config.clone());
        }

        if registry.is_empty() {
            return Err(ConfigError::NoEngines);
        }

        info!("Loaded {} engines", registry.len());
        Ok(registry)
    }

    /// Create an engine instance by type name
    pub fn create_engine(engine_type: &str, config: &EngineConfig) -> Result<Arc<dyn Engine>, ConfigError> {
        let mut engine: Box<dyn Engine> = match engine_type {
            "google" => Box::new(google::Google::new()),
            "duckduckgo" => Box::new(duckduckgo::DuckDuckGo::new()),
            "brave" => Box::new(brave::Brave::new()),
            "wikipedia" => Box::new(wikipedia::Wikipedia::new()),
            _ => return Err(ConfigError::UnknownEngine(engine_type.to_string())),
        };

        let checked = engine.init(config).and_then(|_| engine.validate(config));
        if let Err(e) = checked {
            return Err(e.downcast::<ConfigError>().unwrap_or_else(|e| ConfigError::Invalid {
                name: format!("search.engines.{}", config.name),
                reason: e.to_string(),
            }));
        }

        Ok(Arc::from(engine))
    }

    /// Get list of available engine types
    pub fn available_engines() -> Vec<&'static str> {
        vec!["google", "duckduckgo", "brave", "wikipedia"]
    }
}
