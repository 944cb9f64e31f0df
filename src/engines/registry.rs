//! Engine registry for managing available search engines

use super::traits::Engine;
use crate::config::EngineConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of loaded search engines, kept in registration order
pub struct EngineRegistry {
    /// Engines in registration order
    engines: Vec<Arc<dyn Engine>>,
    /// Position of each engine by name
    index: HashMap<String, usize>,
    /// Engine configurations
    configs: HashMap<String, EngineConfig>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            index: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Register an engine, replacing any engine with the same name
    pub fn register(&mut self, engine: Arc<dyn Engine>, config: EngineConfig) {
        let name = engine.name().to_string();

        match self.index.get(&name) {
            Some(&pos) => self.engines[pos] = engine,
            None => {
                self.index.insert(name.clone(), self.engines.len());
                self.engines.push(engine);
            }
        }
        self.configs.insert(name, config);
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Engine>> {
        self.index.get(name).map(|&pos| &self.engines[pos])
    }

    /// All engines in registration order
    pub fn all(&self) -> &[Arc<dyn Engine>] {
        &self.engines
    }

    /// Get all engine names
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Get effective timeout for an engine
    pub fn get_timeout(&self, name: &str, default: f64) -> f64 {
        self.configs
            .get(name)
            .and_then(|c| c.timeout)
            .or_else(|| self.get(name).map(|e| e.timeout()))
            .unwrap_or(default)
    }

    /// Get effective weight for an engine
    ///
    /// A weight set in configuration wins over the engine's own default.
    pub fn get_weight(&self, name: &str) -> f64 {
        self.configs
            .get(name)
            .and_then(|c| c.weight)
            .or_else(|| self.get(name).map(|e| e.weight()))
            .unwrap_or(1.0)
    }

    /// Weights of every registered engine
    pub fn weights(&self) -> HashMap<String, f64> {
        self.engines
            .iter()
            .map(|e| (e.name().to_string(), self.get_weight(e.name())))
            .collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
