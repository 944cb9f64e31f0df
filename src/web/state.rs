//! Application state shared across handlers

use crate::config::Settings;
use crate::research::Researcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Configured researcher; requests may narrow its budget
    pub researcher: Arc<Researcher>,
    /// Cancelled on shutdown, aborting in-flight runs
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build state with the HTTP-backed providers described by `settings`
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let researcher = Researcher::from_settings(&settings)?;
        Ok(Self::with_researcher(settings, researcher))
    }

    /// Build state around an existing researcher
    pub fn with_researcher(settings: Settings, researcher: Researcher) -> Self {
        Self {
            settings: Arc::new(settings),
            researcher: Arc::new(researcher),
            shutdown: CancellationToken::new(),
        }
    }
}
