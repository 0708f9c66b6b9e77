// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::Config;
use crate::servlet::ServletRegistry;

/// Application state
pub struct AppState {
    pub config: Config,
    pub servlets: ServletRegistry,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config, servlets: ServletRegistry) -> Self {
        Self {
            config: config.clone(),
            servlets,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
