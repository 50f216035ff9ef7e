//! Application state for the HR engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::services::HrServices;

/// Shared application state.
///
/// Holds the wired services; cloning it for each request only bumps a
/// reference count.
#[derive(Clone)]
pub struct AppState {
    services: Arc<HrServices>,
}

impl AppState {
    /// Creates the state around already wired services.
    pub fn new(services: HrServices) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    /// Seeds a fresh store from `config` and wraps it.
    pub fn bootstrap(config: ConfigLoader) -> Self {
        Self::new(HrServices::bootstrap(config))
    }

    /// Returns the services.
    pub fn services(&self) -> &HrServices {
        &self.services
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.services.config
    }
}
