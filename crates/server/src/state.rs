use album_import_core::{Config, ImportService};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    import: Arc<ImportService>,
}

impl AppState {
    pub fn new(config: Config, import: Arc<ImportService>) -> Self {
        Self { config, import }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn import(&self) -> &ImportService {
        self.import.as_ref()
    }
}
