use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sitehost_ingest::IngestService;

use crate::server::ServeState;
use crate::Config;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    metrics_port: u16,
    state: OnceCell<ServeState>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, metrics_port: u16) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            metrics_port,
            state: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn metrics_port(&self) -> u16 {
        self.metrics_port
    }

    /// Services over the configured store, built on first use.
    pub fn state(&self) -> &ServeState {
        self.state
            .get_or_init(|| ServeState::from_config(&self.config))
    }

    pub fn ingest(&self) -> &IngestService {
        &self.state().ingest
    }
}
