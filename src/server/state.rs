//! Server application state shared across handlers

use crate::config::{AppConfig, SecretsConfig};
use crate::generation::GenerationService;
use crate::shutdown::ShutdownState;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared state for the server. Cloned into every handler.
#[derive(Clone)]
pub struct ServerAppState {
    /// Effective configuration, read-only after start-up
    pub config: Arc<AppConfig>,

    /// Generation pipeline and its store
    pub service: Arc<GenerationService>,

    pub shutdown_state: ShutdownState,

    /// Secrets file override; the home-dir location is used when unset
    secrets_path: Option<PathBuf>,
}

impl ServerAppState {
    pub fn new(
        config: AppConfig,
        service: GenerationService,
        shutdown_state: ShutdownState,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
            shutdown_state,
            secrets_path: None,
        }
    }

    pub fn with_secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_path = Some(path.into());
        self
    }

    pub fn secrets_path(&self) -> Option<PathBuf> {
        self.secrets_path
            .clone()
            .or_else(SecretsConfig::get_secrets_path)
    }
}
