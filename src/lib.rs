// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::unnecessary_map_or)] // map_or can be clearer than alternatives

// Module declarations
pub mod config;
pub mod errors;
pub mod file_storage;
pub mod generation;
pub mod models;
pub mod parsers;
pub mod providers;
pub mod server;
pub mod shutdown;
mod utils;

pub use errors::{GenerationError, ValidationError};
pub use generation::GenerationService;
pub use models::*;

use config::AppConfig;
use file_storage::{FileSectionStore, SectionStore};
use std::sync::Arc;

/// Wire providers, selector and the file store into a generation service
pub fn build_service(config: &AppConfig) -> anyhow::Result<GenerationService> {
    let selector = providers::build_selector(config)?;

    let data_dir = config.storage.resolved_data_dir();
    log::info!("[startup] Storing generations under {}", data_dir.display());
    let store: Arc<dyn SectionStore> = Arc::new(FileSectionStore::new(data_dir));

    Ok(GenerationService::new(selector, store))
}
