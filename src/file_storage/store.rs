//! Persistence seam used by the generation service

use super::generations::{list_generations, save_generation};
use super::FileResult;
use crate::utils::ResultExt;
use crate::models::GenerationResult;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores completed generations
pub trait SectionStore: Send + Sync {
    /// Persist one generation
    fn save(&self, generation: &GenerationResult) -> FileResult<()>;

    /// All stored generations, newest first
    fn list_all(&self) -> FileResult<Vec<GenerationResult>>;
}

/// JSON-file store rooted at a data directory
pub struct FileSectionStore {
    data_dir: PathBuf,
    /// Guards the index read-modify-write
    write_lock: Mutex<()>,
}

impl FileSectionStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl SectionStore for FileSectionStore {
    fn save(&self, generation: &GenerationResult) -> FileResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .with_context("Store lock poisoned")?;
        save_generation(&self.data_dir, generation)?;
        Ok(())
    }

    fn list_all(&self) -> FileResult<Vec<GenerationResult>> {
        // Listing may rebuild the index, which writes
        let _guard = self
            .write_lock
            .lock()
            .with_context("Store lock poisoned")?;
        list_generations(&self.data_dir)
    }
}

/// In-memory store, used by tests
#[derive(Default)]
pub struct MemorySectionStore {
    records: Mutex<Vec<GenerationResult>>,
}

impl MemorySectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SectionStore for MemorySectionStore {
    fn save(&self, generation: &GenerationResult) -> FileResult<()> {
        let mut records = self
            .records
            .lock()
            .with_context("Store lock poisoned")?;
        records.retain(|r| r.id != generation.id);
        records.push(generation.clone());
        Ok(())
    }

    fn list_all(&self) -> FileResult<Vec<GenerationResult>> {
        let records = self
            .records
            .lock()
            .with_context("Store lock poisoned")?;
        let mut all = records.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
