//! Generation file storage
//!
//! Stores each generation in `{data_dir}/generations/{id}.json` and keeps
//! `{data_dir}/generations/index.json` in step with it.

use super::index::{
    read_index, upsert_index_entry, write_index, GenerationIndexEntry, IndexFile, INDEX_FILE_NAME,
};
use super::{ensure_dir, read_json, write_json, FileResult};
use crate::models::GenerationResult;
use crate::utils::ResultExt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version of the generation file format
const GENERATION_FILE_VERSION: u32 = 1;

/// Generation file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFile {
    pub version: u32,
    /// When this file was written
    pub updated_at: DateTime<Utc>,
    pub generation: GenerationResult,
}

impl GenerationFile {
    pub fn to_index_entry(&self) -> GenerationIndexEntry {
        GenerationIndexEntry {
            id: self.generation.id.clone(),
            created_at: self.generation.created_at,
        }
    }
}

pub fn get_generations_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("generations")
}

pub fn get_generation_file_path(data_dir: &Path, generation_id: &str) -> PathBuf {
    get_generations_dir(data_dir).join(format!("{}.json", generation_id))
}

/// Save a generation and update the index
///
/// Not safe to call concurrently for the same data dir; callers serialize
/// through [`super::FileSectionStore`].
pub fn save_generation(data_dir: &Path, generation: &GenerationResult) -> FileResult<PathBuf> {
    let generations_dir = get_generations_dir(data_dir);
    ensure_dir(&generations_dir)?;

    let file_path = get_generation_file_path(data_dir, &generation.id);

    let generation_file = GenerationFile {
        version: GENERATION_FILE_VERSION,
        updated_at: Utc::now(),
        generation: generation.clone(),
    };

    write_json(&file_path, &generation_file)?;
    upsert_index_entry(&generations_dir, generation_file.to_index_entry())?;

    log::debug!("[storage] Saved generation {} to {:?}", generation.id, file_path);
    Ok(file_path)
}

/// Read a single generation by id
pub fn read_generation(data_dir: &Path, generation_id: &str) -> FileResult<GenerationResult> {
    let file_path = get_generation_file_path(data_dir, generation_id);
    let file: GenerationFile = read_json(&file_path)?;
    Ok(file.generation)
}

/// List all generations, newest first
///
/// Order comes from the index entries. Entries whose file is missing or
/// unreadable are skipped with a warning. An empty index next to existing
/// record files is rebuilt first.
pub fn list_generations(data_dir: &Path) -> FileResult<Vec<GenerationResult>> {
    let generations_dir = get_generations_dir(data_dir);
    if !generations_dir.exists() {
        return Ok(Vec::new());
    }

    let index: IndexFile<GenerationIndexEntry> = read_index(&generations_dir)?;
    let mut entries = if index.entries.is_empty() {
        rebuild_generation_index(data_dir)?
    } else {
        index.entries
    };
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let generations: Vec<GenerationResult> = entries
        .iter()
        .filter_map(|entry| match read_generation(data_dir, &entry.id) {
            Ok(generation) => Some(generation),
            Err(e) => {
                log::warn!("[storage] Skipping generation {}: {}", entry.id, e);
                None
            }
        })
        .collect();

    Ok(generations)
}

/// Rebuild the index from the record files on disk
pub fn rebuild_generation_index(data_dir: &Path) -> FileResult<Vec<GenerationIndexEntry>> {
    let generations_dir = get_generations_dir(data_dir);
    if !generations_dir.exists() {
        return Ok(Vec::new());
    }

    let entries: Vec<GenerationIndexEntry> = fs::read_dir(&generations_dir)
        .with_context("Failed to read generations directory")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .filter(|path| path.file_name().map_or(true, |name| name != INDEX_FILE_NAME))
        .filter_map(|path| match read_json::<GenerationFile>(&path) {
            Ok(file) => Some(file.to_index_entry()),
            Err(e) => {
                log::warn!("[storage] Ignoring unreadable record {:?}: {}", path, e);
                None
            }
        })
        .collect();

    if !entries.is_empty() {
        log::info!(
            "[storage] Rebuilt generation index with {} entries",
            entries.len()
        );
        write_index(&generations_dir, entries.clone())?;
    }

    Ok(entries)
}
