//! Index file management
//!
//! The index names every stored generation and its creation time, which
//! fixes the listing order without parsing the records.

use super::{read_json, write_json, FileResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version of the index file format
const INDEX_VERSION: u32 = 1;

pub const INDEX_FILE_NAME: &str = "index.json";

/// Generic index file wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFile<T> {
    pub version: u32,
    /// When this index was last updated
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<T>,
}

impl<T> Default for IndexFile<T> {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            updated_at: Utc::now(),
            entries: Vec::new(),
        }
    }
}

/// Generation index entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationIndexEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Read an index file, returning an empty index if it doesn't exist
pub fn read_index<T: serde::de::DeserializeOwned>(dir: &Path) -> FileResult<IndexFile<T>> {
    let index_path = dir.join(INDEX_FILE_NAME);

    if !index_path.exists() {
        return Ok(IndexFile::default());
    }

    read_json(&index_path)
}

/// Write an index file
pub fn write_index<T: Serialize>(dir: &Path, entries: Vec<T>) -> FileResult<()> {
    let index = IndexFile {
        version: INDEX_VERSION,
        updated_at: Utc::now(),
        entries,
    };

    write_json(&dir.join(INDEX_FILE_NAME), &index)
}

/// Insert or replace the entry with the same id
pub fn upsert_index_entry(dir: &Path, entry: GenerationIndexEntry) -> FileResult<()> {
    let mut index: IndexFile<GenerationIndexEntry> = read_index(dir)?;

    match index.entries.iter().position(|e| e.id == entry.id) {
        Some(idx) => index.entries[idx] = entry,
        None => index.entries.push(entry),
    }

    write_index(dir, index.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn entry(id: &str) -> GenerationIndexEntry {
        GenerationIndexEntry {
            id: id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_read_missing_index_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let index: IndexFile<GenerationIndexEntry> = read_index(temp_dir.path()).unwrap();

        assert_eq!(index.version, INDEX_VERSION);
        assert!(index.entries.is_empty());
    }

    #[test]
    fn test_upsert_adds_then_replaces() {
        let temp_dir = TempDir::new().unwrap();

        upsert_index_entry(temp_dir.path(), entry("gen-1")).unwrap();
        upsert_index_entry(temp_dir.path(), entry("gen-2")).unwrap();

        let mut replacement = entry("gen-1");
        replacement.created_at = Utc::now() - Duration::hours(1);
        upsert_index_entry(temp_dir.path(), replacement.clone()).unwrap();

        let index: IndexFile<GenerationIndexEntry> = read_index(temp_dir.path()).unwrap();
        assert_eq!(index.entries.len(), 2);
        assert_eq!(index.entries[0], replacement);
        assert_eq!(index.entries[1].id, "gen-2");
    }
}
