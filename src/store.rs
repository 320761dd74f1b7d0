//! Shard stores: where raw records live before the pipeline runs.
//!
//! Ownership model:
//! - `ShardStore` is the loader-facing interface over named shards.
//! - `FsShardStore` reads JSON shard files from a directory.
//! - `InMemoryShardStore` backs tests and small fixed datasets.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{PipelineError, ShardReadError};
use crate::record::RawRecord;
use crate::types::ShardId;

/// Loader-facing interface over a collection of named shards.
///
/// Shard identifiers are opaque strings. Listing must be deterministic so the
/// concatenated corpus order is stable for a fixed store state.
pub trait ShardStore {
    /// List every discoverable shard id, in stable order.
    ///
    /// Fails with [`PipelineError::StoreUnavailable`] only when the backing
    /// store itself cannot be reached.
    fn list_shards(&self) -> Result<Vec<ShardId>, PipelineError>;

    /// Whether a shard with this id exists.
    fn contains(&self, shard: &str) -> bool;

    /// Read all records of one shard, preserving intra-shard order.
    ///
    /// A shard that exists but cannot be decoded returns
    /// [`ShardReadError::Corrupt`]; the loader skips it with a warning.
    fn read_shard(&self, shard: &str) -> Result<Vec<RawRecord>, ShardReadError>;
}

/// Filesystem shard store: one `<id>.json` file per shard under a root dir,
/// each holding a JSON array of raw records.
pub struct FsShardStore {
    root: PathBuf,
}

impl FsShardStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn shard_path(&self, shard: &str) -> PathBuf {
        self.root.join(format!("{shard}.json"))
    }
}

impl ShardStore for FsShardStore {
    fn list_shards(&self) -> Result<Vec<ShardId>, PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::StoreUnavailable {
                reason: format!("shard directory '{}' does not exist", self.root.display()),
            });
        }
        let mut shards = Vec::new();
        for entry in WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            if let Some(id) = shard_id_from_path(entry.path()) {
                shards.push(id);
            }
        }
        shards.sort();
        Ok(shards)
    }

    fn contains(&self, shard: &str) -> bool {
        self.shard_path(shard).is_file()
    }

    fn read_shard(&self, shard: &str) -> Result<Vec<RawRecord>, ShardReadError> {
        let path = self.shard_path(shard);
        let bytes = fs::read(&path).map_err(|err| ShardReadError::Corrupt {
            shard: shard.to_string(),
            reason: err.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|err| ShardReadError::Corrupt {
            shard: shard.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Shard id for a store file, or `None` for files that are not shards.
fn shard_id_from_path(path: &Path) -> Option<ShardId> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
}

/// In-memory shard store for tests and small datasets.
#[derive(Default)]
pub struct InMemoryShardStore {
    shards: BTreeMap<ShardId, Vec<RawRecord>>,
}

impl InMemoryShardStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shard, replacing any existing shard with the same id.
    pub fn insert(&mut self, shard: impl Into<ShardId>, records: Vec<RawRecord>) {
        self.shards.insert(shard.into(), records);
    }
}

impl ShardStore for InMemoryShardStore {
    fn list_shards(&self) -> Result<Vec<ShardId>, PipelineError> {
        Ok(self.shards.keys().cloned().collect())
    }

    fn contains(&self, shard: &str) -> bool {
        self.shards.contains_key(shard)
    }

    fn read_shard(&self, shard: &str) -> Result<Vec<RawRecord>, ShardReadError> {
        self.shards
            .get(shard)
            .cloned()
            .ok_or_else(|| ShardReadError::Corrupt {
                shard: shard.to_string(),
                reason: "shard not present".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use tempfile::tempdir;

    fn sample_record(title: &str) -> RawRecord {
        let mut record = RawRecord::new();
        record.set("title", FieldValue::Text(title.to_string()));
        record.set("rating", FieldValue::Number(7.0));
        record
    }

    #[test]
    fn fs_store_lists_shards_in_sorted_order() {
        let dir = tempdir().unwrap();
        for name in ["b_shard.json", "a_shard.json", "notes.txt"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        let store = FsShardStore::new(dir.path());
        assert_eq!(store.list_shards().unwrap(), vec!["a_shard", "b_shard"]);
    }

    #[test]
    fn fs_store_reports_missing_root_as_unavailable() {
        let dir = tempdir().unwrap();
        let store = FsShardStore::new(dir.path().join("nope"));
        let err = store.list_shards().unwrap_err();
        assert!(matches!(err, PipelineError::StoreUnavailable { .. }));
    }

    #[test]
    fn fs_store_round_trips_records() {
        let dir = tempdir().unwrap();
        let records = vec![sample_record("Alien"), sample_record("Heat")];
        fs::write(
            dir.path().join("s1.json"),
            serde_json::to_vec(&records).unwrap(),
        )
        .unwrap();

        let store = FsShardStore::new(dir.path());
        assert!(store.contains("s1"));
        assert!(!store.contains("s2"));
        let loaded = store.read_shard("s1").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded[0].get("title").and_then(FieldValue::as_text),
            Some("Alien")
        );
    }

    #[test]
    fn fs_store_flags_undecodable_shard_as_corrupt() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = FsShardStore::new(dir.path());
        let err = store.read_shard("bad").unwrap_err();
        assert!(matches!(err, ShardReadError::Corrupt { ref shard, .. } if shard == "bad"));
    }

    #[test]
    fn in_memory_store_lists_and_reads() {
        let mut store = InMemoryShardStore::new();
        store.insert("z", vec![sample_record("Z")]);
        store.insert("a", vec![sample_record("A"), sample_record("B")]);
        assert_eq!(store.list_shards().unwrap(), vec!["a", "z"]);
        assert!(store.contains("a"));
        assert_eq!(store.read_shard("a").unwrap().len(), 2);
        assert!(store.read_shard("missing").is_err());
    }
}
