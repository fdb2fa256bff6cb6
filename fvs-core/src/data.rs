//! The content-addressed object pool: a transactional catalog plus the
//! sharded blob directories it tracks.
//!
//! A transaction is staged in memory via [`ObjectStore::add_file`] /
//! [`ObjectStore::delete_file`] and only takes effect on disk once
//! [`ObjectStore::complete_transaction`] runs — blobs first, then the
//! catalog file, so a crash between the two leaves orphan blobs rather
//! than a dangling catalog reference.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::FvsError;
use crate::file;
use crate::state::IndexEntry;
use crate::util::{read_json, write_json_atomic};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub file_name: String,
    #[serde(rename = "sha1")]
    pub digest: String,
    pub states: BTreeMap<u64, u32>,
}

pub type Catalog = BTreeMap<String, CatalogEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Add,
    Delete,
}

struct PendingCopy {
    digest: String,
    source_relative_path: String,
}

struct PendingRemoval {
    digest: String,
    file_name: String,
}

pub struct ObjectStore {
    data_root: PathBuf,
    compression: bool,
    catalog: Catalog,
    pending: Option<PendingKind>,
    pending_copies: Vec<PendingCopy>,
    pending_removals: Vec<PendingRemoval>,
}

impl ObjectStore {
    /// Opens the object pool rooted at `data_root` (`.fvs/data`), creating
    /// the 37 shard directories and a default empty catalog if this is a
    /// fresh repository.
    pub fn open(data_root: &Path, compression: bool) -> Result<Self, FvsError> {
        std::fs::create_dir_all(data_root)?;
        for shard in file::shard_names() {
            std::fs::create_dir_all(data_root.join(shard.to_string()))?;
        }

        let catalog_path = data_root.join("data.json");
        let catalog = if catalog_path.exists() {
            let bytes = std::fs::read(&catalog_path)?;
            if bytes.is_empty() {
                Catalog::new()
            } else {
                serde_json::from_slice(&bytes)?
            }
        } else {
            write_json_atomic(&catalog_path, &Catalog::new())?;
            Catalog::new()
        };

        Ok(Self {
            data_root: data_root.to_path_buf(),
            compression,
            catalog,
            pending: None,
            pending_copies: Vec::new(),
            pending_removals: Vec::new(),
        })
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn compression(&self) -> bool {
        self.compression
    }

    fn begin(&mut self, kind: PendingKind) -> Result<(), FvsError> {
        match self.pending {
            None => {
                self.pending = Some(kind);
                Ok(())
            }
            Some(existing) if existing == kind => Ok(()),
            Some(_) => Err(FvsError::TransactionAlreadyStarted),
        }
    }

    /// Registers `entry` (an already digest-coalesced added/modified/intact
    /// bucket entry) as referenced by `state_id` for its `relative_paths`,
    /// queuing a blob copy when this is the first state to reference the
    /// digest or the first time this particular state references it. Safe
    /// to call more than once for the same `(state_id, digest)` pair within
    /// one commit (e.g. the digest straddles two buckets) — each call adds
    /// its own path count rather than overwriting the running total, so the
    /// final count reflects every live path, in any bucket, that this state
    /// holds against the digest.
    pub fn add_file(&mut self, state_id: u64, entry: &IndexEntry) -> Result<(), FvsError> {
        self.begin(PendingKind::Add)?;
        let paths = entry.relative_paths.len() as u32;
        let source = entry.relative_paths.first().cloned();

        match self.catalog.entry(entry.digest.clone()) {
            Entry::Vacant(slot) => {
                tracing::debug!(file = %entry.file_name, "adding file to data catalog");
                let mut states = BTreeMap::new();
                states.insert(state_id, paths);
                slot.insert(CatalogEntry {
                    file_name: entry.file_name.clone(),
                    digest: entry.digest.clone(),
                    states,
                });
                if let Some(source) = source {
                    self.pending_copies.push(PendingCopy {
                        digest: entry.digest.clone(),
                        source_relative_path: source,
                    });
                }
            }
            Entry::Occupied(mut slot) => {
                let cat = slot.get_mut();
                if let Some(count) = cat.states.get_mut(&state_id) {
                    *count += paths;
                    tracing::debug!(state_id, file = %cat.file_name, "adding path references for file in state");
                } else {
                    tracing::debug!(state_id, file = %cat.file_name, "adding state to file in data catalog");
                    cat.states.insert(state_id, paths);
                    if let Some(source) = source {
                        self.pending_copies.push(PendingCopy {
                            digest: entry.digest.clone(),
                            source_relative_path: source,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Drops `state_id`'s entire reference to `digest` — every path that
    /// state held against it, not one at a time — since the caller is
    /// always unregistering a state wholesale (a dying state never keeps a
    /// partial claim). When no state references the digest afterwards, the
    /// catalog entry is removed and the blob is queued for physical
    /// deletion. Missing entries are tolerated (a prior partial failure may
    /// already have cleaned them up).
    pub fn delete_file(&mut self, state_id: u64, digest: &str) -> Result<(), FvsError> {
        self.begin(PendingKind::Delete)?;

        let Some(cat) = self.catalog.get_mut(digest) else {
            tracing::warn!(digest, "delete_file: no catalog entry, ignoring");
            return Ok(());
        };

        if cat.states.remove(&state_id).is_some() {
            tracing::debug!(state_id, file = %cat.file_name, "unlinking state from file in data catalog");
        } else {
            tracing::debug!(state_id, file = %cat.file_name, "file has no such state, ignoring");
        }

        if cat.states.is_empty() {
            let file_name = cat.file_name.clone();
            tracing::debug!(file = %file_name, "last state removed, dropping file from data catalog");
            self.catalog.remove(digest);
            self.pending_removals.push(PendingRemoval {
                digest: digest.to_string(),
                file_name,
            });
        }
        Ok(())
    }

    /// Flushes queued blob operations, then rewrites the catalog file.
    /// Order matters: a crash between the two steps leaves orphan blobs
    /// (harmless, reclaimable) but never a catalog entry pointing at a
    /// missing blob.
    pub fn complete_transaction(&mut self, repo_root: &Path) -> Result<(), FvsError> {
        match self.pending {
            Some(PendingKind::Add) => {
                for copy in self.pending_copies.drain(..) {
                    let file_name = self
                        .catalog
                        .get(&copy.digest)
                        .map(|e| e.file_name.clone())
                        .unwrap_or_else(|| copy.digest.clone());
                    file::copy_blob(
                        repo_root,
                        &self.data_root,
                        &file_name,
                        &copy.digest,
                        &copy.source_relative_path,
                        self.compression,
                    )?;
                }
            }
            Some(PendingKind::Delete) => {
                for removal in self.pending_removals.drain(..) {
                    file::remove_blob(&self.data_root, &removal.file_name, &removal.digest)?;
                }
            }
            None => {}
        }

        write_json_atomic(&self.data_root.join("data.json"), &self.catalog)?;
        self.pending = None;
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

pub fn load_catalog(data_root: &Path) -> Result<Catalog, FvsError> {
    read_json(&data_root.join("data.json"))
}
