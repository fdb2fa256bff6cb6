//! Orchestrates init, commit, listing, and restore. Owns the manifest and
//! the active-state pointer, and is the sole caller of [`state::commit`]
//! and [`state::break_references`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::ObjectStore;
use crate::errors::FvsError;
use crate::ignore::Ignore;
use crate::state::{self, FileIndex};
use crate::util::{read_json, write_json_atomic};
use crate::walker::{self, WalkMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMeta {
    pub message: String,
    pub timestamp: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestOnDisk {
    id: i64,
    states: BTreeMap<u64, StateMeta>,
    compression: bool,
}

struct Manifest {
    active_state_id: Option<u64>,
    states: BTreeMap<u64, StateMeta>,
    compression: bool,
}

impl From<ManifestOnDisk> for Manifest {
    fn from(disk: ManifestOnDisk) -> Self {
        Manifest {
            active_state_id: if disk.id < 0 { None } else { Some(disk.id as u64) },
            states: disk.states,
            compression: disk.compression,
        }
    }
}

impl From<&Manifest> for ManifestOnDisk {
    fn from(m: &Manifest) -> Self {
        ManifestOnDisk {
            id: m.active_state_id.map(|id| id as i64).unwrap_or(-1),
            states: m.states.clone(),
            compression: m.compression,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommitReport {
    pub state_id: u64,
    pub message: String,
    pub timestamp: f64,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub intact: usize,
}

struct LockFile {
    path: PathBuf,
}

impl LockFile {
    fn acquire(control_dir: &Path) -> Result<Self, FvsError> {
        let path = control_dir.join("lock");
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(FvsError::Locked),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub struct Repository {
    root: PathBuf,
    control_dir: PathBuf,
    manifest: Manifest,
    store: ObjectStore,
    _lock: LockFile,
}

fn manifest_path(control_dir: &Path) -> PathBuf {
    control_dir.join("repo.json")
}

fn load_manifest(control_dir: &Path) -> Result<Manifest, FvsError> {
    let disk: ManifestOnDisk = read_json(&manifest_path(control_dir))?;
    Ok(disk.into())
}

fn save_manifest(control_dir: &Path, manifest: &Manifest) -> Result<(), FvsError> {
    let disk: ManifestOnDisk = manifest.into();
    write_json_atomic(&manifest_path(control_dir), &disk)
}

fn now_seconds() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

impl Repository {
    /// Idempotent: creates the control directory layout if absent, writes
    /// a default manifest on first run (compression is fixed at this
    /// point and ignored on subsequent calls), then attempts an initial
    /// commit with message `"Init"`, silently accepting
    /// [`FvsError::NothingToCommit`] on an empty working tree.
    pub fn init(path: &Path, use_compression: bool, ignore_patterns: &[String]) -> Result<Self, FvsError> {
        let root = path.to_path_buf();
        let control_dir = root.join(".fvs");
        let already_present = manifest_path(&control_dir).exists();
        std::fs::create_dir_all(control_dir.join("states"))?;

        let manifest = if already_present {
            load_manifest(&control_dir)?
        } else {
            tracing::debug!(repo = %root.display(), "fvs path updated for repository");
            let manifest = Manifest {
                active_state_id: None,
                states: BTreeMap::new(),
                compression: use_compression,
            };
            save_manifest(&control_dir, &manifest)?;
            manifest
        };

        let store = ObjectStore::open(&control_dir.join("data"), manifest.compression)?;
        let lock = LockFile::acquire(&control_dir)?;
        let mut repo = Repository {
            root,
            control_dir,
            manifest,
            store,
            _lock: lock,
        };

        match repo.commit("Init", ignore_patterns) {
            Ok(_) | Err(FvsError::NothingToCommit) => {}
            Err(e) => return Err(e),
        }

        Ok(repo)
    }

    /// Opens an already-initialized repository.
    pub fn open(path: &Path) -> Result<Self, FvsError> {
        let root = path.to_path_buf();
        let control_dir = root.join(".fvs");
        let manifest = load_manifest(&control_dir)?;
        let store = ObjectStore::open(&control_dir.join("data"), manifest.compression)?;
        let lock = LockFile::acquire(&control_dir)?;
        Ok(Repository {
            root,
            control_dir,
            manifest,
            store,
            _lock: lock,
        })
    }

    fn state_dir(&self, id: u64) -> PathBuf {
        self.control_dir.join("states").join(id.to_string())
    }

    fn load_state_index(&self, id: u64) -> Result<FileIndex, FvsError> {
        let dir = self.state_dir(id);
        let path = dir.join("files.json");
        if !dir.exists() || !path.exists() {
            return Err(FvsError::MissingStateIndex(id));
        }
        let bytes = std::fs::read(&path)?;
        if bytes.is_empty() {
            return Err(FvsError::EmptyStateIndex(id));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn active_file_index(&self) -> Result<Option<FileIndex>, FvsError> {
        match self.manifest.active_state_id {
            Some(id) => Ok(Some(self.load_state_index(id)?)),
            None => Ok(None),
        }
    }

    pub fn next_state_id(&self) -> u64 {
        self.manifest.states.keys().max().map(|m| m + 1).unwrap_or(0)
    }

    pub fn active_state_id(&self) -> Option<u64> {
        self.manifest.active_state_id
    }

    pub fn states(&self) -> &BTreeMap<u64, StateMeta> {
        &self.manifest.states
    }

    pub fn commit(&mut self, message: &str, ignore_patterns: &[String]) -> Result<CommitReport, FvsError> {
        if message.trim().is_empty() {
            return Err(FvsError::EmptyCommitMessage);
        }
        let ignore = Ignore::new(ignore_patterns)?;
        let active_index = self.active_file_index()?;
        let change_set = walker::walk(&self.root, active_index.as_ref(), &ignore, WalkMode::Commit)?;
        if change_set.count == 0 {
            return Err(FvsError::NothingToCommit);
        }

        let state_id = self.next_state_id();
        let state_dir = self.state_dir(state_id);
        let state = state::commit(&self.root, &mut self.store, &state_dir, state_id, message, &change_set)?;

        let timestamp = now_seconds();
        self.manifest.states.insert(
            state_id,
            StateMeta {
                message: message.to_string(),
                timestamp,
            },
        );
        self.manifest.active_state_id = Some(state_id);
        save_manifest(&self.control_dir, &self.manifest)?;

        let count_paths = |bucket: &BTreeMap<String, state::IndexEntry>| {
            bucket.values().map(|e| e.relative_paths.len()).sum()
        };
        Ok(CommitReport {
            state_id,
            message: message.to_string(),
            timestamp,
            added: count_paths(&state.index.added),
            removed: count_paths(&state.index.removed),
            modified: count_paths(&state.index.modified),
            intact: count_paths(&state.index.intact),
        })
    }

    fn delete_state(&mut self, id: u64) -> Result<(), FvsError> {
        if id == 0 {
            return Err(FvsError::StateZeroNotDeletable);
        }
        let index = self.load_state_index(id)?;
        state::break_references(&mut self.store, &self.root, id, &index)?;

        if self.manifest.active_state_id == Some(id) {
            self.manifest.active_state_id = self.manifest.states.keys().copied().filter(|k| *k < id).max();
        }
        self.manifest.states.remove(&id);
        let _ = std::fs::remove_dir_all(self.state_dir(id));
        Ok(())
    }

    /// Sets the active pointer to `state_id`, cascade-deletes every later
    /// state, and materializes the working tree to match. Fails with
    /// [`FvsError::StateNotFound`] or [`FvsError::NothingToRestore`]
    /// without mutating anything.
    pub fn restore_state(&mut self, state_id: u64, ignore_patterns: &[String]) -> Result<(), FvsError> {
        if !self.manifest.states.contains_key(&state_id) {
            return Err(FvsError::StateNotFound(state_id));
        }

        let ignore = Ignore::new(ignore_patterns)?;
        let target_index = self.load_state_index(state_id)?;
        let change_set = walker::walk(&self.root, Some(&target_index), &ignore, WalkMode::Restore)?;
        if change_set.count == 0 {
            return Err(FvsError::NothingToRestore(state_id));
        }

        let subsequent: Vec<u64> = self
            .manifest
            .states
            .keys()
            .copied()
            .filter(|id| *id > state_id)
            .collect();
        for id in subsequent {
            self.delete_state(id)?;
        }

        for raw in &change_set.added {
            std::fs::remove_file(self.root.join(&raw.relative_path))?;
        }
        for raw in change_set.modified.iter().chain(change_set.removed.iter()) {
            // The blob's shard was chosen from the file name recorded in
            // the catalog when it was first stored, which may differ from
            // the name the walker just saw on disk (e.g. a path that was
            // edited in place without renaming still carries its original
            // digest here). Restore must shard-locate by that original
            // name, not the walked one.
            let file_name = self
                .store
                .catalog()
                .get(&raw.digest)
                .map(|entry| entry.file_name.clone())
                .unwrap_or_else(|| raw.file_name.clone());
            crate::file::restore_blob(
                self.store.data_root(),
                &file_name,
                &raw.digest,
                &self.root,
                std::slice::from_ref(&raw.relative_path),
                self.manifest.compression,
            )?;
        }

        self.manifest.active_state_id = Some(state_id);
        save_manifest(&self.control_dir, &self.manifest)?;
        Ok(())
    }
}
