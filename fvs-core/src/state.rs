//! An immutable, numbered snapshot of the working tree.
//!
//! A `State` is produced once, by [`commit`], and is frozen after that —
//! only [`break_references`] ever touches it again, and only as part of
//! deleting it. Both functions are `pub(crate)`: the only public entry
//! points into committing or deleting a state live on
//! [`crate::repo::Repository`], which re-expresses the caller-identity
//! guard the original design describes as a runtime check into a plain
//! visibility boundary.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::ObjectStore;
use crate::errors::FvsError;
use crate::util::write_json_atomic;
use crate::walker::{ChangeSet, RawEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub file_name: String,
    #[serde(rename = "sha1")]
    pub digest: String,
    pub relative_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileIndex {
    pub count: u64,
    pub added: BTreeMap<String, IndexEntry>,
    pub modified: BTreeMap<String, IndexEntry>,
    pub removed: BTreeMap<String, IndexEntry>,
    pub intact: BTreeMap<String, IndexEntry>,
}

impl FileIndex {
    /// Maps every relative path recorded in `added`/`modified`/`intact` to
    /// the digest it currently has in this state. A path appears in
    /// exactly one of those three buckets, so the union is unambiguous.
    pub fn path_to_digest(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for bucket in [&self.added, &self.modified, &self.intact] {
            for entry in bucket.values() {
                for path in &entry.relative_paths {
                    map.insert(path.clone(), entry.digest.clone());
                }
            }
        }
        map
    }
}

#[derive(Debug)]
pub struct State {
    pub id: u64,
    pub index: FileIndex,
}

fn coalesce(bucket: &mut BTreeMap<String, IndexEntry>, raws: &[RawEntry]) {
    for raw in raws {
        bucket
            .entry(raw.digest.clone())
            .or_insert_with(|| IndexEntry {
                file_name: raw.file_name.clone(),
                digest: raw.digest.clone(),
                relative_paths: Vec::new(),
            })
            .relative_paths
            .push(raw.relative_path.clone());
    }
}

fn validate_change_set(change_set: &ChangeSet) -> Result<(), FvsError> {
    let malformed = |raw: &RawEntry| raw.file_name.is_empty() || raw.digest.is_empty();
    let all = change_set
        .added
        .iter()
        .chain(change_set.modified.iter())
        .chain(change_set.removed.iter())
        .chain(change_set.intact.iter());
    if all.clone().any(malformed) {
        return Err(FvsError::WrongUnstagedDict);
    }
    Ok(())
}

/// Commits `change_set` as state `state_id`, staging object-store
/// transactions for the added/modified/intact and removed buckets
/// separately (add first, then delete), and persists the resulting file
/// index to `state_dir/files.json`. `pub(crate)` — only `Repository::commit`
/// calls this.
///
/// Intact entries register their live path count against this state too:
/// every commit's `files.json` independently lists the full set of paths a
/// digest has in that state, so the object store's per-state reference
/// count must grow by one live-state entry each time a digest carries
/// forward unchanged, not just when it is first added or modified. No blob
/// copy is queued for an intact-only digest in practice — the blob already
/// exists, and `add_file`/`copy_blob` are no-ops when the destination is
/// already on disk.
pub(crate) fn commit(
    repo_root: &Path,
    store: &mut ObjectStore,
    state_dir: &Path,
    state_id: u64,
    message: &str,
    change_set: &ChangeSet,
) -> Result<State, FvsError> {
    if message.trim().is_empty() {
        return Err(FvsError::EmptyCommitMessage);
    }
    if state_dir.exists() {
        return Err(FvsError::CommittingToExistingState(state_id));
    }
    validate_change_set(change_set)?;

    let mut index = FileIndex::default();
    coalesce(&mut index.added, &change_set.added);
    coalesce(&mut index.modified, &change_set.modified);
    coalesce(&mut index.removed, &change_set.removed);
    coalesce(&mut index.intact, &change_set.intact);

    for entry in index
        .added
        .values()
        .chain(index.modified.values())
        .chain(index.intact.values())
    {
        store.add_file(state_id, entry)?;
    }
    store.complete_transaction(repo_root)?;

    for entry in index.removed.values() {
        store.delete_file(state_id, &entry.digest)?;
    }
    store.complete_transaction(repo_root)?;

    index.count = [&index.added, &index.modified, &index.removed]
        .iter()
        .flat_map(|bucket| bucket.values())
        .map(|entry| entry.relative_paths.len() as u64)
        .sum();

    write_json_atomic(&state_dir.join("files.json"), &index)?;

    Ok(State { id: state_id, index })
}

/// Breaks every reference this state's `added`/`modified`/`intact` entries
/// hold on the object pool — the mirror image of `commit`'s registration,
/// since `commit` now records an intact digest's live paths against this
/// state just like an added or modified one. `removed` entries are
/// untouched (they never held a live reference from this state; the digest
/// was gone before this state's own snapshot was taken). `pub(crate)` —
/// only `Repository::delete_state` calls this.
pub(crate) fn break_references(
    store: &mut ObjectStore,
    repo_root: &Path,
    state_id: u64,
    index: &FileIndex,
) -> Result<(), FvsError> {
    let mut seen = std::collections::BTreeSet::new();
    for entry in index
        .added
        .values()
        .chain(index.modified.values())
        .chain(index.intact.values())
    {
        if seen.insert(entry.digest.clone()) {
            store.delete_file(state_id, &entry.digest)?;
        }
    }
    store.complete_transaction(repo_root)?;
    Ok(())
}
