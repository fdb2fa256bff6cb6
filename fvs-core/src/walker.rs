//! Walks a working tree and classifies every file against the active
//! state's file index.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::errors::FvsError;
use crate::hash;
use crate::ignore::Ignore;
use crate::state::FileIndex;

/// Whether the walk is feeding a commit (new content wins on a mismatch)
/// or a restore (the target state's content wins, so the repository knows
/// what to copy back).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    Commit,
    Restore,
}

#[derive(Debug, Clone)]
pub struct RawEntry {
    pub file_name: String,
    pub digest: String,
    pub relative_path: String,
}

#[derive(Debug, Clone)]
pub struct ChangeSet {
    pub count: u64,
    pub added: Vec<RawEntry>,
    pub modified: Vec<RawEntry>,
    pub removed: Vec<RawEntry>,
    pub intact: Vec<RawEntry>,
}

const CONTROL_DIR: &str = ".fvs";

pub fn walk(
    root: &Path,
    active: Option<&FileIndex>,
    ignore: &Ignore,
    mode: WalkMode,
) -> Result<ChangeSet, FvsError> {
    let previous = active.map(FileIndex::path_to_digest).unwrap_or_default();
    let mut encountered = BTreeSet::new();
    let mut added = Vec::new();
    let mut modified = Vec::new();
    let mut intact = Vec::new();

    visit_dir(
        root,
        root,
        ignore,
        &previous,
        mode,
        &mut encountered,
        &mut added,
        &mut modified,
        &mut intact,
    )?;

    added.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    modified.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    intact.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut removed: Vec<RawEntry> = previous
        .iter()
        .filter(|(path, _)| !encountered.contains(path.as_str()))
        .map(|(path, digest)| RawEntry {
            file_name: basename(path),
            digest: digest.clone(),
            relative_path: path.clone(),
        })
        .collect();
    removed.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let count = (added.len() + modified.len() + removed.len()) as u64;
    Ok(ChangeSet {
        count,
        added,
        modified,
        removed,
        intact,
    })
}

fn basename(relative_path: &str) -> String {
    Path::new(relative_path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(relative_path)
        .to_string()
}

#[allow(clippy::too_many_arguments)]
fn visit_dir(
    root: &Path,
    dir: &Path,
    ignore: &Ignore,
    previous: &BTreeMap<String, String>,
    mode: WalkMode,
    encountered: &mut BTreeSet<String>,
    added: &mut Vec<RawEntry>,
    modified: &mut Vec<RawEntry>,
    intact: &mut Vec<RawEntry>,
) -> Result<(), FvsError> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        if name == CONTROL_DIR {
            continue;
        }
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if ignore.is_ignored(&relative) {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            visit_dir(
                root, &path, ignore, previous, mode, encountered, added, modified, intact,
            )?;
            continue;
        }

        encountered.insert(relative.clone());
        let file_name = name.to_string_lossy().to_string();
        let Some(current_digest) = hash::hash_file(&path) else {
            continue;
        };

        match previous.get(&relative) {
            Some(prev_digest) if *prev_digest == current_digest => {
                intact.push(RawEntry {
                    file_name,
                    digest: current_digest,
                    relative_path: relative,
                });
            }
            Some(prev_digest) => {
                let digest = match mode {
                    WalkMode::Commit => current_digest,
                    WalkMode::Restore => prev_digest.clone(),
                };
                modified.push(RawEntry {
                    file_name,
                    digest,
                    relative_path: relative,
                });
            }
            None => {
                added.push(RawEntry {
                    file_name,
                    digest: current_digest,
                    relative_path: relative,
                });
            }
        }
    }
    Ok(())
}
