//! Blob-level operations against the object pool: copying a file in,
//! removing it, and restoring it back out to one or more working-tree
//! paths. Compression, when enabled on the repository, wraps a blob in a
//! single-entry gzip'd tar archive named after its digest.

use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::errors::FvsError;

/// Lowercased first character of `file_name`, or `-` if it isn't `[a-z0-9]`.
pub fn shard_char(file_name: &str) -> char {
    match file_name.chars().next() {
        Some(c) => {
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                lower
            } else {
                '-'
            }
        }
        None => '-',
    }
}

/// All 37 shard directory names, in a fixed order.
pub fn shard_names() -> impl Iterator<Item = char> {
    ('a'..='z').chain('0'..='9').chain(std::iter::once('-'))
}

pub fn blob_path(data_root: &Path, file_name: &str, digest: &str) -> PathBuf {
    data_root.join(shard_char(file_name).to_string()).join(digest)
}

/// Copies `source_relative_path` (resolved against `repo_root`) into the
/// pool under `digest`. A no-op if the destination already exists —
/// dedup means the blob was already written by an earlier path sharing
/// this digest.
pub fn copy_blob(
    repo_root: &Path,
    data_root: &Path,
    file_name: &str,
    digest: &str,
    source_relative_path: &str,
    compression: bool,
) -> Result<(), FvsError> {
    let dest = blob_path(data_root, file_name, digest);
    if dest.exists() {
        tracing::debug!(digest, dest = %dest.display(), "blob already exists, skipping copy");
        return Ok(());
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let source = repo_root.join(source_relative_path);
    if compression {
        tracing::debug!(file = file_name, dest = %dest.display(), "compressing file into blob");
        write_compressed(&source, &dest, digest)
    } else {
        tracing::debug!(file = file_name, dest = %dest.display(), "copying file into blob");
        fs::copy(&source, &dest)?;
        Ok(())
    }
}

/// Deletes the blob for `digest`, tolerant of it already being gone.
pub fn remove_blob(data_root: &Path, file_name: &str, digest: &str) -> Result<(), FvsError> {
    let path = blob_path(data_root, file_name, digest);
    if path.exists() {
        tracing::debug!(file = file_name, "removing blob from pool");
        fs::remove_file(path)?;
    } else {
        tracing::debug!(file = file_name, "blob does not exist, catalog may be corrupted");
    }
    Ok(())
}

/// Copies the blob for `digest` back out to every path in
/// `relative_paths`, creating parent directories as needed.
pub fn restore_blob(
    data_root: &Path,
    file_name: &str,
    digest: &str,
    repo_root: &Path,
    relative_paths: &[String],
    compression: bool,
) -> Result<(), FvsError> {
    let blob = blob_path(data_root, file_name, digest);
    for relative_path in relative_paths {
        tracing::debug!(file = file_name, relative_path = %relative_path, "restoring file from blob");
        let dest = repo_root.join(relative_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        if compression {
            extract_compressed(&blob, digest, &dest)?;
        } else {
            fs::copy(&blob, &dest)?;
        }
    }
    Ok(())
}

fn write_compressed(source: &Path, dest: &Path, digest: &str) -> Result<(), FvsError> {
    let out = fs::File::create(dest)?;
    let encoder = GzEncoder::new(out, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_path_with_name(source, digest)?;
    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}

fn extract_compressed(archive_path: &Path, digest: &str, dest: &Path) -> Result<(), FvsError> {
    let file = fs::File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if path.as_os_str() != digest {
            continue;
        }
        if path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(FvsError::UnsafeArchivePath(path.display().to_string()));
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        fs::write(dest, buf)?;
        return Ok(());
    }
    Err(FvsError::ArchiveMemberMissing(digest.to_string()))
}
