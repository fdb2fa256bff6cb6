//! Content digest used to identify a file's content-plus-name identity.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};

const BLOCK_SIZE: usize = 1 << 20;

/// SHA-1 of the file's bytes followed by the UTF-8 bytes of its base name,
/// hex-encoded lowercase. Two empty files named differently hash to
/// different digests; this is intentional (see the design notes on keeping
/// the basename in the hash) and means dedup only ever happens across
/// files that share both content and name.
///
/// Returns `None` if `path` does not exist, is a directory, isn't
/// readable, or has no valid UTF-8 file name. Callers treat `None` the
/// same as "file is absent".
pub fn hash_file(path: &Path) -> Option<String> {
    let basename = path.file_name()?.to_str()?;
    let mut file = File::open(path).ok()?;
    if file.metadata().ok()?.is_dir() {
        return None;
    }

    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let read = file.read(&mut buf).ok()?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    hasher.update(basename.as_bytes());
    Some(format!("{:x}", hasher.finalize()))
}
