use std::path::Path;

use fvs_core::Repository;

/// Creates (or re-opens) a repository at `path`, attempting a seed commit
/// with message `"Init"` that silently succeeds with nothing to commit on
/// an empty tree.
pub(crate) fn run_init(
    path: &Path,
    ignore: &[String],
    use_compression: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    Repository::init(path, use_compression, ignore)?;
    println!("Initialized FVS repository in {}", path.display());
    Ok(())
}
