use std::path::Path;

use fvs_core::Repository;

pub(crate) fn run_restore(
    path: &Path,
    state_id: u64,
    ignore: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = Repository::open(path)?;
    repo.restore_state(state_id, ignore)?;
    println!("Restored state");
    Ok(())
}
