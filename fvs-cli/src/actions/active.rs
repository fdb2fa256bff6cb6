use std::path::Path;

use fvs_core::Repository;

pub(crate) fn run_active(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(path)?;
    match repo.active_state_id() {
        Some(id) => println!("Active state is {id}"),
        None => println!("No active state"),
    }
    Ok(())
}
