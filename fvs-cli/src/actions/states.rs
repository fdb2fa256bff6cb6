use std::path::Path;

use chrono::{Local, TimeZone};
use fvs_core::Repository;

pub(crate) fn run_states(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repository::open(path)?;
    if repo.states().is_empty() {
        println!("No states");
        return Ok(());
    }

    for (id, meta) in repo.states() {
        let marker = if Some(*id) == repo.active_state_id() {
            "\x1b[32m\u{2794}\x1b[0m"
        } else {
            "-"
        };
        let timestamp = Local
            .timestamp_opt(meta.timestamp as i64, 0)
            .single()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| meta.timestamp.to_string());
        println!("{marker} ({id}): {}\n\t{timestamp}\n", meta.message);
    }
    Ok(())
}
