use std::path::Path;

use chrono::{Local, TimeZone};
use fvs_core::Repository;

pub(crate) fn run_commit(
    path: &Path,
    message: &str,
    ignore: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut repo = Repository::open(path)?;
    println!("Committing...");
    let report = repo.commit(message, ignore)?;

    let timestamp = Local
        .timestamp_opt(report.timestamp as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| report.timestamp.to_string());

    println!(
        "\nCommitted state {}\nMessage: {}\nDate: {}\n----------\nAdded files: {}\nRemoved files: {}\nModified files: {}\nIntact files: {}",
        report.state_id, report.message, timestamp, report.added, report.removed, report.modified, report.intact
    );
    Ok(())
}
