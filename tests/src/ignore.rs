use fvs_core::Repository;

use crate::fixtures::{TestResult, write_file};

#[test]
fn ignored_files_never_enter_the_state_or_the_pool() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "a.log", b"log line")?;
    write_file(dir.path(), "b.txt", b"keep me")?;
    let repo = Repository::init(dir.path(), false, &["*.log".to_string()])?;

    let index: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join(".fvs/states/0/files.json"))?)?;
    let added = index["added"].as_object().unwrap();
    assert_eq!(added.len(), 1);
    let only_entry = added.values().next().unwrap();
    assert_eq!(only_entry["file_name"], "b.txt");

    assert_eq!(repo.states().len(), 1);
    Ok(())
}
