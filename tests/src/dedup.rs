use fvs_core::Repository;

use crate::fixtures::{TestResult, write_file};

#[test]
fn same_content_different_names_yields_two_blobs() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "a.txt", b"x")?;
    write_file(dir.path(), "b.txt", b"x")?;
    let repo = Repository::init(dir.path(), false, &[])?;

    let data_dir = dir.path().join(".fvs/data");
    let catalog: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("data.json"))?)?;
    assert_eq!(catalog.as_object().unwrap().len(), 2);
    assert_eq!(repo.states().len(), 1);
    Ok(())
}

#[test]
fn duplicating_a_path_coalesces_into_one_catalog_entry_with_two_references() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "a.txt", b"x")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;

    write_file(dir.path(), "sub/a.txt", b"x")?;
    repo.commit("duplicate a.txt under sub/", &[])?;

    let data_dir = dir.path().join(".fvs/data");
    let catalog: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("data.json"))?)?;
    let entries: Vec<_> = catalog.as_object().unwrap().values().collect();
    assert_eq!(entries.len(), 1, "a.txt's content+name should dedup to one blob");
    assert_eq!(entries[0]["states"]["1"], 2);
    Ok(())
}
