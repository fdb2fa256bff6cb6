use fvs_core::Repository;

use crate::fixtures::{TestResult, write_file};

#[test]
fn restore_round_trip_reverts_content_and_removes_later_state() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "f.txt", b"X")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;

    write_file(dir.path(), "f.txt", b"Y")?;
    repo.commit("overwrite with Y", &[])?;

    repo.restore_state(0, &[])?;

    assert_eq!(std::fs::read(dir.path().join("f.txt"))?, b"X");
    assert_eq!(repo.active_state_id(), Some(0));
    assert!(!repo.states().contains_key(&1));
    assert!(!dir.path().join(".fvs/states/1").exists());
    Ok(())
}

#[test]
fn restore_deletes_digest_of_the_superseded_content_when_unreferenced() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "f.txt", b"X")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;
    let digest_y = {
        write_file(dir.path(), "f.txt", b"Y")?;
        let d = fvs_core::hash::hash_file(&dir.path().join("f.txt")).unwrap();
        repo.commit("overwrite with Y", &[])?;
        d
    };

    repo.restore_state(0, &[])?;

    let catalog: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join(".fvs/data/data.json"))?)?;
    assert!(catalog.as_object().unwrap().get(&digest_y).is_none());
    Ok(())
}

#[test]
fn restore_on_unchanged_tree_fails_with_nothing_to_restore() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "f.txt", b"X")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;

    let err = repo.restore_state(0, &[]).unwrap_err();
    assert!(matches!(err, fvs_core::FvsError::NothingToRestore(0)));
    Ok(())
}

#[test]
fn restore_to_unknown_state_fails() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "f.txt", b"X")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;

    let err = repo.restore_state(99, &[]).unwrap_err();
    assert!(matches!(err, fvs_core::FvsError::StateNotFound(99)));
    Ok(())
}
