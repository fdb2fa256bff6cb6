use fvs_core::Repository;

use crate::fixtures::{TestResult, write_file};

#[test]
fn restoring_an_earlier_state_cascades_through_all_later_states() -> TestResult {
    let dir = tempfile::tempdir()?;

    write_file(dir.path(), "shared.txt", b"constant")?;
    write_file(dir.path(), "f.txt", b"v0")?;
    let mut repo = Repository::init(dir.path(), false, &[])?; // state 0

    write_file(dir.path(), "f.txt", b"v1")?;
    repo.commit("state 1", &[])?;

    write_file(dir.path(), "f.txt", b"v2")?;
    repo.commit("state 2", &[])?;

    write_file(dir.path(), "f.txt", b"v3")?;
    repo.commit("state 3", &[])?;

    assert_eq!(repo.states().len(), 4);

    repo.restore_state(1, &[])?;

    assert_eq!(repo.states().len(), 2);
    assert!(repo.states().contains_key(&0));
    assert!(repo.states().contains_key(&1));
    assert!(!dir.path().join(".fvs/states/2").exists());
    assert!(!dir.path().join(".fvs/states/3").exists());
    assert_eq!(std::fs::read(dir.path().join("f.txt"))?, b"v1");
    assert_eq!(std::fs::read(dir.path().join("shared.txt"))?, b"constant");

    let catalog: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join(".fvs/data/data.json"))?)?;
    let shared_digest = fvs_core::hash::hash_file(&dir.path().join("shared.txt")).unwrap();
    assert!(catalog.as_object().unwrap().get(&shared_digest).is_some());
    Ok(())
}

#[test]
fn state_zero_cannot_be_deleted_via_restore_below_it() -> TestResult {
    // restore_state never targets state 0's deletion directly (it is the
    // floor cascade deletion retreats to), but a cascade that would need
    // to remove state 0 is prevented at the Repository boundary instead.
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "f.txt", b"v0")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;
    write_file(dir.path(), "f.txt", b"v1")?;
    repo.commit("state 1", &[])?;

    repo.restore_state(0, &[])?;
    assert!(repo.states().contains_key(&0));
    Ok(())
}
