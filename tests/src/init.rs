use fvs_core::Repository;

use crate::fixtures::TestResult;

#[test]
fn empty_directory_has_no_states_and_no_active_state() -> TestResult {
    let dir = tempfile::tempdir()?;
    let repo = Repository::init(dir.path(), false, &[])?;

    assert_eq!(repo.active_state_id(), None);
    assert!(repo.states().is_empty());
    Ok(())
}

#[test]
fn init_is_idempotent_across_repeated_calls() -> TestResult {
    let dir = tempfile::tempdir()?;
    crate::fixtures::write_file(dir.path(), "a.txt", b"x")?;

    Repository::init(dir.path(), false, &[])?;
    let repo = Repository::init(dir.path(), false, &[])?;

    assert_eq!(repo.states().len(), 1);
    Ok(())
}
