use fvs_core::{FvsError, Repository};

use crate::fixtures::{TestResult, write_file};

#[test]
fn committing_twice_with_no_intervening_changes_fails_the_second_time() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "a.txt", b"hello")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;

    let err = repo.commit("again", &[]).unwrap_err();
    assert!(matches!(err, FvsError::NothingToCommit));
    Ok(())
}

#[test]
fn empty_commit_message_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "a.txt", b"hello")?;
    let mut repo = Repository::init(dir.path(), false, &[])?;
    write_file(dir.path(), "a.txt", b"changed")?;

    let err = repo.commit("   ", &[]).unwrap_err();
    assert!(matches!(err, FvsError::EmptyCommitMessage));
    Ok(())
}
