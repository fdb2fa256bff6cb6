use fvs_core::Repository;
use fvs_core::file::shard_char;

use crate::fixtures::{TestResult, write_file};

#[test]
fn shard_depends_only_on_lowercased_first_character() {
    assert_eq!(shard_char("hello.txt"), 'h');
    assert_eq!(shard_char("Hello2.TXT"), 'h');
    assert_eq!(shard_char("3rd.dat"), '3');
    assert_eq!(shard_char("-weird.bin"), '-');
    assert_eq!(shard_char("_under.score"), '-');
}

#[test]
fn first_commit_lands_blobs_in_the_expected_shards() -> TestResult {
    let dir = tempfile::tempdir()?;
    write_file(dir.path(), "hello.txt", b"1")?;
    write_file(dir.path(), "Hello2.TXT", b"2")?;
    write_file(dir.path(), "3rd.dat", b"3")?;
    write_file(dir.path(), "-weird.bin", b"4")?;
    let repo = Repository::init(dir.path(), false, &[])?;

    assert_eq!(repo.states().len(), 1);
    let data_dir = dir.path().join(".fvs/data");
    let expected_counts = [('h', 2usize), ('3', 1), ('-', 1)];
    for (shard, expected) in expected_counts {
        let shard_dir = data_dir.join(shard.to_string());
        assert!(shard_dir.is_dir());
        assert_eq!(
            std::fs::read_dir(&shard_dir)?.count(),
            expected,
            "shard {shard} should hold {expected} blob(s)"
        );
    }
    Ok(())
}
