//! Error surface for the snapshot engine.
//!
//! Every public `fvs-core` entry point returns `Result<_, FvsError>`. The
//! variants below are a superset of the fixed error-kind table: on top of
//! the conditions the engine itself can raise, `Io`/`Json` wrap the
//! underlying filesystem and serialization failures transparently, and
//! `InvalidPattern`/`Locked`/`ArchiveMemberMissing`/`UnsafeArchivePath` cover
//! the ambient concerns (ignore-glob compilation, the advisory repository
//! lock, and tar-archive extraction safety) that the original design left
//! to the implementation.

#[derive(Debug, thiserror::Error)]
pub enum FvsError {
    #[error("no state found for id {0}")]
    StateNotFound(u64),

    #[error("index is empty for state {0}")]
    EmptyStateIndex(u64),

    #[error("state index not found for state {0}")]
    MissingStateIndex(u64),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("nothing to restore from state {0}")]
    NothingToRestore(u64),

    #[error("commit message is empty")]
    EmptyCommitMessage,

    #[error("the unstaged change set is malformed")]
    WrongUnstagedDict,

    #[error("caller is not the expected owner ({0})")]
    CallerWrongClass(&'static str),

    #[error("state {0} already exists and cannot be recommitted")]
    CommittingToExistingState(u64),

    #[error("object store transaction has no associated state")]
    DataHasNoState,

    #[error("a transaction of the other kind is already in progress")]
    TransactionAlreadyStarted,

    #[error("state 0 cannot be deleted")]
    StateZeroNotDeletable,

    #[error("state {0} already exists on disk")]
    StateAlreadyExists(u64),

    #[error("unsupported bucket key: {0}")]
    UnsupportedKey(String),

    #[error("invalid ignore pattern")]
    InvalidPattern(#[source] glob::PatternError),

    #[error("repository is locked by another process")]
    Locked,

    #[error("archive does not contain member {0}")]
    ArchiveMemberMissing(String),

    #[error("archive member {0} escapes the extraction target")]
    UnsafeArchivePath(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
