//! Repository error taxonomy
//!
//! Every condition a user can run into is a variant here. Engine functions
//! return `anyhow::Result` and raise these with `anyhow::bail!`/`Err(..into())`,
//! so callers that care about the exact condition use `downcast_ref`.
//!
//! All variants except `InconsistentHistory` are recoverable: the failing
//! command leaves the repository exactly as it found it.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id prefix {0} is ambiguous.")]
    AmbiguousCommitId(String),

    #[error("Object {0} not found in the object store.")]
    ObjectNotFound(ObjectId),

    #[error("Path cannot be tracked: {}", .0.display())]
    UntrackablePath(PathBuf),

    #[error("File does not exist in that commit.")]
    PathNotInCommit(PathBuf),

    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),

    #[error("No changes added to the commit.")]
    NoChangesToCommit,

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("Found no commit with that message.")]
    NoMatchingCommit,

    #[error(
        "There is an untracked file in the way; delete it, or add and commit it first.\n{}",
        format_paths(.0)
    )]
    UntrackedConflict(Vec<PathBuf>),

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("A branch with that name does not exist.")]
    NoSuchBranch(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("Cannot merge a branch with itself.")]
    SameBranch(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Given branch is an ancestor of the current branch.")]
    AlreadyAncestor(String),

    #[error("Repository history is inconsistent: {0}")]
    InconsistentHistory(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the repository error behind an `anyhow::Error`, if any
pub fn as_gitlet_error(error: &anyhow::Error) -> Option<&GitletError> {
    error.downcast_ref::<GitletError>()
}
