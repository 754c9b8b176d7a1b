//! Porcelain commands (user-facing operations)
//!
//! Each command is a method on [`Repository`](crate::areas::repository::Repository)
//! that loads the index and branch table, runs every check, and only then
//! writes: objects first, then the index, then the branch table.
//!
//! ## Commands
//!
//! - `init`: Create a repository with its root commit
//! - `add`, `rm`: Stage and unstage files
//! - `commit`: Record the staged snapshot
//! - `checkout`: Restore files or switch branches
//! - `log`: Show commit history, find commits by message
//! - `branch`: Create and delete branches
//! - `status`: Show staged, removed, modified and untracked files
//! - `reset`: Move the current branch to a commit
//! - `merge`: Three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
