//! Repository areas
//!
//! - `database`: Content-addressed object store
//! - `index`: Staging area, persisted between commands
//! - `refs`: Branch table and current branch
//! - `repository`: Handle tying the areas together; every command runs on it
//! - `workspace`: Working directory file operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
