//! Command implementations
//!
//! - `plumbing`: Low-level object inspection (cat-file)
//! - `porcelain`: User-facing version control workflows (add, commit, merge, etc.)

pub mod plumbing;
pub mod porcelain;
