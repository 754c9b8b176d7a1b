//! Plumbing commands
//!
//! Low-level access to the object store, for scripting and debugging.
//!
//! - `cat-file`: Print a stored blob or commit

pub mod cat_file;
