//! Stored object types
//!
//! The object store holds two kinds of immutable objects:
//!
//! - **Blob**: the content of one file version, labelled with its path
//! - **Commit**: a snapshot node carrying message, timestamp, parents and tree
//!
//! A commit's **tree** is not a separate object; it is embedded in the commit.
//!
//! Every object serializes as `<type> <size>\0<payload>`. The type tag is part
//! of the hashed bytes, so a blob and a commit can never share an id.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated ids shown in merge log lines
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
