//! Commit history traversal
//!
//! - `rev_list`: the ancestor walk and the first-parent log walk
//! - `log_entry`: the text block printed per commit by `log`, `global-log`

pub mod log_entry;
pub mod rev_list;
