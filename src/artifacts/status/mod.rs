//! Working tree status
//!
//! - `file_change`: how a tracked file differs from what the next commit
//!   would record
//! - `status_info`: the five status sections and their rendering

pub mod file_change;
pub mod status_info;
