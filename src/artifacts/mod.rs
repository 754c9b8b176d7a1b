//! Version control data structures and algorithms
//!
//! - `branch`: Branch names and commit id resolution
//! - `checkout`: Working tree migrations and untracked-file protection
//! - `core`: Error taxonomy and the pager writer
//! - `index`: Staging area file format
//! - `log`: History traversal and log formatting
//! - `merge`: Split point search and three-way resolution
//! - `objects`: Blobs, trees and commits
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
