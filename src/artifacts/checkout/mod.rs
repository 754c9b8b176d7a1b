//! Working-tree reconciliation
//!
//! Switching the working directory from one commit's tree to another is
//! planned first and applied second. Planning finds every untracked file the
//! switch would clobber and refuses before anything is touched.

pub mod migration;
