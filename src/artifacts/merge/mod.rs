//! Merge algorithms
//!
//! - `split_point`: the common ancestor both sides of a merge are compared to
//! - `resolution`: the per-path three-way decision and conflict markers

pub mod resolution;
pub mod split_point;
