//! Split point search for merges
//!
//! The split point of two commits is the common ancestor a merge compares
//! both sides against. It is found in two phases:
//!
//! ### Phase 1: Source closure
//!
//! A breadth-first walk from the source commit (the current branch tip) over
//! both parents marks every ancestor of the source, the source included.
//!
//! ### Phase 2: Target walk
//!
//! A level-order walk from the target commit (the merged-in branch tip),
//! first parent before second parent and never visiting a commit twice,
//! returns the first commit already marked by phase 1.
//!
//! The search is asymmetric: it returns the common ancestor closest to the
//! target, which is not necessarily the one closest to the source when
//! several exist. It follows that `split(a, a) == a` and that
//! `split(a, b) == b` whenever `b` is an ancestor of `a`.
//!
//! ## Debug Logging
//!
//! Per-commit traces are emitted when built with the `debug_merge` feature:
//!
//! ```toml
//! [features]
//! debug_merge = []
//! ```

use crate::artifacts::log::rev_list::Ancestors;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Per-node tracing that only exists with the `debug_merge` feature
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const RESULT = 0b100;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds the split point of two commits
///
/// The commit loader maps an id to its parent links; it is the only way the
/// finder touches history, so tests can run it over an in-memory graph.
pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Split point of `source` and `target`, or `None` when the two commits
    /// share no history
    pub fn find_split_point(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();

        self.mark_source_closure(source, &mut states)?;

        let mut queue = VecDeque::from([target.clone()]);
        states
            .entry(target.clone())
            .and_modify(|state| *state |= VisitState::VISITED_FROM_TARGET)
            .or_insert(VisitState::VISITED_FROM_TARGET);

        while let Some(commit_id) = queue.pop_front() {
            let state = states.get(&commit_id).copied().unwrap_or(VisitState::NONE);
            debug_log!("target walk at {}: state={}", commit_id, state);

            if state.contains(VisitState::VISITED_FROM_SOURCE) {
                states.insert(commit_id.clone(), state | VisitState::RESULT);
                debug_log!("split point of {} and {} is {}", source, target, commit_id);
                return Ok(Some(commit_id));
            }

            let commit = (self.commit_loader)(&commit_id)?;
            for parent_id in commit.parents {
                let parent_state = states.entry(parent_id.clone()).or_insert(VisitState::NONE);

                if !parent_state.contains(VisitState::VISITED_FROM_TARGET) {
                    *parent_state |= VisitState::VISITED_FROM_TARGET;
                    queue.push_back(parent_id);
                }
            }
        }

        debug_log!("{} and {} share no history", source, target);
        Ok(None)
    }

    fn mark_source_closure(
        &self,
        source: &ObjectId,
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> anyhow::Result<()> {
        for commit_id in Ancestors::new(source.clone(), &self.commit_loader) {
            let commit_id = commit_id?;
            debug_log!("source walk at {}", commit_id);

            states.insert(commit_id, VisitState::VISITED_FROM_SOURCE);
        }

        Ok(())
    }
}
