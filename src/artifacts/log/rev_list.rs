use crate::areas::database::Database;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Every ancestor of a commit, the commit included, in breadth-first order
/// (first parent before merge parent), each yielded once
pub struct Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<CommitLoaderFn> Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(start: ObjectId, commit_loader: CommitLoaderFn) -> Self {
        Ancestors {
            commit_loader,
            queue: VecDeque::from([start.clone()]),
            seen: HashSet::from([start]),
        }
    }
}

impl<CommitLoaderFn> Iterator for Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    type Item = anyhow::Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_id = self.queue.pop_front()?;

        match (self.commit_loader)(&commit_id) {
            Ok(commit) => {
                for parent in commit.parents {
                    if self.seen.insert(parent.clone()) {
                        self.queue.push_back(parent);
                    }
                }
                Some(Ok(commit_id))
            }
            Err(error) => {
                // a broken link ends the walk
                self.queue.clear();
                Some(Err(error))
            }
        }
    }
}

/// The first-parent chain from a commit down to the root
pub struct FirstParentLog<'d> {
    database: &'d Database,
    current_commit_oid: Option<ObjectId>,
}

impl<'d> FirstParentLog<'d> {
    pub fn new(database: &'d Database, start: ObjectId) -> Self {
        FirstParentLog {
            database,
            current_commit_oid: Some(start),
        }
    }
}

impl Iterator for FirstParentLog<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
