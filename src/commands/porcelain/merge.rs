use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::merge::resolution::{MergeAction, conflict_content, plan_merge};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The current branch was behind and now points at the other tip
    FastForwarded(ObjectId),
    /// A merge commit was made; `conflicted` lists the paths left with markers
    Merged {
        commit: ObjectId,
        conflicted: Vec<PathBuf>,
    },
}

impl Repository {
    /// Merge the branch `name` into the current branch
    pub fn merge(&self, name: &str) -> anyhow::Result<MergeOutcome> {
        self.load()?;

        if !self.index().is_empty() {
            return Err(GitletError::UncommittedChanges.into());
        }
        if self.refs().current_branch().as_ref() == name {
            return Err(GitletError::SameBranch(name.to_string()).into());
        }
        let (other_branch, other_oid) = self.existing_branch(name)?;

        let (current_oid, current) = self.head_commit()?;
        let other = self.database().load_commit(&other_oid)?;
        Migration::plan(current.tree(), other.tree()).check_untracked(self.workspace())?;

        let finder = SplitPointFinder::new(|oid: &ObjectId| self.database().load_slim_commit(oid));
        let split_oid = finder
            .find_split_point(&current_oid, &other_oid)?
            .ok_or_else(|| {
                GitletError::InconsistentHistory(format!(
                    "{current_oid} and {other_oid} share no history"
                ))
            })?;
        debug!(split = %split_oid, current = %current_oid, other = %other_oid, "found split point");

        if split_oid == other_oid {
            return Err(GitletError::AlreadyAncestor(other_branch.to_string()).into());
        }

        if split_oid == current_oid {
            self.migrate(current.tree(), other.tree())?;
            self.refs_mut().advance_current(other_oid.clone());
            self.persist()?;
            info!(branch = %other_branch, tip = %other_oid, "fast-forwarded");

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(MergeOutcome::FastForwarded(other_oid));
        }

        let split = self.database().load_commit(&split_oid)?;
        let plan = plan_merge(split.tree(), current.tree(), other.tree());
        let mut conflicted = Vec::new();

        for (path, action) in plan {
            debug!(path = %path.display(), ?action, "merge decision");

            match action {
                MergeAction::Unchanged => {}
                MergeAction::TakeOther(oid) => {
                    let data = self.database().load_blob_content(&oid)?;
                    self.workspace().write_file(&path, &data)?;
                    self.index().stage(path, oid);
                }
                MergeAction::Remove => {
                    if self.working_copy_matches(&path, current.tree().get(&path))? {
                        self.workspace().remove_file(&path)?;
                    }
                    self.index().mark_removed(path);
                }
                MergeAction::Conflict {
                    current: current_blob,
                    other: other_blob,
                } => {
                    let current_data = self.blob_content(current_blob.as_ref())?;
                    let other_data = self.blob_content(other_blob.as_ref())?;
                    let content = conflict_content(current_data.as_deref(), other_data.as_deref());

                    let blob = Blob::new(path.clone(), content);
                    let blob_oid = self.database().store(&blob)?;
                    self.workspace().write_file(&path, blob.content())?;
                    self.index().stage(path.clone(), blob_oid);
                    conflicted.push(path);
                }
            }
        }

        let current_branch = self.refs().current_branch().clone();
        let tree = self.index().fold_into(current.tree());
        let commit = Commit::new(
            format!("Merged {other_branch} into {current_branch}."),
            Commit::timestamp_from_env()?,
            Some(current_oid),
            Some(other_oid),
            tree,
        );
        let commit_oid = self.database().store(&commit)?;

        self.refs_mut().advance_current(commit_oid.clone());
        self.persist()?;
        info!(oid = %commit_oid, conflicts = conflicted.len(), "merged");

        if !conflicted.is_empty() {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(MergeOutcome::Merged {
            commit: commit_oid,
            conflicted,
        })
    }

    fn blob_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Option<bytes::Bytes>> {
        oid.map(|oid| self.database().load_blob_content(oid))
            .transpose()
    }
}
