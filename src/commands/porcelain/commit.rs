use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use tracing::info;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        self.load()?;

        if message.trim().is_empty() {
            return Err(GitletError::EmptyCommitMessage.into());
        }
        if self.index().is_empty() {
            return Err(GitletError::NoChangesToCommit.into());
        }

        let (head_oid, head) = self.head_commit()?;
        let tree = self.index().fold_into(head.tree());

        let commit = Commit::new(
            message.to_string(),
            Commit::timestamp_from_env()?,
            Some(head_oid),
            None,
            tree,
        );
        let commit_oid = self.database().store(&commit)?;

        self.refs_mut().advance_current(commit_oid.clone());
        self.persist()?;
        info!(oid = %commit_oid, branch = %self.refs().current_branch(), "committed");

        Ok(commit_oid)
    }
}
