use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;
use tracing::info;

impl Repository {
    /// Restore `path` from the current commit; the index is left alone
    pub fn checkout_file(&self, path: &str) -> anyhow::Result<()> {
        self.load()?;

        let (head_oid, _) = self.head_commit()?;
        self.restore_file(&head_oid, path)
    }

    /// Restore `path` as recorded by the commit `revision` names
    pub fn checkout_file_from(&self, revision: &str, path: &str) -> anyhow::Result<()> {
        self.load()?;

        let commit_oid = Revision::try_parse(revision)?.resolve(self.database())?;
        self.restore_file(&commit_oid, path)
    }

    /// Switch the working tree and the current branch to `name`
    pub fn checkout_branch(&self, name: &str) -> anyhow::Result<()> {
        self.load()?;

        let (branch, tip) = self.existing_branch(name)?;
        if self.refs().is_current_branch(&branch) {
            return Err(GitletError::AlreadyOnBranch(branch.to_string()).into());
        }

        let (_, head) = self.head_commit()?;
        let target = self.database().load_commit(&tip)?;

        self.migrate(head.tree(), target.tree())?;
        self.refs_mut().switch_branch(&branch)?;
        self.persist()?;
        info!(branch = %branch, tip = %tip, "switched branch");

        Ok(())
    }

    fn restore_file(&self, commit_oid: &ObjectId, path: &str) -> anyhow::Result<()> {
        let path = self.workspace().normalize_path(Path::new(path))?;
        let commit = self.database().load_commit(commit_oid)?;

        let blob_oid = commit
            .tree()
            .get(&path)
            .ok_or_else(|| GitletError::PathNotInCommit(path.clone()))?;
        let data = self.database().load_blob_content(blob_oid)?;

        self.workspace().write_file(&path, &data)
    }
}
