use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use tracing::info;

impl Repository {
    /// New branch at the current commit; the current branch does not change
    pub fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        self.load()?;

        let branch = BranchName::try_parse(name.to_string())?;
        self.refs_mut().create_branch(branch.clone())?;
        self.persist()?;
        info!(branch = %branch, "created branch");

        Ok(())
    }

    pub fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        self.load()?;

        let (branch, _) = self.existing_branch(name)?;
        let tip = self.refs_mut().delete_branch(&branch)?;
        self.persist()?;
        info!(branch = %branch, tip = %tip, "deleted branch");

        Ok(())
    }
}
