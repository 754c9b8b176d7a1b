use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use tracing::info;

impl Repository {
    /// Move the current branch to the commit `revision` names, checking out
    /// all of its files
    pub fn reset(&self, revision: &str) -> anyhow::Result<()> {
        self.load()?;

        let target_oid = Revision::try_parse(revision)?.resolve(self.database())?;
        let (_, head) = self.head_commit()?;
        let target = self.database().load_commit(&target_oid)?;

        self.migrate(head.tree(), target.tree())?;
        self.refs_mut().advance_current(target_oid.clone());
        self.persist()?;
        info!(oid = %target_oid, branch = %self.refs().current_branch(), "reset");

        Ok(())
    }
}
