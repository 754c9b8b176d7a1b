use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        self.load()?;

        let (_, head) = self.head_commit()?;
        let status = {
            let refs = self.refs();
            StatusInfo::collect(
                refs.branches().map(|(name, _)| name),
                refs.current_branch(),
                head.tree(),
                &self.index(),
                self.workspace(),
            )?
        };

        write!(self.writer(), "{status}")?;

        Ok(())
    }
}
