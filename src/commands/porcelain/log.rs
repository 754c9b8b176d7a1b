use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::log::log_entry::LogEntry;
use crate::artifacts::log::rev_list::FirstParentLog;

impl Repository {
    /// First-parent history of the current branch, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        self.load()?;

        let head = self.refs().head()?;
        for entry in FirstParentLog::new(self.database(), head) {
            let (oid, commit) = entry?;
            write!(self.writer(), "{}", LogEntry::new(&oid, &commit))?;
        }

        Ok(())
    }

    /// Every commit ever made, in no particular order
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.load()?;

        for (oid, commit) in self.database().list_commits()? {
            write!(self.writer(), "{}", LogEntry::new(&oid, &commit))?;
        }

        Ok(())
    }

    /// Ids of the commits whose message contains `needle`, one per line
    pub fn find(&self, needle: &str) -> anyhow::Result<()> {
        self.load()?;

        let matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message().contains(needle))
            .map(|(oid, _)| oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(GitletError::NoMatchingCommit.into());
        }

        for oid in matches {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(())
    }
}
