use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use std::path::Path;

impl Repository {
    /// Unstage `path`, or stop tracking it if the current commit has it
    pub fn rm(&self, path: &str) -> anyhow::Result<()> {
        self.load()?;

        let path = self.workspace().normalize_path(Path::new(path))?;
        let (_, head) = self.head_commit()?;

        if let Some(committed) = head.tree().get(&path) {
            // an edited working copy is left alone
            if self.working_copy_matches(&path, Some(committed))? {
                self.workspace().remove_file(&path)?;
            }

            self.index().mark_removed(path);
            return self.persist();
        }

        if self.index().remove(&path).is_none() {
            return Err(GitletError::NothingToRemove(path).into());
        }

        self.persist()
    }
}
