use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object::Object;
use std::path::Path;
use tracing::debug;

impl Repository {
    /// Stage the working copy of `path` for the next commit
    ///
    /// A file that matches the current commit again is dropped from the index
    /// instead, which also cancels an earlier removal.
    pub fn add(&self, path: &str) -> anyhow::Result<()> {
        self.load()?;

        let path = self.workspace().normalize_path(Path::new(path))?;
        if !self.workspace().exists(&path) {
            return Err(GitletError::FileNotFound(path).into());
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let (_, head) = self.head_commit()?;

        if head.tree().get(&path) == Some(&blob_id) {
            debug!(path = %path.display(), "working copy matches head, unstaging");
            self.index().remove(&path);
        } else {
            self.database().store(&blob)?;
            debug!(path = %path.display(), oid = %blob_id, "staged");
            self.index().stage(path, blob_id);
        }

        self.persist()
    }
}
