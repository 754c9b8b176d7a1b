use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Print a stored object named by its full id or a unique prefix
    pub fn cat_file(&self, object_id: &str) -> anyhow::Result<()> {
        self.load()?;

        let object_id = self.resolve_object_id(object_id)?;
        let object = self.database().parse_object(&object_id)?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }

    fn resolve_object_id(&self, object_id: &str) -> anyhow::Result<ObjectId> {
        if !ObjectId::is_hex_prefix(object_id) {
            return Err(GitletError::CommitNotFound(object_id.to_string()).into());
        }

        let mut matches = self.database().find_objects_by_prefix(object_id)?;
        match matches.len() {
            0 => Err(GitletError::CommitNotFound(object_id.to_string()).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(GitletError::AmbiguousCommitId(object_id.to_string()).into()),
        }
    }
}
