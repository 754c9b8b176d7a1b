use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::fs;
use tracing::info;

pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(GitletError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        let root = Commit::new(
            INITIAL_COMMIT_MESSAGE.to_string(),
            Commit::timestamp_from_env()?,
            None,
            None,
            Tree::default(),
        );
        let root_oid = self.database().store(&root)?;

        self.refs_mut().initialize(root_oid.clone());
        self.persist()?;
        info!(root = %root_oid, "initialized repository");

        writeln!(
            self.writer(),
            "Initialized empty Gitlet repository in {}",
            self.gitlet_path().display()
        )?;

        Ok(())
    }
}
