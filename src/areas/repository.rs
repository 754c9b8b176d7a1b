//! Repository handle
//!
//! Owns the object store, the working tree and the two mutable singletons
//! (index and branch table). Every command is a method on it, loading the
//! singletons first and persisting them last so a failed check never leaves
//! a partial update behind.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{GITLET_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::cell::{Ref, RefCell, RefMut};
use std::path::{Path, PathBuf};

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    refs: RefCell<Refs>,
    database: Database,
    workspace: Workspace,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let gitlet_path = path.join(GITLET_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            index: RefCell::new(Index::new(gitlet_path.join("index").into_boxed_path())),
            refs: RefCell::new(Refs::new(gitlet_path.join("branches").into_boxed_path())),
            database: Database::new(gitlet_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gitlet_path(&self) -> PathBuf {
        self.path.join(GITLET_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn refs(&'_ self) -> Ref<'_, Refs> {
        self.refs.borrow()
    }

    pub fn refs_mut(&'_ self) -> RefMut<'_, Refs> {
        self.refs.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Load the index and branch table; fails outside a repository
    pub fn load(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(GitletError::NotInitialized.into());
        }

        self.refs.borrow_mut().rehydrate()?;
        self.index.borrow_mut().rehydrate()?;

        Ok(())
    }

    /// Persist the index, then the branch table
    pub fn persist(&self) -> anyhow::Result<()> {
        self.index.borrow_mut().write_updates()?;
        self.refs.borrow_mut().write_updates()?;

        Ok(())
    }

    /// The current commit and its id
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head = self.refs().head()?;
        let commit = self.database.load_commit(&head).map_err(|_| {
            GitletError::InconsistentHistory(format!("head {head} is not a stored commit"))
        })?;

        Ok((head, commit))
    }

    /// A branch named on the command line that must already exist
    pub fn existing_branch(&self, name: &str) -> anyhow::Result<(BranchName, ObjectId)> {
        let no_such_branch = || GitletError::NoSuchBranch(name.to_string());

        let branch = BranchName::try_parse(name.to_string()).map_err(|_| no_such_branch())?;
        let tip = self
            .refs()
            .read_branch(&branch)
            .cloned()
            .ok_or_else(no_such_branch)?;

        Ok((branch, tip))
    }

    /// Make the working tree reflect `to` instead of `from` and empty the
    /// index, refusing to overwrite untracked files
    pub fn migrate(&self, from: &Tree, to: &Tree) -> anyhow::Result<()> {
        let migration = Migration::plan(from, to);
        migration.check_untracked(self.workspace())?;

        self.workspace()
            .apply_migration(&migration, self.database())?;
        self.index().clear();

        Ok(())
    }

    /// Whether the working copy of `path` is exactly the blob `oid`
    pub fn working_copy_matches(&self, path: &Path, oid: Option<&ObjectId>) -> anyhow::Result<bool> {
        match oid {
            Some(oid) if self.workspace.exists(path) => {
                Ok(&self.workspace.parse_blob(path)?.object_id()? == oid)
            }
            _ => Ok(false),
        }
    }
}
