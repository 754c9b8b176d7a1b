use crate::areas::database::Database;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Repository metadata directory, never part of the working tree
pub const GITLET_DIR: &str = ".gitlet";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blob for the working copy of `path`, labelled with that path
    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(path.to_path_buf(), data))
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        self.path.join(path).is_dir()
    }

    /// Something other than a directory sits at `path`
    pub fn is_occupied_by_file(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(self.path.join(path))
            .map(|metadata| !metadata.is_dir())
            .unwrap_or(false)
    }

    /// Every regular file under the work tree, relative and sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.list_files_in(Path::new(""))
    }

    /// Every regular file under the directory `dir`, relative to the work tree
    pub fn list_files_in(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(self.path.join(dir))
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != GITLET_DIR);

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(self.path.as_ref()) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        if !full_path.is_file() {
            return Err(GitletError::FileNotFound(file_path.to_path_buf()).into());
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    /// Write `data` to `file_path`, creating parent directories and
    /// replacing whatever was there
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for {:?}", file_path))?;
        }
        if full_path.is_dir() {
            Self::remove_empty_tree(&full_path)
                .with_context(|| format!("Failed to clear directory in the way: {:?}", file_path))?;
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;
        trace!(path = %file_path.display(), "wrote working file");

        Ok(())
    }

    /// Delete a working file and any directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
            trace!(path = %file_path.display(), "removed working file");
        }

        self.prune_empty_parents(file_path)
    }

    // only directories are removed, so any file left inside makes this fail
    fn remove_empty_tree(dir: &Path) -> anyhow::Result<()> {
        for entry in WalkDir::new(dir).contents_first(true) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                anyhow::bail!("{:?} is not empty", dir);
            }
            std::fs::remove_dir(entry.path())?;
        }

        Ok(())
    }

    fn prune_empty_parents(&self, file_path: &Path) -> anyhow::Result<()> {
        let mut parent = file_path.parent();

        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }

            let full_dir = self.path.join(dir);
            if !full_dir.is_dir() || full_dir.read_dir()?.next().is_some() {
                break;
            }

            std::fs::remove_dir(&full_dir)
                .with_context(|| format!("Failed to remove empty directory: {:?}", dir))?;
            parent = dir.parent();
        }

        Ok(())
    }

    /// Express a user-supplied path relative to the work tree root
    ///
    /// Paths leaving the work tree, pointing into `.gitlet` or containing a
    /// line break cannot be tracked.
    pub fn normalize_path(&self, file_path: &Path) -> anyhow::Result<PathBuf> {
        let relative = file_path
            .strip_prefix(self.path.as_ref())
            .unwrap_or(file_path);
        let untrackable = || GitletError::UntrackablePath(file_path.to_path_buf());

        let mut normalized = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part)
                    if part.to_str().is_some_and(|part| !part.contains('\n')) =>
                {
                    normalized.push(part)
                }
                _ => return Err(untrackable().into()),
            }
        }

        if normalized.as_os_str().is_empty() || normalized.starts_with(GITLET_DIR) {
            return Err(untrackable().into());
        }

        Ok(normalized)
    }

    // Deletions go first so a file can replace a directory emptied by them
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for path in migration.outgoing() {
            self.remove_file(path)?;
        }

        for (path, oid) in migration.targets() {
            let data = database.load_blob_content(oid)?;
            self.write_file(path, &data)?;
        }

        Ok(())
    }
}
