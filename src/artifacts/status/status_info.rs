//! Status sections
//!
//! A file lands in at most one of the working-tree sections:
//!
//! - modified: tracked in the head commit and not staged, but the working copy
//!   differs; or staged, but the working copy differs from what was staged
//! - deleted: staged but gone from the working directory; or tracked in the
//!   head commit, not marked for removal, and gone
//! - untracked: present in the working directory but neither staged nor
//!   tracked; a file marked for removal and then re-created counts too

use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::index::index_entry::EntryState;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub current_branch: Option<BranchName>,
    pub branches: Vec<BranchName>,
    pub staged_files: FileSet,
    pub removed_files: FileSet,
    pub workspace_changeset: ChangeSet,
    pub untracked_files: FileSet,
}

impl StatusInfo {
    pub fn collect<'b>(
        branches: impl IntoIterator<Item = &'b BranchName>,
        current_branch: &BranchName,
        head_tree: &Tree,
        index: &Index,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        let working_files = workspace.list_files()?;
        let mut working_oids = BTreeMap::new();
        for path in &working_files {
            working_oids.insert(path.clone(), workspace.parse_blob(path)?.object_id()?);
        }

        let mut status = StatusInfo {
            current_branch: Some(current_branch.clone()),
            branches: branches.into_iter().cloned().collect(),
            ..Default::default()
        };

        for entry in index.entries() {
            match &entry.state {
                EntryState::Staged(oid) => {
                    status.staged_files.insert(entry.path.clone());
                    status.compare_working_copy(&entry.path, oid, &working_oids);
                }
                EntryState::Removed => {
                    status.removed_files.insert(entry.path.clone());
                }
            }
        }

        for (path, oid) in head_tree.entries() {
            if index.entry_by_path(path).is_none() {
                status.compare_working_copy(path, oid, &working_oids);
            }
        }

        status.untracked_files = working_files
            .into_iter()
            .filter(|path| {
                let staged = index
                    .entry_by_path(path)
                    .is_some_and(|entry| !entry.is_removed());
                let tracked = head_tree.contains(path)
                    && index.entry_by_path(path).is_none();

                !staged && !tracked
            })
            .collect();

        Ok(status)
    }

    /// Record how the working copy of `path` differs from `expected_oid`
    fn compare_working_copy(
        &mut self,
        path: &Path,
        expected_oid: &ObjectId,
        working_oids: &BTreeMap<PathBuf, ObjectId>,
    ) {
        match working_oids.get(path) {
            None => {
                self.workspace_changeset
                    .insert(path.to_path_buf(), WorkspaceChangeType::Deleted);
            }
            Some(working_oid) if working_oid != expected_oid => {
                self.workspace_changeset
                    .insert(path.to_path_buf(), WorkspaceChangeType::Modified);
            }
            Some(_) => {}
        }
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=== Branches ===".bold())?;
        for branch in &self.branches {
            if self.current_branch.as_ref() == Some(branch) {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Staged Files ===".bold())?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display().to_string().green())?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Removed Files ===".bold())?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display().to_string().green())?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Modifications Not Staged For Commit ===".bold())?;
        for (path, change) in &self.workspace_changeset {
            writeln!(f, "{} {}", path.display(), change)?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "=== Untracked Files ===".bold())?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display().to_string().red())?;
        }
        writeln!(f)
    }
}
