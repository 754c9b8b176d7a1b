//! Checkout migration and untracked-file protection
//!
//! A migration compares the tree the working directory currently reflects
//! (`from`) with the tree it should reflect (`to`):
//!
//! - outgoing: tracked by `from` only, deleted from the working directory
//! - incoming: tracked by `to` only, written
//! - shared: tracked by both, rewritten with `to`'s content
//!
//! An incoming path that already exists in the working directory with other
//! content is an untracked file the switch would overwrite. Directories and
//! files clashing with the target layout count the same way. All such paths
//! are collected and reported together, before anything is touched.

use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    outgoing: BTreeSet<PathBuf>,
    incoming: BTreeMap<PathBuf, ObjectId>,
    shared: BTreeMap<PathBuf, ObjectId>,
}

impl Migration {
    pub fn plan(from: &Tree, to: &Tree) -> Self {
        let outgoing = from
            .paths()
            .filter(|path| !to.contains(path))
            .cloned()
            .collect::<BTreeSet<_>>();

        let (shared, incoming): (BTreeMap<_, _>, BTreeMap<_, _>) = to
            .entries()
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .partition(|(path, _)| from.contains(path));

        debug!(
            outgoing = outgoing.len(),
            incoming = incoming.len(),
            shared = shared.len(),
            "planned migration"
        );

        Migration {
            outgoing,
            incoming,
            shared,
        }
    }

    pub fn outgoing(&self) -> impl Iterator<Item = &PathBuf> {
        self.outgoing.iter()
    }

    pub fn incoming(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.incoming.iter()
    }

    /// Every file of the target tree, in path order
    pub fn targets(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        let mut targets = self
            .incoming
            .iter()
            .chain(self.shared.iter())
            .collect::<Vec<_>>();
        targets.sort();
        targets.into_iter()
    }

    /// Working paths the migration would destroy or trip over
    ///
    /// These are incoming files with other content, files inside a directory
    /// that a target file replaces, and files standing where a target file
    /// needs a directory. Outgoing files are deleted first, so they never
    /// count.
    pub fn untracked_conflicts(&self, workspace: &Workspace) -> anyhow::Result<Vec<PathBuf>> {
        let mut conflicts = BTreeSet::new();

        for (path, incoming_oid) in &self.incoming {
            if Self::working_copy_differs(workspace, path, incoming_oid)? {
                conflicts.insert(path.clone());
            }
        }

        for (path, _) in self.targets() {
            if workspace.is_directory(path) {
                for file in workspace.list_files_in(path)? {
                    if !self.outgoing.contains(&file) {
                        conflicts.insert(file);
                    }
                }
            }

            for parent in path.ancestors().skip(1) {
                if parent.as_os_str().is_empty() {
                    break;
                }
                if workspace.is_occupied_by_file(parent) && !self.outgoing.contains(parent) {
                    conflicts.insert(parent.to_path_buf());
                }
            }
        }

        Ok(conflicts.into_iter().collect())
    }

    /// Fail with every would-be-clobbered path, or succeed without side effects
    pub fn check_untracked(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let conflicts = self.untracked_conflicts(workspace)?;

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(GitletError::UntrackedConflict(conflicts).into())
        }
    }

    fn working_copy_differs(
        workspace: &Workspace,
        path: &Path,
        incoming_oid: &ObjectId,
    ) -> anyhow::Result<bool> {
        if !workspace.exists(path) {
            return Ok(false);
        }

        let working_oid = workspace.parse_blob(path)?.object_id()?;
        Ok(&working_oid != incoming_oid)
    }
}
