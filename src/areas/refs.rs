//! Branch table
//!
//! Branches are named pointers to commits. The table records every branch,
//! which one is current, and the current commit id, which must always equal
//! the current branch's tip.
//!
//! ## File Format
//!
//! A single text file (`.gitlet/branches`):
//!
//! ```text
//! current <branch name>
//! head <commit id>
//! branch <commit id> <branch name>
//! ...
//! ```
//!
//! The file is replaced atomically: the new table is written to a temporary
//! file under an exclusive lock and renamed over the old one.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use fake::rand;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;

const CURRENT_REGEX: &str = r"^current (.+)$";
const HEAD_REGEX: &str = r"^head ([0-9a-f]{40})$";
const BRANCH_REGEX: &str = r"^branch ([0-9a-f]{40}) (.+)$";

#[derive(Debug, Clone)]
pub struct Refs {
    /// Path to the branch table file
    path: Box<Path>,
    current: BranchName,
    branches: BTreeMap<BranchName, ObjectId>,
    /// Whether the table differs from what is on disk
    changed: bool,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs {
            path,
            current: BranchName::default_branch(),
            branches: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a fresh table with the default branch at `root`
    pub fn initialize(&mut self, root: ObjectId) {
        self.current = BranchName::default_branch();
        self.branches = BTreeMap::from([(self.current.clone(), root)]);
        self.changed = true;
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.current
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        &self.current == name
    }

    /// Commit id the current branch points at
    pub fn head(&self) -> anyhow::Result<ObjectId> {
        self.branches.get(&self.current).cloned().ok_or_else(|| {
            GitletError::InconsistentHistory(format!(
                "current branch {} has no commit",
                self.current
            ))
            .into()
        })
    }

    pub fn read_branch(&self, name: &BranchName) -> Option<&ObjectId> {
        self.branches.get(name)
    }

    /// All branches in lexicographic order
    pub fn branches(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.branches.iter()
    }

    /// Move the current branch (and so the head) to `oid`
    pub fn advance_current(&mut self, oid: ObjectId) {
        self.branches.insert(self.current.clone(), oid);
        self.changed = true;
    }

    /// New branch at the current head; does not switch to it
    pub fn create_branch(&mut self, name: BranchName) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(GitletError::BranchAlreadyExists(name.to_string()).into());
        }

        let head = self.head()?;
        self.branches.insert(name, head);
        self.changed = true;

        Ok(())
    }

    /// Delete the pointer only; commits stay in the store
    pub fn delete_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.branches.contains_key(name) {
            return Err(GitletError::NoSuchBranch(name.to_string()).into());
        }
        if self.is_current_branch(name) {
            return Err(GitletError::CannotRemoveCurrentBranch(name.to_string()).into());
        }

        let oid = self
            .branches
            .remove(name)
            .ok_or_else(|| GitletError::NoSuchBranch(name.to_string()))?;
        self.changed = true;

        Ok(oid)
    }

    /// Make `name` current; returns its tip
    pub fn switch_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let tip = self
            .branches
            .get(name)
            .cloned()
            .ok_or_else(|| GitletError::NoSuchBranch(name.to_string()))?;

        self.current = name.clone();
        self.changed = true;

        Ok(tip)
    }

    /// Load the table, checking that the stored head matches the current
    /// branch's tip
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read branch table at {:?}", self.path))?;

        let current_re = regex::Regex::new(CURRENT_REGEX)?;
        let head_re = regex::Regex::new(HEAD_REGEX)?;
        let branch_re = regex::Regex::new(BRANCH_REGEX)?;

        let mut current = None;
        let mut head = None;
        let mut branches = BTreeMap::new();

        for line in content.lines().filter(|line| !line.is_empty()) {
            if let Some(caps) = branch_re.captures(line) {
                let name = BranchName::try_parse(caps[2].to_string())?;
                branches.insert(name, ObjectId::try_parse(caps[1].to_string())?);
            } else if let Some(caps) = head_re.captures(line) {
                head = Some(ObjectId::try_parse(caps[1].to_string())?);
            } else if let Some(caps) = current_re.captures(line) {
                current = Some(BranchName::try_parse(caps[1].to_string())?);
            } else {
                return Err(GitletError::InconsistentHistory(format!(
                    "unreadable branch table line: {line}"
                ))
                .into());
            }
        }

        let current = current.ok_or_else(|| {
            GitletError::InconsistentHistory("branch table has no current branch".to_string())
        })?;
        let head = head.ok_or_else(|| {
            GitletError::InconsistentHistory("branch table has no head".to_string())
        })?;

        if branches.get(&current) != Some(&head) {
            return Err(GitletError::InconsistentHistory(format!(
                "head {head} is not the tip of current branch {current}"
            ))
            .into());
        }

        self.current = current;
        self.branches = branches;
        self.changed = false;
        debug!(current = %self.current, branches = self.branches.len(), "loaded branch table");

        Ok(())
    }

    /// Persist the table if it changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut content = format!("current {}\nhead {}\n", self.current, self.head()?);
        for (name, oid) in &self.branches {
            content.push_str(&format!("branch {oid} {name}\n"));
        }

        let table_dir = self
            .path
            .parent()
            .with_context(|| format!("invalid branch table path {:?}", self.path))?;
        let temp_path = table_dir.join(format!("branches-{}.tmp", rand::random::<u32>()));

        {
            let mut temp_file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
                .with_context(|| format!("failed to create {:?}", temp_path))?;
            let mut lock = file_guard::lock(&mut temp_file, Lock::Exclusive, 0, 1)?;
            lock.deref_mut().write_all(content.as_bytes())?;
            lock.deref_mut().flush()?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("failed to replace branch table at {:?}", self.path))?;
        self.changed = false;
        debug!(current = %self.current, "wrote branch table");

        Ok(())
    }
}
