//! Commit trees
//!
//! A tree is the snapshot a commit records: an ordered mapping from tracked
//! path to blob id. Trees are values. A child commit's tree is derived from its
//! parent's with [`Tree::apply`], which returns a new tree and leaves the
//! parent's untouched.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One change applied on top of a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    /// Track the path at the given blob
    Set(ObjectId),
    /// Stop tracking the path
    Remove,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathBuf, ObjectId>,
}

impl Tree {
    pub fn get(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derive a new tree by applying `edits` in order
    pub fn apply<'e, I>(&self, edits: I) -> Tree
    where
        I: IntoIterator<Item = (&'e Path, &'e TreeEdit)>,
    {
        let mut entries = self.entries.clone();

        for (path, edit) in edits {
            match edit {
                TreeEdit::Set(oid) => {
                    entries.insert(path.to_path_buf(), oid.clone());
                }
                TreeEdit::Remove => {
                    entries.remove(path);
                }
            }
        }

        Tree { entries }
    }
}

impl FromIterator<(PathBuf, ObjectId)> for Tree {
    fn from_iter<T: IntoIterator<Item = (PathBuf, ObjectId)>>(iter: T) -> Self {
        Tree {
            entries: iter.into_iter().collect(),
        }
    }
}
