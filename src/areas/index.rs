//! Staging area
//!
//! The index holds the pending changes for the next commit, layered over the
//! current commit's tree. Each path is either staged at a blob id or marked
//! for removal; paths without an entry are unchanged from the commit.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: signature, version and entry count
//! - Entries: sorted by path
//! - Checksum: SHA-1 of everything before it, verified on load
//!
//! Updates are written to a temporary file under an exclusive lock and then
//! renamed over the index, so readers see either the old or the new table.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{EntryState, IndexEntry, REMOVED_MARKER};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use anyhow::Context;
use byteorder::ByteOrder;
use fake::rand;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.gitlet/index`)
    path: Box<Path>,
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Whether the table differs from what is on disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Paths staged for addition, with their blob ids
    pub fn staged(&self) -> impl Iterator<Item = (&Path, &ObjectId)> {
        self.entries
            .values()
            .filter_map(|entry| entry.staged_oid().map(|oid| (entry.path(), oid)))
    }

    /// Paths marked for removal
    pub fn removed(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .values()
            .filter(|entry| entry.is_removed())
            .map(IndexEntry::path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record `path` as staged at `oid`, replacing any earlier entry
    pub fn stage(&mut self, path: PathBuf, oid: ObjectId) {
        self.entries
            .insert(path.clone(), IndexEntry::new(path, EntryState::Staged(oid)));
        self.changed = true;
    }

    /// Record a removal tombstone for `path`
    pub fn mark_removed(&mut self, path: PathBuf) {
        self.entries
            .insert(path.clone(), IndexEntry::new(path, EntryState::Removed));
        self.changed = true;
    }

    /// Drop whatever entry `path` has; returns the dropped entry
    pub fn remove(&mut self, path: &Path) -> Option<IndexEntry> {
        let removed = self.entries.remove(path);
        if removed.is_some() {
            self.changed = true;
        }

        removed
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.changed = true;
        }
        self.entries.clear();
    }

    /// Apply every pending change on top of `tree` and empty the index
    pub fn fold_into(&mut self, tree: &Tree) -> Tree {
        let edits = self
            .entries
            .values()
            .map(|entry| (entry.path.clone(), entry.state.as_tree_edit()))
            .collect::<Vec<_>>();
        let folded = tree.apply(edits.iter().map(|(path, edit)| (path.as_path(), edit)));

        self.clear();
        folded
    }

    /// Load the index from disk
    ///
    /// A missing or empty file is an empty index. The checksum is verified
    /// after all entries are read.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;
        for _ in 0..entries_count {
            let entry = Self::parse_entry(&mut reader)?;
            self.entries.insert(entry.path.clone(), entry);
        }

        reader.verify()?;
        debug!(entries = entries_count, "loaded index");

        Ok(())
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(Cursor::new(header_bytes))?;
        header.validate()?;

        Ok(header.entries_count)
    }

    /// Read one variable-length entry piece by piece so the digest sees
    /// exactly the entry's bytes
    fn parse_entry(reader: &mut Checksum) -> anyhow::Result<IndexEntry> {
        let mut entry_bytes = reader.read(1)?.to_vec();

        if entry_bytes[0] != REMOVED_MARKER {
            entry_bytes.extend_from_slice(&reader.read(OBJECT_ID_LENGTH / 2)?);
        }

        let path_len = reader.read(2)?;
        let path_size = byteorder::NetworkEndian::read_u16(&path_len) as usize;
        entry_bytes.extend_from_slice(&path_len);
        entry_bytes.extend_from_slice(&reader.read(path_size)?);

        IndexEntry::deserialize(Cursor::new(entry_bytes))
    }

    /// Persist the table if it changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let index_dir = self
            .path
            .parent()
            .context(format!("Invalid index path {}", self.path.display()))?;
        let temp_path = index_dir.join(format!("index-{}.tmp", rand::random::<u32>()));

        {
            let mut temp_file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
                .with_context(|| format!("Unable to create {}", temp_path.display()))?;
            let lock = file_guard::lock(&mut temp_file, file_guard::Lock::Exclusive, 0, 1)?;
            let mut writer = Checksum::new(lock);

            let header = IndexHeader::with_entries(self.entries.len() as u32);
            writer.write(&header.serialize()?)?;

            for entry in self.entries.values() {
                writer.write(&entry.serialize()?)?;
            }

            writer.write_checksum()?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Unable to replace index {}", self.path.display()))?;
        self.changed = false;
        debug!(entries = self.entries.len(), "wrote index");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::TreeEdit;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn index_in(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index").into_boxed_path())
    }

    #[rstest]
    fn missing_index_file_is_an_empty_index(index_dir: TempDir) -> anyhow::Result<()> {
        let mut index = index_in(&index_dir);
        index.rehydrate()?;

        assert!(index.is_empty());
        Ok(())
    }

    #[rstest]
    fn entries_survive_a_write_and_reload(index_dir: TempDir) -> anyhow::Result<()> {
        let mut index = index_in(&index_dir);
        index.stage(PathBuf::from("b.txt"), oid('b'));
        index.mark_removed(PathBuf::from("a.txt"));
        index.stage(PathBuf::from("dir/c.txt"), oid('c'));
        index.write_updates()?;

        let mut reloaded = index_in(&index_dir);
        reloaded.rehydrate()?;

        assert_eq!(reloaded.entries().collect::<Vec<_>>(), index.entries().collect::<Vec<_>>());
        assert_eq!(
            reloaded.removed().collect::<Vec<_>>(),
            vec![Path::new("a.txt")]
        );
        assert_eq!(reloaded.staged().count(), 2);
        Ok(())
    }

    #[rstest]
    fn corrupted_checksum_is_detected(index_dir: TempDir) -> anyhow::Result<()> {
        let mut index = index_in(&index_dir);
        index.stage(PathBuf::from("a.txt"), oid('a'));
        index.write_updates()?;

        let mut bytes = std::fs::read(index.path())?;
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(index.path(), bytes)?;

        let mut reloaded = index_in(&index_dir);
        assert!(reloaded.rehydrate().is_err());
        Ok(())
    }

    #[rstest]
    fn restaging_replaces_a_tombstone() {
        let mut index = Index::new(PathBuf::from("index").into_boxed_path());
        index.mark_removed(PathBuf::from("a.txt"));
        index.stage(PathBuf::from("a.txt"), oid('a'));

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.entry_by_path(Path::new("a.txt")).map(|entry| &entry.state),
            Some(&EntryState::Staged(oid('a')))
        );
    }

    #[rstest]
    fn folding_applies_every_entry_and_clears() {
        let parent = Tree::from_iter([
            (PathBuf::from("keep.txt"), oid('1')),
            (PathBuf::from("gone.txt"), oid('2')),
            (PathBuf::from("edit.txt"), oid('3')),
        ]);
        let mut index = Index::new(PathBuf::from("index").into_boxed_path());
        index.mark_removed(PathBuf::from("gone.txt"));
        index.stage(PathBuf::from("edit.txt"), oid('4'));
        index.stage(PathBuf::from("new.txt"), oid('5'));

        let child = index.fold_into(&parent);

        assert!(index.is_empty());
        assert_eq!(
            child,
            parent.apply([
                (Path::new("gone.txt"), &TreeEdit::Remove),
                (Path::new("edit.txt"), &TreeEdit::Set(oid('4'))),
                (Path::new("new.txt"), &TreeEdit::Set(oid('5'))),
            ])
        );
        assert_eq!(parent.len(), 3);
    }
}
