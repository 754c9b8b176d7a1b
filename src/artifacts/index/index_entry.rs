//! Index entry representation
//!
//! Each entry records one pending change for a path:
//! - `Staged(id)`: the next commit tracks the path at blob `id`
//! - `Removed`: the next commit stops tracking the path
//!
//! ## Entry Format
//!
//! ```text
//! state (1 byte) | blob id (20 bytes, staged only) | path length (2 bytes) | path
//! ```

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEdit;
use anyhow::anyhow;
use byteorder::{ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Longest path an entry can hold
pub const MAX_PATH_SIZE: usize = u16::MAX as usize;

pub const STAGED_MARKER: u8 = 0;
pub const REMOVED_MARKER: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Staged(ObjectId),
    Removed,
}

impl EntryState {
    pub fn marker(&self) -> u8 {
        match self {
            EntryState::Staged(_) => STAGED_MARKER,
            EntryState::Removed => REMOVED_MARKER,
        }
    }

    pub fn as_tree_edit(&self) -> TreeEdit {
        match self {
            EntryState::Staged(oid) => TreeEdit::Set(oid.clone()),
            EntryState::Removed => TreeEdit::Remove,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the work tree root
    pub path: PathBuf,
    pub state: EntryState,
}

impl IndexEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn staged_oid(&self) -> Option<&ObjectId> {
        match &self.state {
            EntryState::Staged(oid) => Some(oid),
            EntryState::Removed => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.state == EntryState::Removed
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self
            .path
            .to_str()
            .ok_or_else(|| anyhow!("Invalid entry path {}", self.path.display()))?;
        if path.len() > MAX_PATH_SIZE {
            return Err(anyhow!("Entry path is too long: {path}"));
        }

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u8(self.state.marker())?;
        if let EntryState::Staged(oid) = &self.state {
            oid.write_h40_to(&mut entry_bytes)?;
        }
        entry_bytes.write_u16::<byteorder::NetworkEndian>(path.len() as u16)?;
        entry_bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let state = match reader.read_u8()? {
            STAGED_MARKER => EntryState::Staged(ObjectId::read_h40_from(&mut reader)?),
            REMOVED_MARKER => EntryState::Removed,
            marker => return Err(anyhow!("Unknown index entry state: {marker}")),
        };

        let path_len = reader.read_u16::<byteorder::NetworkEndian>()? as usize;
        let mut path_bytes = vec![0u8; path_len];
        reader
            .read_exact(&mut path_bytes)
            .map_err(|_| anyhow!("Truncated index entry path"))?;
        let path = String::from_utf8(path_bytes)
            .map_err(|_| anyhow!("Invalid UTF-8 in entry path"))?;

        Ok(IndexEntry::new(PathBuf::from(path), state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap()
    }

    #[rstest]
    fn staged_entry_stores_binary_id(oid: ObjectId) -> anyhow::Result<()> {
        let entry = IndexEntry::new(PathBuf::from("dir/a.txt"), EntryState::Staged(oid));
        let bytes = entry.serialize()?;

        assert_eq!(bytes.len(), 1 + 20 + 2 + "dir/a.txt".len());
        assert_eq!(IndexEntry::deserialize(Cursor::new(bytes))?, entry);
        Ok(())
    }

    #[rstest]
    fn removed_entry_has_no_id() -> anyhow::Result<()> {
        let entry = IndexEntry::new(PathBuf::from("a.txt"), EntryState::Removed);
        let bytes = entry.serialize()?;

        assert_eq!(&bytes[..], b"\x01\0\x05a.txt");
        assert_eq!(IndexEntry::deserialize(Cursor::new(bytes))?, entry);
        Ok(())
    }

    #[rstest]
    fn unknown_state_is_rejected() {
        assert!(IndexEntry::deserialize(Cursor::new(b"\x07\0\x01a".to_vec())).is_err());
    }

    #[rstest]
    fn entries_translate_to_tree_edits(oid: ObjectId) {
        assert_eq!(
            EntryState::Staged(oid.clone()).as_tree_edit(),
            TreeEdit::Set(oid)
        );
        assert_eq!(EntryState::Removed.as_tree_edit(), TreeEdit::Remove);
    }
}
