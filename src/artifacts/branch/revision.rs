//! Commit id resolution
//!
//! Commands accept a commit id either in full or abbreviated to any unique
//! hex prefix. Only commits count as candidates: a prefix shared by one
//! commit and several blobs still resolves to that commit.

use crate::areas::database::Database;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// A full 40-character id
    Full(ObjectId),
    /// A shorter hex prefix
    Abbreviated(String),
}

impl Revision {
    /// Anything that is not hex cannot name a commit
    pub fn try_parse(revision: &str) -> anyhow::Result<Self> {
        if !ObjectId::is_hex_prefix(revision) {
            return Err(GitletError::CommitNotFound(revision.to_string()).into());
        }

        if revision.len() == OBJECT_ID_LENGTH {
            Ok(Revision::Full(ObjectId::try_parse(revision.to_string())?))
        } else {
            Ok(Revision::Abbreviated(revision.to_ascii_lowercase()))
        }
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Full(oid) => {
                if !database.contains(oid) || database.parse_object_as_commit(oid)?.is_none() {
                    return Err(GitletError::CommitNotFound(oid.to_string()).into());
                }

                Ok(oid.clone())
            }
            Revision::Abbreviated(prefix) => {
                let mut commits = Vec::new();
                for oid in database.find_objects_by_prefix(prefix)? {
                    if database.parse_object_as_commit(&oid)?.is_some() {
                        commits.push(oid);
                    }
                }

                match commits.len() {
                    0 => Err(GitletError::CommitNotFound(prefix.clone()).into()),
                    1 => Ok(commits.remove(0)),
                    _ => Err(GitletError::AmbiguousCommitId(prefix.clone()).into()),
                }
            }
        }
    }
}
