//! Commit object
//!
//! Commits are the immutable nodes of the history DAG. Each one records:
//! - the first parent (absent only for the root commit)
//! - an optional second parent (merge commits)
//! - a timestamp with second resolution
//! - the tree: every tracked path and its blob id
//! - the message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! parent <merge-parent-sha>
//! date <unix seconds> <+zzzz>
//! file <blob-sha> <path>
//! ...
//!
//! <commit message>
//! ```
//!
//! The id is the hash of these bytes, so two commits agreeing on parents,
//! timestamp, tree and message are the same commit.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Environment variable overriding the commit clock
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    tree: Tree,
    message: String,
}

impl Commit {
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        tree: Tree,
    ) -> Self {
        Commit {
            parent,
            merge_parent,
            timestamp,
            tree,
            message,
        }
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    /// First parent then merge parent, skipping the absent ones
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.merge_parent.iter())
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// e.g. "Thu Nov 9 20:00:05 2017 -0800"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    /// Current time, or the fixed date configured through `GITLET_COMMIT_DATE`
    ///
    /// Accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`.
    pub fn timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
        match std::env::var(COMMIT_DATE_ENV) {
            Ok(date) => DateTime::parse_from_rfc2822(&date)
                .or_else(|_| DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date}")),
            Err(_) => {
                let now = chrono::Local::now().fixed_offset();
                // stored with second resolution
                Ok(now.with_nanosecond(0).unwrap_or(now))
            }
        }
    }

    fn payload(&self) -> anyhow::Result<Vec<u8>> {
        let mut payload = Vec::new();

        for parent in self.parents() {
            writeln!(payload, "parent {parent}")?;
        }
        writeln!(
            payload,
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )?;
        for (path, oid) in self.tree.entries() {
            writeln!(payload, "file {oid} {}", path.display())?;
        }
        writeln!(payload)?;
        payload.write_all(self.message.as_bytes())?;

        Ok(payload)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let payload = self.payload()?;
        self.frame(&payload)
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut entries = Vec::new();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                anyhow::bail!("Commit ended before its message");
            }
            let line = line.trim_end_matches('\n');
            if line.is_empty() {
                break;
            }

            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Malformed commit header line: {line}"))?;
            match key {
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "date" => timestamp = Some(parse_timestamp(value)?),
                "file" => {
                    let (oid, path) = value
                        .split_once(' ')
                        .with_context(|| format!("Malformed tree entry: {value}"))?;
                    entries.push((PathBuf::from(path), ObjectId::try_parse(oid.to_string())?));
                }
                _ => anyhow::bail!("Unknown commit header: {key}"),
            }
        }

        let mut message = String::new();
        reader.read_to_string(&mut message)?;

        let mut parents = parents.into_iter();
        let parent = parents.next();
        let merge_parent = parents.next();
        if parents.next().is_some() {
            anyhow::bail!("Commit has more than two parents");
        }

        Ok(Commit {
            parent,
            merge_parent,
            timestamp: timestamp.context("Commit is missing its date")?,
            tree: entries.into_iter().collect(),
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.payload()
            .map(|payload| String::from_utf8_lossy(&payload).to_string())
            .unwrap_or_default()
    }
}

// "<seconds> <+zzzz>"
fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, zone) = value
        .split_once(' ')
        .with_context(|| format!("Malformed commit date: {value}"))?;
    let seconds = seconds
        .parse::<i64>()
        .with_context(|| format!("Invalid commit timestamp: {seconds}"))?;

    if zone.len() != 5 {
        anyhow::bail!("Invalid commit timezone: {zone}");
    }
    let sign = match &zone[..1] {
        "+" => 1,
        "-" => -1,
        _ => anyhow::bail!("Invalid commit timezone: {zone}"),
    };
    let hours = zone[1..3].parse::<i32>()?;
    let minutes = zone[3..5].parse::<i32>()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("Invalid commit timezone: {zone}"))?;

    let utc = DateTime::from_timestamp(seconds, 0)
        .with_context(|| format!("Invalid commit timestamp: {seconds}"))?;
    Ok(utc.with_timezone(&offset))
}

/// Parent links of a commit, all the graph searches need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    /// First parent before merge parent
    pub parents: Vec<ObjectId>,
}

impl SlimCommit {
    pub fn from_commit(oid: ObjectId, commit: &Commit) -> Self {
        SlimCommit {
            oid,
            parents: commit.parents().cloned().collect(),
        }
    }
}
