use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::fmt;

/// One commit as printed by `log` and `global-log`
///
/// ```text
/// ===
/// commit <id>
/// Merge: <7 hex> <7 hex>
/// Date: <Www Mmm d HH:MM:SS YYYY +zzzz>
/// <message>
///
/// ```
pub struct LogEntry<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
}

impl<'c> LogEntry<'c> {
    pub fn new(oid: &'c ObjectId, commit: &'c Commit) -> Self {
        LogEntry { oid, commit }
    }
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.oid)?;

        if let (Some(parent), Some(merge_parent)) =
            (self.commit.parent(), self.commit.merge_parent())
        {
            writeln!(
                f,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }

        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::Tree;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn merge_commits_list_both_abbreviated_parents() {
        let commit = Commit::new(
            "Merged other into master.".to_string(),
            DateTime::parse_from_str("2017-11-09 20:00:05 -0800", "%Y-%m-%d %H:%M:%S %z").unwrap(),
            Some(oid('a')),
            Some(oid('b')),
            Tree::default(),
        );
        let id = oid('c');

        assert_eq!(
            LogEntry::new(&id, &commit).to_string(),
            format!(
                "===\ncommit {}\nMerge: aaaaaaa bbbbbbb\nDate: Thu Nov 9 20:00:05 2017 -0800\nMerged other into master.\n\n",
                "c".repeat(40)
            )
        );
    }
}
