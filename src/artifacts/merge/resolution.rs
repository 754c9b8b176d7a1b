//! Three-way resolution
//!
//! Every path is decided by comparing its blob id at the split point (L),
//! on the current branch (C) and on the merged-in branch (O). Paths seen in
//! L, plus paths O added since L, are considered; a path only C touched is
//! already right in C's tree.
//!
//! | L   | C, O                | action              |
//! |-----|---------------------|---------------------|
//! | yes | both, C == O        | unchanged           |
//! | yes | both, O == L        | unchanged           |
//! | yes | both, C == L        | take O              |
//! | yes | both, all differ    | conflict            |
//! | yes | O only, O == L      | unchanged           |
//! | yes | O only, O != L      | conflict            |
//! | yes | C only, C == L      | remove              |
//! | yes | C only, C != L      | conflict            |
//! | yes | neither             | unchanged           |
//! | no  | O only              | take O              |
//! | no  | both, C != O        | conflict            |
//! | no  | both, C == O        | unchanged           |

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_TAIL_MARKER: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// The current tree is already right for this path
    Unchanged,
    /// Write and stage the other branch's blob
    TakeOther(ObjectId),
    /// Stage the removal of the path
    Remove,
    /// Both sides changed the path differently; either side may be absent
    Conflict {
        current: Option<ObjectId>,
        other: Option<ObjectId>,
    },
}

pub fn resolve_path(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> MergeAction {
    let conflict = || MergeAction::Conflict {
        current: current.cloned(),
        other: other.cloned(),
    };

    match (split, current, other) {
        (Some(l), Some(c), Some(o)) => {
            if c == o || o == l {
                MergeAction::Unchanged
            } else if c == l {
                MergeAction::TakeOther(o.clone())
            } else {
                conflict()
            }
        }
        (Some(l), None, Some(o)) if o == l => MergeAction::Unchanged,
        (Some(_), None, Some(_)) => conflict(),
        (Some(l), Some(c), None) if c == l => MergeAction::Remove,
        (Some(_), Some(_), None) => conflict(),
        (Some(_), None, None) => MergeAction::Unchanged,
        (None, None, Some(o)) => MergeAction::TakeOther(o.clone()),
        (None, Some(c), Some(o)) if c != o => conflict(),
        (None, _, _) => MergeAction::Unchanged,
    }
}

/// Decide every path of a merge, skipping the unchanged ones
pub fn plan_merge(split: &Tree, current: &Tree, other: &Tree) -> BTreeMap<PathBuf, MergeAction> {
    split
        .paths()
        .chain(other.paths().filter(|path| !split.contains(path)))
        .filter_map(|path| {
            match resolve_path(split.get(path), current.get(path), other.get(path)) {
                MergeAction::Unchanged => None,
                action => Some((path.clone(), action)),
            }
        })
        .collect()
}

/// Working-file content recorded for a conflicted path
pub fn conflict_content(current: Option<&[u8]>, other: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    let mut content = Vec::with_capacity(
        CONFLICT_HEAD_MARKER.len()
            + current.len()
            + CONFLICT_SEPARATOR.len()
            + other.len()
            + CONFLICT_TAIL_MARKER.len(),
    );
    content.extend_from_slice(CONFLICT_HEAD_MARKER.as_bytes());
    content.extend_from_slice(current);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.extend_from_slice(other);
    content.extend_from_slice(CONFLICT_TAIL_MARKER.as_bytes());

    Bytes::from(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn conflict(current: Option<char>, other: Option<char>) -> MergeAction {
        MergeAction::Conflict {
            current: current.map(oid),
            other: other.map(oid),
        }
    }

    #[rstest]
    #[case::same_change_on_both_sides(Some('a'), Some('f'), Some('f'), MergeAction::Unchanged)]
    #[case::only_current_changed(Some('a'), Some('c'), Some('a'), MergeAction::Unchanged)]
    #[case::only_other_changed(Some('a'), Some('a'), Some('e'), MergeAction::TakeOther(oid('e')))]
    #[case::both_changed_differently(Some('a'), Some('c'), Some('e'), conflict(Some('c'), Some('e')))]
    #[case::current_deleted_other_untouched(Some('a'), None, Some('a'), MergeAction::Unchanged)]
    #[case::current_deleted_other_modified(Some('a'), None, Some('e'), conflict(None, Some('e')))]
    #[case::other_deleted_current_untouched(Some('a'), Some('a'), None, MergeAction::Remove)]
    #[case::other_deleted_current_modified(Some('a'), Some('c'), None, conflict(Some('c'), None))]
    #[case::both_deleted(Some('a'), None, None, MergeAction::Unchanged)]
    #[case::added_by_other_only(None, None, Some('e'), MergeAction::TakeOther(oid('e')))]
    #[case::added_differently_on_both(None, Some('c'), Some('e'), conflict(Some('c'), Some('e')))]
    #[case::added_identically_on_both(None, Some('f'), Some('f'), MergeAction::Unchanged)]
    fn each_row_produces_its_action(
        #[case] split: Option<char>,
        #[case] current: Option<char>,
        #[case] other: Option<char>,
        #[case] expected: MergeAction,
    ) {
        let (split, current, other) = (split.map(oid), current.map(oid), other.map(oid));

        assert_eq!(
            resolve_path(split.as_ref(), current.as_ref(), other.as_ref()),
            expected
        );
    }

    #[test]
    fn plan_ignores_paths_only_the_current_branch_touched() {
        let split = Tree::from_iter([(PathBuf::from("base.txt"), oid('1'))]);
        let current = Tree::from_iter([
            (PathBuf::from("base.txt"), oid('1')),
            (PathBuf::from("mine.txt"), oid('2')),
        ]);
        let other = Tree::from_iter([(PathBuf::from("theirs.txt"), oid('3'))]);

        let plan = plan_merge(&split, &current, &other);

        assert_eq!(
            plan,
            BTreeMap::from([
                (PathBuf::from("base.txt"), MergeAction::Remove),
                (PathBuf::from("theirs.txt"), MergeAction::TakeOther(oid('3'))),
            ])
        );
    }

    #[test]
    fn conflict_block_wraps_both_sides() {
        assert_eq!(
            conflict_content(Some(b"mine\n"), Some(b"theirs\n")),
            Bytes::from_static(b"<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>>\n")
        );
    }

    #[test]
    fn absent_side_is_left_empty() {
        assert_eq!(
            conflict_content(None, Some(b"theirs\n")),
            Bytes::from_static(b"<<<<<<< HEAD\n=======\ntheirs\n>>>>>>>\n")
        );
        assert_eq!(
            conflict_content(Some(b"mine\n"), None),
            Bytes::from_static(b"<<<<<<< HEAD\nmine\n=======\n>>>>>>>\n")
        );
    }
}
