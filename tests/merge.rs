use crate::common::command::{
    commit_file, gitlet_add, gitlet_checkout_branch, gitlet_commit, gitlet_merge, head_commit_id,
    init_repository_dir, log_commit_ids, run_gitlet_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use rstest::rstest;
use std::path::Path;

mod common;

fn branch(dir: &Path, name: &str) {
    run_gitlet_command(dir, &["branch", name])
        .assert()
        .success();
}

fn remove_and_commit(dir: &Path, file: &str, message: &str) {
    run_gitlet_command(dir, &["rm", file]).assert().success();
    gitlet_commit(dir, message).assert().success();
}

/// History:
///       A (add a and b)
///      / \
///     B   C
///     |   |
///   master  feature
#[rstest]
fn merge_simple_divergence(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "master.txt", "master\n", "master side");
    remove_and_commit(dir, "b.txt", "master drops b");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "a.txt", "a from feature\n", "feature edits a");
    commit_file(dir, "feature.txt", "feature\n", "feature adds a file");
    gitlet_checkout_branch(dir, "master").assert().success();

    gitlet_merge(dir, "feature")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(&dir.join("a.txt")), "a from feature\n");
    assert_eq!(read_file(&dir.join("master.txt")), "master\n");
    assert_eq!(read_file(&dir.join("feature.txt")), "feature\n");
    assert!(!dir.join("b.txt").exists());
    run_gitlet_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged feature into master."));
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"))
        .stdout(predicate::str::contains(
            "=== Modifications Not Staged For Commit ===\n\n",
        ));
}

#[rstest]
fn deleted_on_the_other_side_and_unchanged_here_is_removed(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "master.txt", "master\n", "master side");
    gitlet_checkout_branch(dir, "feature").assert().success();
    remove_and_commit(dir, "b.txt", "feature drops b");
    gitlet_checkout_branch(dir, "master").assert().success();

    gitlet_merge(dir, "feature").assert().success();

    assert!(!dir.join("b.txt").exists());
    run_gitlet_command(dir, &["checkout", "--", "b.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist in that commit."));
}

#[rstest]
fn conflicting_edits_leave_markers_and_still_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "a.txt", "master version\n", "master edits a");
    remove_and_commit(dir, "b.txt", "master drops b");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "a.txt", "feature version\n", "feature edits a");
    commit_file(dir, "b.txt", "feature b\n", "feature edits b");
    let feature_tip = head_commit_id(dir);
    gitlet_checkout_branch(dir, "master").assert().success();
    let master_tip = head_commit_id(dir);

    gitlet_merge(dir, "feature")
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.join("a.txt")),
        "<<<<<<< HEAD\nmaster version\n=======\nfeature version\n>>>>>>>\n"
    );
    assert_eq!(
        read_file(&dir.join("b.txt")),
        "<<<<<<< HEAD\n=======\nfeature b\n>>>>>>>\n"
    );

    let log = String::from_utf8(
        run_gitlet_command(dir, &["log"])
            .output()
            .expect("Failed to run log")
            .stdout,
    )
    .expect("Log output is not UTF-8");
    assert!(log.contains(&format!(
        "Merge: {} {}",
        &master_tip[..7],
        &feature_tip[..7]
    )));

    // the conflicted content is what the merge commit recorded
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Modifications Not Staged For Commit ===\n\n",
        ));
}

#[rstest]
fn file_added_on_both_sides_with_different_content_conflicts(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "new.txt", "from master\n", "master adds new");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "new.txt", "from feature\n", "feature adds new");
    gitlet_checkout_branch(dir, "master").assert().success();

    gitlet_merge(dir, "feature")
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.join("new.txt")),
        "<<<<<<< HEAD\nfrom master\n=======\nfrom feature\n>>>>>>>\n"
    );
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "f.txt", "f\n", "feature ahead");
    let feature_tip = head_commit_id(dir);
    gitlet_checkout_branch(dir, "master").assert().success();

    gitlet_merge(dir, "feature")
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(head_commit_id(dir), feature_tip);
    assert_eq!(log_commit_ids(dir).len(), 3);
    assert_eq!(read_file(&dir.join("f.txt")), "f\n");
}

#[rstest]
fn merging_an_ancestor_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "old");
    commit_file(dir, "a.txt", "newer\n", "master ahead");
    let head = head_commit_id(dir);

    gitlet_merge(dir, "old")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Given branch is an ancestor of the current branch.",
        ));

    assert_eq!(head_commit_id(dir), head);
}

#[rstest]
fn merging_the_current_branch_fails(init_repository_dir: TempDir) {
    gitlet_merge(init_repository_dir.path(), "master")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot merge a branch with itself."));
}

#[rstest]
fn merging_an_unknown_branch_fails(init_repository_dir: TempDir) {
    gitlet_merge(init_repository_dir.path(), "ghost")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}

#[rstest]
fn merging_with_staged_changes_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    write_file(FileSpec::new(dir.join("a.txt"), "staged\n".to_string()));
    gitlet_add(dir, "a.txt").assert().success();

    gitlet_merge(dir, "feature")
        .assert()
        .failure()
        .stderr(predicate::str::contains("You have uncommitted changes."));
}

#[rstest]
fn merge_refuses_to_overwrite_untracked_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "m.txt", "m\n", "master side");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "f.txt", "f\n", "feature side");
    gitlet_checkout_branch(dir, "master").assert().success();
    let head = head_commit_id(dir);
    write_file(FileSpec::new(dir.join("f.txt"), "local\n".to_string()));

    gitlet_merge(dir, "feature")
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert_eq!(head_commit_id(dir), head);
    assert_eq!(read_file(&dir.join("f.txt")), "local\n");
}

/// History:
///        A
///       / \
///      B   C
///      |\ /|
///      | X |
///      |/ \|
///      D   E
///   master feature
///
/// B and C are both common ancestors of D and E.
#[rstest]
fn criss_cross_merge_completes(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    branch(dir, "feature");
    commit_file(dir, "m.txt", "m\n", "B on master");
    branch(dir, "b-tip");
    gitlet_checkout_branch(dir, "feature").assert().success();
    commit_file(dir, "f.txt", "f\n", "C on feature");
    branch(dir, "c-tip");

    gitlet_checkout_branch(dir, "master").assert().success();
    gitlet_merge(dir, "c-tip").assert().success();
    commit_file(dir, "x.txt", "x\n", "master after criss-cross");

    gitlet_checkout_branch(dir, "feature").assert().success();
    gitlet_merge(dir, "b-tip").assert().success();
    commit_file(dir, "y.txt", "y\n", "feature after criss-cross");

    gitlet_checkout_branch(dir, "master").assert().success();
    gitlet_merge(dir, "feature")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    for (file, content) in [("m.txt", "m\n"), ("f.txt", "f\n"), ("x.txt", "x\n"), ("y.txt", "y\n")] {
        assert_eq!(read_file(&dir.join(file)), content);
    }
    run_gitlet_command(dir, &["find", "Merged feature into master."])
        .assert()
        .success();
}
