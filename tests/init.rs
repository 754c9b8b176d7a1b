use crate::common::command::{log_commit_ids, repository_dir, run_gitlet_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn new_repository_initiated_with_gitlet_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Gitlet repository in .+\.gitlet\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    assert!(repository_dir.path().join(".gitlet/objects").is_dir());
    assert!(repository_dir.path().join(".gitlet/branches").is_file());
    Ok(())
}

#[rstest]
fn init_at_explicit_path_creates_the_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("nested").join("project");

    run_gitlet_command(repository_dir.path(), &["init", &target.display().to_string()])
        .assert()
        .success();

    assert!(target.join(".gitlet").is_dir());
    Ok(())
}

#[rstest]
fn initializing_twice_fails(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A Gitlet version-control system already exists in the current directory.",
        ));
}

#[rstest]
fn initial_commit_is_the_only_commit_on_master(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("initial commit"))
        .stdout(predicate::str::contains("Date: Sun Jan 1 12:00:00 2023 +0000"));

    assert_eq!(log_commit_ids(repository_dir.path()).len(), 1);

    run_gitlet_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== Branches ===\n*master\n\n"));
}

#[rstest]
#[case(&["status"])]
#[case(&["log"])]
#[case(&["add", "a.txt"])]
#[case(&["commit", "-m", "message"])]
#[case(&["branch", "feature"])]
#[case(&["merge", "feature"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_gitlet_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not in an initialized Gitlet directory.",
        ));

    assert!(!repository_dir.path().join(".gitlet").exists());
}
