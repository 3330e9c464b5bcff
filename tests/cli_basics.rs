mod common;

use assert_cmd::cargo;
use common::{TestRepo, png_bytes};
use predicates::prelude::*;
use std::fs;

/// The binary, isolated from the developer's config and provider env vars.
fn opencommit(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("OCO_AI_PROVIDER")
        .env_remove("OCO_MODEL")
        .env_remove("OCO_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OCO_MAX_DIFF_CHARS")
        .env_remove("OCO_MESSAGE_TEMPLATE_PLACEHOLDER");
    cmd
}

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage"));
}

#[test]
fn prints_version() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn outside_a_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ceiling = dir.path().parent().unwrap().to_path_buf();

    opencommit(dir.path())
        .env("GIT_CEILING_DIRECTORIES", ceiling)
        .arg("--no-model")
        .assert()
        .failure()
        .stderr(predicates::str::contains("not a git repository"));
}

#[test]
fn nothing_staged_is_not_an_error() {
    let repo = TestRepo::new();

    opencommit(repo.path())
        .args(["--no-model", "-y"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No staged changes found."));
}

#[test]
fn dry_run_shows_filtered_diff_and_note() {
    let repo = TestRepo::new();
    repo.write("a.py", "print('hi')\n");
    repo.write("yarn.lock", "# yarn lockfile v1\n");
    repo.stage(&["a.py", "yarn.lock"]);

    opencommit(repo.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicates::str::contains("+print('hi')"))
        .stdout(predicates::str::contains("yarn.lock (ignore pattern)"))
        .stdout(predicates::str::contains("# yarn lockfile v1").not())
        .stderr(predicates::str::contains("excluded from LLM context"));
}

#[test]
fn dry_run_with_everything_excluded_prints_only_the_note() {
    let repo = TestRepo::new();
    repo.write("Cargo.lock", "version = 3\n");
    repo.stage(&["Cargo.lock"]);

    opencommit(repo.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicates::str::starts_with("# Note: 1 staged file(s)"))
        .stdout(predicates::str::contains("diff --git").not());
}

#[test]
fn all_files_excluded_skips_the_model() {
    let repo = TestRepo::new();
    repo.write("yarn.lock", "lock\n");
    repo.stage(&["yarn.lock"]);

    opencommit(repo.path())
        .args(["--no-model", "-y"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("excluded from LLM context"));

    let log = std::process::Command::new("git")
        .args(["rev-parse", "--verify", "-q", "HEAD"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert!(!log.status.success(), "nothing should have been committed");
}

#[test]
fn commit_includes_files_hidden_from_the_model() {
    let repo = TestRepo::new();
    repo.write("a.py", "print('hi')\n");
    repo.write("yarn.lock", "# yarn lockfile v1\n");
    repo.write("image.png", png_bytes());
    repo.stage(&["a.py", "yarn.lock", "image.png"]);

    opencommit(repo.path())
        .args(["--no-model", "-y"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Commit Message Preview"));

    let subject = repo.git(&["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "chore: update 1 file(s)");

    let files = repo.git(&["show", "--name-only", "--format=", "HEAD"]);
    let files: Vec<&str> = files.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(files, vec!["a.py", "image.png", "yarn.lock"]);
}

#[test]
fn message_file_receives_the_message() {
    let repo = TestRepo::new();
    repo.write("src/lib.rs", "pub fn f() {}\n");
    repo.stage(&["src/lib.rs"]);
    let msg_file = repo.path().join("MSG");
    fs::write(&msg_file, "# comment from git\n").unwrap();

    opencommit(repo.path())
        .args(["--no-model", "--message-file"])
        .arg(&msg_file)
        .assert()
        .success();

    let written = fs::read_to_string(&msg_file).unwrap();
    assert!(written.starts_with("chore: update 1 file(s)\n\n- `src/lib.rs`"));
    assert!(written.contains("# comment from git"));
}

#[test]
fn message_file_is_left_alone_when_everything_is_excluded() {
    let repo = TestRepo::new();
    repo.write("yarn.lock", "# yarn lockfile v1\n");
    repo.stage(&["yarn.lock"]);
    let msg_file = repo.path().join("MSG");
    let original = "\n# Please enter the commit message for your changes.\n";
    fs::write(&msg_file, original).unwrap();

    opencommit(repo.path())
        .args(["--no-model", "--message-file"])
        .arg(&msg_file)
        .assert()
        .success()
        .stderr(predicates::str::contains("excluded from LLM context"));

    assert_eq!(fs::read_to_string(&msg_file).unwrap(), original);
}

#[test]
fn message_file_is_left_alone_when_the_model_is_unavailable() {
    let repo = TestRepo::new();
    repo.write("a.py", "print('hi')\n");
    repo.stage(&["a.py"]);
    let msg_file = repo.path().join("MSG");
    fs::write(&msg_file, "# git comment\n").unwrap();

    // OpenAI is the default provider and no key is configured.
    opencommit(repo.path())
        .arg("--message-file")
        .arg(&msg_file)
        .assert()
        .success()
        .stderr(predicates::str::contains("OCO_API_KEY"));

    assert_eq!(fs::read_to_string(&msg_file).unwrap(), "# git comment\n");
}

#[test]
fn git_arg_template_wraps_the_message() {
    let repo = TestRepo::new();
    repo.write("a.py", "print('hi')\n");
    repo.stage(&["a.py"]);

    opencommit(repo.path())
        .args([
            "--no-model",
            "-y",
            "--git-arg",
            "--template-msg=[JIRA-1] $msg",
            "--git-arg",
            "--no-verify",
        ])
        .assert()
        .success();

    let subject = repo.git(&["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "[JIRA-1] chore: update 1 file(s)");
}

#[test]
fn hook_set_and_unset() {
    let repo = TestRepo::new();
    let hook_path = repo.path().join(".git/hooks/prepare-commit-msg");

    opencommit(repo.path())
        .args(["hook", "set"])
        .assert()
        .success()
        .stdout(predicates::str::contains("hook installed"));
    let script = fs::read_to_string(&hook_path).unwrap();
    assert!(script.contains("opencommit --message-file"));

    opencommit(repo.path())
        .args(["hook", "unset"])
        .assert()
        .success()
        .stdout(predicates::str::contains("hook removed"));
    assert!(!hook_path.exists());

    opencommit(repo.path())
        .args(["hook", "unset"])
        .assert()
        .success()
        .stdout(predicates::str::contains("no prepare-commit-msg hook found"));
}

#[test]
fn hook_set_refuses_foreign_hook() {
    let repo = TestRepo::new();
    let hooks = repo.path().join(".git/hooks");
    fs::create_dir_all(&hooks).unwrap();
    fs::write(hooks.join("prepare-commit-msg"), "#!/bin/sh\necho custom\n").unwrap();

    opencommit(repo.path())
        .args(["hook", "set"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not installed by opencommit"));
}
