use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn gnotes(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gnotes").unwrap();
    cmd.env("GNOTES_HOME", home)
        .env_remove("GNOTES_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn quick_add_then_list() {
    let home = tempfile::tempdir().unwrap();

    gnotes(home.path())
        .args(["qa", "buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 added"));
    gnotes(home.path())
        .args(["qa", "call mom"])
        .assert()
        .success();

    gnotes(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"))
        .stdout(predicate::str::contains("call mom"));

    // The document lives in the remote directory under the home root
    let document = std::fs::read_to_string(home.path().join("remote/notes.json")).unwrap();
    assert!(document.contains("buy milk"));
}

#[test]
fn done_notes_leave_the_todo_list() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path()).args(["qa", "first"]).assert().success();
    gnotes(home.path()).args(["qa", "second"]).assert().success();

    gnotes(home.path())
        .args(["done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 marked as done"));

    gnotes(home.path())
        .arg("todo")
        .assert()
        .success()
        .stdout(predicate::str::contains("second"))
        .stdout(predicate::str::contains("first").not());

    gnotes(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("first"));
}

#[test]
fn tags_priority_and_due() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path()).args(["qa", "taxes"]).assert().success();
    gnotes(home.path()).args(["qa", "groceries"]).assert().success();

    gnotes(home.path()).args(["tag", "1", "home"]).assert().success();
    gnotes(home.path()).args(["tag", "2", "home"]).assert().success();
    gnotes(home.path()).args(["tag", "1", "money"]).assert().success();

    gnotes(home.path())
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("home (2)"))
        .stdout(predicate::str::contains("money (1)"));

    gnotes(home.path())
        .args(["list", "-t", "money"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taxes"))
        .stdout(predicate::str::contains("groceries").not());

    gnotes(home.path()).args(["prio", "1", "5"]).assert().success();
    gnotes(home.path())
        .args(["list", "-p", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taxes"))
        .stdout(predicate::str::contains("groceries").not());

    gnotes(home.path())
        .args(["due", "2", "24.12.2030"])
        .assert()
        .success();
    gnotes(home.path())
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("24.12.2030"));
}

#[test]
fn remove_and_show() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path())
        .args(["qa", "short lived"])
        .assert()
        .success();
    gnotes(home.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("short lived"));

    gnotes(home.path()).args(["rm", "1"]).assert().success();
    gnotes(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn unknown_note_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path())
        .args(["done", "42"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Could not find note with id 42"));
}

#[test]
fn invalid_values_are_errors() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path()).args(["qa", "x"]).assert().success();

    gnotes(home.path())
        .args(["due", "1", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid due date"));
    gnotes(home.path())
        .args(["list", "-o", "size"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn config_show_and_set() {
    let home = tempfile::tempdir().unwrap();

    gnotes(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("dueFormat"))
        .stdout(predicate::str::contains("usePriority"));

    gnotes(home.path())
        .args(["config", "defaultPriority", "4"])
        .assert()
        .success();
    gnotes(home.path())
        .args(["config", "defaultPriority"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));

    gnotes(home.path()).args(["qa", "important"]).assert().success();
    gnotes(home.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prio: 4"));
}

#[test]
fn clear_with_yes_removes_everything() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path()).args(["qa", "one"]).assert().success();
    gnotes(home.path()).args(["qa", "two"]).assert().success();

    gnotes(home.path())
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 notes"));
    gnotes(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn help_exits_cleanly() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("qa"));
    gnotes(home.path())
        .args(["help", "due"])
        .assert()
        .success()
        .stdout(predicate::str::contains("due date"));
}

#[test]
fn invalid_config_exits_with_error() {
    let home = tempfile::tempdir().unwrap();

    gnotes(home.path())
        .args(["config", "defaultCategory", "size"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid category"));
    gnotes(home.path())
        .args(["config", "bogus"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key: bogus"));
}

#[test]
fn urls_reports_notes_without_links() {
    let home = tempfile::tempdir().unwrap();
    gnotes(home.path())
        .args(["qa", "nothing to click"])
        .assert()
        .success();

    gnotes(home.path())
        .args(["u", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note 1 did not contain any urls"));
    gnotes(home.path())
        .args(["urls", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find note with id 9"));
}
