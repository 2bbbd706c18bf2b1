// Binary-level tests for the cogwright command

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn cogwright() -> Command {
    Command::cargo_bin("cogwright").expect("binary built")
}

#[test]
fn test_version() {
    cogwright()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("cogwright v{}", env!("CARGO_PKG_VERSION"))))
        .stdout(predicate::str::contains("system info"));
}

#[test]
fn test_build_fixture() {
    let output = TempDir::new().unwrap();

    cogwright()
        .current_dir(fixtures_path("shop"))
        .args(["build", "--output"])
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unresolved attribute tables (1)"))
        .stdout(predicate::str::contains("shop.Phantom"))
        .stdout(predicate::str::contains("3 attribute tables"));

    assert!(output.path().join("api.html").exists());
    assert!(output.path().join("guide/widgets.html").exists());
    assert!(output.path().join("objects.json").exists());
}

#[test]
fn test_build_verbose_logs_to_stderr() {
    let output = TempDir::new().unwrap();

    cogwright()
        .current_dir(fixtures_path("shop"))
        .args(["build", "--verbose", "--output"])
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Sources: src"))
        .stderr(predicate::str::contains("attribute table skipped"));
}

#[test]
fn test_build_missing_docs_fails() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.py"), "class App:\n    pass\n").unwrap();

    cogwright()
        .current_dir(dir.path())
        .args(["build", "--source", "src", "--docs", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Path not found"));
}

#[test]
fn test_build_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cogwright.toml"), "[table]\nmethods_label = \"Attributes\"\n").unwrap();

    cogwright()
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config validation error"));
}

#[test]
fn test_newbot() {
    let dir = TempDir::new().unwrap();

    cogwright()
        .current_dir(dir.path())
        .args(["newbot", "mybot", "--prefix", "!", "--no-git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully made bot at"));

    let root = dir.path().join("mybot");
    assert!(root.join("bot.py").exists());
    assert!(root.join("config.py").exists());
    assert!(root.join("cogs/__init__.py").exists());
    assert!(!root.join(".gitignore").exists());

    let bot = fs::read_to_string(root.join("bot.py")).unwrap();
    assert!(bot.contains("when_mentioned_or('!')"));
}

#[test]
fn test_newcog() {
    let dir = TempDir::new().unwrap();

    cogwright()
        .current_dir(dir.path())
        .args(["newcog", "event_log", "--hide-commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully made cog at"));

    let cog = fs::read_to_string(dir.path().join("cogs/event_log.py")).unwrap();
    assert!(cog.contains("class EventLog(commands.Cog, command_attrs=dict(hidden=True)):"));
}

#[test]
fn test_unknown_command() {
    cogwright().arg("serve").assert().failure();
}
