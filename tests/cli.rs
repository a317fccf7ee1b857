use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mindful(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mindful").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sit"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_durations_default_list() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .args(["durations", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"minutes\""))
        .stdout(predicate::str::contains("30"));
}

#[test]
fn test_durations_from_config() {
    let home = TempDir::new().unwrap();
    let root = home.path().join(".mindful");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("config.yaml"),
        "meditation:\n  durations_minutes: [20, 3]\ngeneral:\n  default_output: json\n",
    )
    .unwrap();

    mindful(&home)
        .arg("durations")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 2"));
}

#[test]
fn test_empty_history() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 sessions"));

    assert!(home.path().join(".mindful").join("journal.db").exists());
}

#[test]
fn test_report_on_empty_journal() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .args(["report", "--period", "month"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meditation Report: This Month"));
}

#[test]
fn test_login_whoami_logout() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .args(["login", "ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as ana"));

    mindful(&home)
        .args(["whoami", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"user\": \"ana\""));

    mindful(&home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    mindful(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_sit_rejects_unlisted_duration() {
    let home = TempDir::new().unwrap();

    mindful(&home)
        .args(["sit", "--duration", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("7 minutes"));
}

#[test]
fn test_bad_config_fails() {
    let home = TempDir::new().unwrap();
    let root = home.path().join(".mindful");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("config.yaml"), "general: [oops").unwrap();

    mindful(&home)
        .arg("durations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}
