use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("clausewise")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_login_requires_password() {
    cargo_bin_cmd!("clausewise")
        .env_remove("CLAUSEWISE_PASSWORD")
        .args(["login", "--email", "jane@x.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("clausewise")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
