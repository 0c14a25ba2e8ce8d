//! Account commands against a mock auth backend.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_home() -> TempDir {
    TempDir::new().expect("create temp clausewise home")
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[test]
fn test_whoami_without_session() {
    let home = temp_home();

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_malformed_session_counts_as_logged_out() {
    let home = temp_home();
    std::fs::write(home.path().join("session.json"), "{not json").unwrap();

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn test_login_persists_session_until_logout() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "jane@x.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": { "name": "Jane", "email": "jane@x.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .env("CLAUSEWISE_PASSWORD", "pw")
        .args(["--api-url", &server.uri(), "login", "--email", "jane@x.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Jane <jane@x.com>"));

    assert!(home.path().join("session.json").exists());

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane <jane@x.com>"));

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .arg("logout")
        .assert()
        .success();

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn test_rejected_login_fails_with_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .env("CLAUSEWISE_API_URL", server.uri())
        .args(["login", "--email", "jane@x.com", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_signup_does_not_log_in() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "User created" })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .args([
            "--api-url",
            &server.uri(),
            "signup",
            "--name",
            "Jane",
            "--email",
            "jane@x.com",
            "--password",
            "pw",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("User created"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_status_reports_ready_service() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health_check"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .args(["--api-url", &server.uri(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking server status..."))
        .stdout(predicate::str::contains("Contract Analysis Server is ready!"))
        .stdout(predicate::str::contains("/contract-analysis"));
}

#[tokio::test]
async fn test_interactive_login_flow() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "name": "Jane", "email": "jane@x.com" }
        })))
        .mount(&server)
        .await;

    // No quit: the app exits at end of input once stdin closes.
    cargo_bin_cmd!("clausewise")
        .env("CLAUSEWISE_HOME", home.path())
        .env("CLAUSEWISE_API_URL", server.uri())
        .write_stdin("start\nlogin jane@x.com pw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("== ClauseWise =="))
        .stdout(predicate::str::contains("== Sign in =="));
}
