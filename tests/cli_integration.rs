//! Integration tests for the filevault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! password is supplied through `FILEVAULT_PASSWORD` and each test writes a
//! `.filevault.toml` with the cheapest Argon2 cost so runs stay fast.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "integration-pw";

/// Helper: get a Command pointing at the filevault binary.
fn filevault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("filevault").expect("binary should exist")
}

/// A temp working directory with a fast config.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".filevault.toml")
        .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\n")
        .unwrap();
    tmp
}

/// Run a subcommand inside `tmp` with the given password.
fn run(tmp: &TempDir, password: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    filevault()
        .current_dir(tmp.path())
        .env("FILEVAULT_PASSWORD", password)
        .env_remove("FILEVAULT_LOG")
        .args(args)
        .assert()
}

fn init_user(tmp: &TempDir) {
    run(tmp, PASSWORD, &["init-user"])
        .success()
        .stdout(predicate::str::contains("User created"));
}

// ---------------------------------------------------------------------------
// Help and usage
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    filevault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Password-protected file and directory encryption",
        ))
        .stdout(predicate::str::contains("init-user"))
        .stdout(predicate::str::contains("encrypt"))
        .stdout(predicate::str::contains("decrypt"));
}

#[test]
fn version_flag_shows_version() {
    filevault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("filevault"));
}

#[test]
fn no_args_shows_help() {
    filevault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_path_exits_with_no_input() {
    let tmp = workspace();
    run(&tmp, PASSWORD, &["encrypt"])
        .code(2)
        .stderr(predicate::str::contains("File not provided"));
}

// ---------------------------------------------------------------------------
// init-user
// ---------------------------------------------------------------------------

#[test]
fn init_user_creates_credential_file() {
    let tmp = workspace();
    init_user(&tmp);

    tmp.child("user.pass")
        .assert(predicate::str::starts_with("$argon2id$"));
}

#[test]
fn init_user_twice_keeps_the_first_user() {
    let tmp = workspace();
    init_user(&tmp);
    let before = std::fs::read_to_string(tmp.child("user.pass").path()).unwrap();

    run(&tmp, "another-password", &["init-user"])
        .success()
        .stdout(predicate::str::contains("already initialized"));

    let after = std::fs::read_to_string(tmp.child("user.pass").path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn init_user_rejects_short_password() {
    let tmp = workspace();
    run(&tmp, "short", &["init-user"])
        .code(1)
        .stderr(predicate::str::contains("at least 8 characters"));
    tmp.child("user.pass").assert(predicate::path::missing());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[test]
fn encrypt_without_user_fails_login() {
    let tmp = workspace();
    tmp.child("secret.txt").write_str("data").unwrap();

    run(&tmp, PASSWORD, &["encrypt", "secret.txt"])
        .code(3)
        .stderr(predicate::str::contains("not initialized"));
    tmp.child("secret.enc").assert(predicate::path::missing());
}

#[test]
fn wrong_password_fails_login() {
    let tmp = workspace();
    init_user(&tmp);
    tmp.child("secret.txt").write_str("data").unwrap();

    run(&tmp, "not-the-password", &["encrypt", "secret.txt"])
        .code(3)
        .stderr(predicate::str::contains("Login failed"));
    tmp.child("secret.enc").assert(predicate::path::missing());
}

// ---------------------------------------------------------------------------
// Encrypt / decrypt
// ---------------------------------------------------------------------------

#[test]
fn encrypt_and_decrypt_a_directory() {
    let tmp = workspace();
    init_user(&tmp);
    tmp.child("docs/a.txt").write_str("alpha").unwrap();
    tmp.child("docs/sub/b.txt").write_str("bravo").unwrap();

    run(&tmp, PASSWORD, &["encrypt", "docs", "--rm"])
        .success()
        .stdout(predicate::str::contains("Encrypted 2 file(s)"));

    tmp.child("docs/a.txt").assert(predicate::path::missing());
    tmp.child("docs/a.enc").assert(predicate::path::exists());
    tmp.child("docs/sub/b.enc").assert(predicate::path::exists());

    run(&tmp, PASSWORD, &["decrypt", "docs", ".txt", "--delete"])
        .success()
        .stdout(predicate::str::contains("Decrypted 2 file(s)"));

    tmp.child("docs/a.txt").assert("alpha");
    tmp.child("docs/sub/b.txt").assert("bravo");
    tmp.child("docs/a.enc").assert(predicate::path::missing());
}

#[test]
fn decrypt_uses_default_suffix() {
    let tmp = workspace();
    init_user(&tmp);
    tmp.child("note.md").write_str("remember").unwrap();

    run(&tmp, PASSWORD, &["encrypt", "note.md"]).success();
    tmp.child("note.md").assert("remember");

    run(&tmp, PASSWORD, &["decrypt", "note.enc"]).success();
    tmp.child("note.dec").assert("remember");
}

#[test]
fn credential_file_is_never_encrypted() {
    let tmp = workspace();
    init_user(&tmp);
    tmp.child("plain.txt").write_str("data").unwrap();

    run(&tmp, PASSWORD, &["encrypt", "."]).success();

    tmp.child("user.pass")
        .assert(predicate::str::starts_with("$argon2id$"));
    tmp.child("user.enc").assert(predicate::path::missing());
    tmp.child("plain.enc").assert(predicate::path::exists());
}

#[test]
fn corrupted_container_fails_the_operation() {
    let tmp = workspace();
    init_user(&tmp);
    tmp.child("broken.enc")
        .write_str("SEALv1 but nothing else")
        .unwrap();

    run(&tmp, PASSWORD, &["decrypt", "broken.enc"])
        .code(4)
        .stderr(predicate::str::contains("broken.enc"));
    tmp.child("broken.dec").assert(predicate::path::missing());
}
