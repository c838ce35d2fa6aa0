//! Integration tests for the OtpVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The OTP challenge is interactive, so the unlocked paths are covered
//! by the library tests; here we check help output, `init`, and that a
//! wrong passcode keeps the vault locked.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the otpvault binary.
fn otpvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("otpvault").expect("binary should exist");
    cmd.env_remove("OTPVAULT_SECRET").env_remove("OTPVAULT_OTP");
    cmd
}

/// A passcode that cannot match: TOTP codes are all digits.
const BAD_OTP: &str = "abcdef";

#[test]
fn help_flag_shows_usage() {
    otpvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OTP-gated local password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_flag_shows_version() {
    otpvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("otpvault"));
}

#[test]
fn no_args_shows_help() {
    otpvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn add_requires_site_and_username() {
    otpvault()
        .arg("add")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<SITE>"));
}

#[test]
fn init_creates_vault_and_secret_file() {
    let tmp = TempDir::new().unwrap();

    otpvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("otpauth://totp/"));

    let vault_dir = tmp.path().join(".otpvault");
    assert!(vault_dir.join("vault.db").exists());

    let secret = std::fs::read_to_string(vault_dir.join("otp.secret")).unwrap();
    assert!(otpvault::otp::SharedSecret::from_base32(secret.trim()).is_ok());
}

#[test]
fn init_no_save_skips_secret_file() {
    let tmp = TempDir::new().unwrap();

    otpvault()
        .current_dir(tmp.path())
        .args(["init", "--no-save"])
        .assert()
        .success();

    let vault_dir = tmp.path().join(".otpvault");
    assert!(vault_dir.join("vault.db").exists());
    assert!(!vault_dir.join("otp.secret").exists());
}

#[test]
fn init_twice_fails() {
    let tmp = TempDir::new().unwrap();

    otpvault().current_dir(tmp.path()).arg("init").assert().success();

    otpvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault already exists"));
}

#[test]
fn init_respects_vault_dir_flag() {
    let tmp = TempDir::new().unwrap();

    otpvault()
        .current_dir(tmp.path())
        .args(["--vault-dir", "secrets", "init"])
        .assert()
        .success();

    assert!(tmp.path().join("secrets").join("vault.db").exists());
    assert!(!tmp.path().join(".otpvault").exists());
}

#[test]
fn init_respects_config_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".otpvault.toml"),
        "vault_dir = \"store\"\nvault_file = \"creds.db\"\n",
    )
    .unwrap();

    otpvault().current_dir(tmp.path()).arg("init").assert().success();

    assert!(tmp.path().join("store").join("creds.db").exists());
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".otpvault.toml"), "otp_digits = 7\n").unwrap();

    otpvault()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}

#[test]
fn wrong_otp_keeps_vault_locked() {
    let tmp = TempDir::new().unwrap();
    otpvault().current_dir(tmp.path()).arg("init").assert().success();

    for args in [
        vec!["list"],
        vec!["search", "example"],
        vec!["delete", "example.com", "--force"],
        vec!["backup"],
        vec!["restore", "--force"],
    ] {
        otpvault()
            .current_dir(tmp.path())
            .env("OTPVAULT_OTP", BAD_OTP)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Session locked"));
    }

    assert!(!tmp.path().join(".otpvault").join("vault_backup.db").exists());
}

#[test]
fn wrong_otp_with_secret_from_env() {
    let tmp = TempDir::new().unwrap();

    otpvault()
        .current_dir(tmp.path())
        .env("OTPVAULT_SECRET", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")
        .env("OTPVAULT_OTP", BAD_OTP)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session locked"));

    // A locked session never creates the vault.
    assert!(!tmp.path().join(".otpvault").join("vault.db").exists());
}

#[test]
fn invalid_secret_from_env_is_rejected() {
    let tmp = TempDir::new().unwrap();

    otpvault()
        .current_dir(tmp.path())
        .env("OTPVAULT_SECRET", "not base32 !!")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid OTP secret"));
}
