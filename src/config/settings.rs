use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::otp::TotpParams;
use crate::vault::SessionOptions;

/// Project-level configuration, loaded from `.otpvault.toml`.
///
/// Every field has a sensible default so OtpVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the primary vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// File name of the single backup inside `vault_dir`.
    #[serde(default = "default_backup_file")]
    pub backup_file: String,

    /// File name of the stored OTP secret inside `vault_dir`.
    #[serde(default = "default_secret_file")]
    pub secret_file: String,

    /// OTP window length in seconds (default: 30).
    #[serde(default = "default_otp_period_secs")]
    pub otp_period_secs: u64,

    /// OTP code length, 6 or 8 (default: 6).
    #[serde(default = "default_otp_digits")]
    pub otp_digits: u32,

    /// Adjacent OTP windows tolerated for clock skew, 0 or 1 (default: 0).
    #[serde(default)]
    pub otp_skew_windows: u64,

    /// Days after which a stored password is reported as expired (default: 90).
    #[serde(default = "default_password_max_age_days")]
    pub password_max_age_days: i64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".otpvault".to_string()
}

fn default_vault_file() -> String {
    "vault.db".to_string()
}

fn default_backup_file() -> String {
    "vault_backup.db".to_string()
}

fn default_secret_file() -> String {
    "otp.secret".to_string()
}

fn default_otp_period_secs() -> u64 {
    30
}

fn default_otp_digits() -> u32 {
    6
}

fn default_password_max_age_days() -> i64 {
    90
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            backup_file: default_backup_file(),
            secret_file: default_secret_file(),
            otp_period_secs: default_otp_period_secs(),
            otp_digits: default_otp_digits(),
            otp_skew_windows: 0,
            password_max_age_days: default_password_max_age_days(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".otpvault.toml";

    /// Load settings from `<project_dir>/.otpvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed or holds out-of-range values, an error is
    /// returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would weaken or break the OTP gate.
    pub fn validate(&self) -> Result<()> {
        if self.otp_period_secs == 0 {
            return Err(VaultError::ConfigError(
                "otp_period_secs must be greater than zero".into(),
            ));
        }
        if self.otp_digits != 6 && self.otp_digits != 8 {
            return Err(VaultError::ConfigError(format!(
                "otp_digits must be 6 or 8 (got {})",
                self.otp_digits
            )));
        }
        if self.otp_skew_windows > 1 {
            return Err(VaultError::ConfigError(format!(
                "otp_skew_windows must be 0 or 1 (got {})",
                self.otp_skew_windows
            )));
        }
        if self.password_max_age_days < 1 {
            return Err(VaultError::ConfigError(
                "password_max_age_days must be at least 1".into(),
            ));
        }
        if Duration::try_days(self.password_max_age_days).is_none() {
            return Err(VaultError::ConfigError(format!(
                "password_max_age_days is too large (got {})",
                self.password_max_age_days
            )));
        }
        Ok(())
    }

    /// Example: `project_dir/.otpvault`
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Example: `project_dir/.otpvault/vault.db`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir_path(project_dir).join(&self.vault_file)
    }

    /// Example: `project_dir/.otpvault/vault_backup.db`
    pub fn backup_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir_path(project_dir).join(&self.backup_file)
    }

    /// Example: `project_dir/.otpvault/otp.secret`
    pub fn secret_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir_path(project_dir).join(&self.secret_file)
    }

    /// Convert the OTP settings into gate parameters.
    pub fn totp_params(&self) -> TotpParams {
        TotpParams {
            period_secs: self.otp_period_secs,
            digits: self.otp_digits,
            skew_windows: self.otp_skew_windows,
        }
    }

    /// Build session options for a vault under `project_dir`.
    pub fn session_options(&self, project_dir: &Path) -> SessionOptions {
        SessionOptions {
            totp: self.totp_params(),
            backup_path: self.backup_path(project_dir),
            // Out-of-range ages are rejected by `validate`; an unvalidated
            // one means "never expires".
            max_age: Duration::try_days(self.password_max_age_days).unwrap_or(Duration::MAX),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".otpvault");
        assert_eq!(s.vault_file, "vault.db");
        assert_eq!(s.backup_file, "vault_backup.db");
        assert_eq!(s.otp_period_secs, 30);
        assert_eq!(s.otp_digits, 6);
        assert_eq!(s.otp_skew_windows, 0);
        assert_eq!(s.password_max_age_days, 90);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".otpvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
vault_file = "main.db"
backup_file = "main.bak"
otp_period_secs = 60
otp_digits = 8
otp_skew_windows = 1
password_max_age_days = 30
"#;
        fs::write(tmp.path().join(".otpvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(
            settings.vault_path(tmp.path()),
            tmp.path().join("secrets").join("main.db")
        );
        assert_eq!(
            settings.backup_path(tmp.path()),
            tmp.path().join("secrets").join("main.bak")
        );
        assert_eq!(
            settings.totp_params(),
            TotpParams {
                period_secs: 60,
                digits: 8,
                skew_windows: 1
            }
        );
        assert_eq!(settings.password_max_age_days, 30);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".otpvault.toml"), "otp_skew_windows = 1\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.otp_skew_windows, 1);
        assert_eq!(settings.vault_dir, ".otpvault");
        assert_eq!(settings.otp_period_secs, 30);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".otpvault.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let tmp = TempDir::new().unwrap();
        for bad in [
            "otp_period_secs = 0",
            "otp_digits = 7",
            "otp_skew_windows = 2",
            "password_max_age_days = 0",
            "password_max_age_days = 1000000000000000",
        ] {
            fs::write(tmp.path().join(".otpvault.toml"), bad).unwrap();
            assert!(
                matches!(Settings::load(tmp.path()), Err(VaultError::ConfigError(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn session_options_follow_settings() {
        let s = Settings {
            password_max_age_days: 45,
            ..Settings::default()
        };
        let project = Path::new("/home/user/project");
        let opts = s.session_options(project);
        assert_eq!(
            opts.backup_path,
            PathBuf::from("/home/user/project/.otpvault/vault_backup.db")
        );
        assert_eq!(opts.max_age, Duration::days(45));
    }

    #[test]
    fn session_options_never_panic_on_huge_max_age() {
        let s = Settings {
            password_max_age_days: i64::MAX,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(VaultError::ConfigError(_))));
        assert_eq!(s.session_options(Path::new(".")).max_age, Duration::MAX);
    }
}
