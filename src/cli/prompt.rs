//! User interaction behind a trait so commands can run against a
//! terminal or a scripted test double.

use chrono::{DateTime, Local, Utc};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VaultError};
use crate::otp::OtpCode;

/// Environment variable consulted before prompting for the OTP.
pub const OTP_ENV_VAR: &str = "OTPVAULT_OTP";

/// Everything a command needs to ask of the user.
pub trait Prompter {
    /// Show the issued challenge code and the time it was issued for.
    fn show_challenge(&mut self, code: &OtpCode, issued_at: DateTime<Utc>);

    /// Read the code the user submits.
    fn otp_input(&mut self) -> Result<Zeroizing<String>>;

    /// Read a plain text field.
    fn field(&mut self, name: &str) -> Result<String>;

    /// Read a hidden field (passwords, secrets).
    fn secret_field(&mut self, name: &str) -> Result<Zeroizing<String>>;

    fn yes_no(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn show_challenge(&mut self, code: &OtpCode, issued_at: DateTime<Utc>) {
        let local = issued_at.with_timezone(&Local);
        output::info(&format!(
            "Current system time: {}",
            local.format("%a %b %e %H:%M:%S %Y")
        ));
        output::info(&format!("Your OTP is: {code}"));
    }

    fn otp_input(&mut self) -> Result<Zeroizing<String>> {
        if let Ok(code) = std::env::var(OTP_ENV_VAR) {
            if !code.is_empty() {
                return Ok(Zeroizing::new(code));
            }
        }

        let code = dialoguer::Input::<String>::new()
            .with_prompt("Enter the OTP")
            .interact_text()
            .map_err(|e| VaultError::CommandFailed(format!("OTP prompt: {e}")))?;
        Ok(Zeroizing::new(code))
    }

    fn field(&mut self, name: &str) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(name)
            .interact_text()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
    }

    fn secret_field(&mut self, name: &str) -> Result<Zeroizing<String>> {
        let value = dialoguer::Password::new()
            .with_prompt(name)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
        Ok(Zeroizing::new(value))
    }

    fn yes_no(&mut self, prompt: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
    }
}
