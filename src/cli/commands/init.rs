//! `otpvault init`: create a new vault and its OTP secret.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, VaultError};
use crate::otp::{write_secret_file, SharedSecret};
use crate::vault::{SqliteStorage, Storage};

/// Execute the `init` command.
pub fn execute(cli: &Cli, no_save: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let vault_path = ctx.vault_path();
    let secret_path = ctx.secret_path();

    // 1. Refuse to clobber an existing vault or secret.
    if vault_path.exists() {
        output::tip("Use `otpvault add` to add credentials to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(vault_path));
    }
    if secret_path.exists() {
        return Err(VaultError::SecretFileError(format!(
            "a secret already exists at {}; remove it first to start over",
            secret_path.display()
        )));
    }

    // 2. Generate the secret and optionally persist it.
    let secret = SharedSecret::generate();
    if !no_save {
        write_secret_file(&secret_path, &secret)?;
        output::info(&format!("Secret saved to {}", secret_path.display()));
    }

    // 3. Create the empty vault.
    SqliteStorage::new(&vault_path).ensure_schema()?;
    output::success(&format!("Vault created at {}", vault_path.display()));

    // 4. Show the secret so it can be enrolled in an authenticator app.
    let totp = ctx.settings.totp_params();
    output::info(&format!("Your OTP secret is: {}", secret.to_base32().as_str()));
    output::info(&format!(
        "Provisioning URI: {}",
        secret
            .provisioning_uri("vault", totp.digits, totp.period_secs)
            .as_str()
    ));

    if no_save {
        output::warning("The secret was not saved. Keep it safe: without it the vault cannot be opened.");
        output::tip("Pass it via OTPVAULT_SECRET or enter it when prompted.");
    }
    output::tip("Run `otpvault add <SITE> <USERNAME>` to store your first credential.");

    Ok(())
}
