//! CLI module: Clap argument parser, prompts, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use crate::config::Settings;
use crate::errors::Result;
use crate::otp::{load_secret_file, SharedSecret};
use crate::vault::{Recovery, SqliteStorage, Storage, VaultSession};

use self::prompt::Prompter;

/// Environment variable holding the base32 OTP secret.
pub const SECRET_ENV_VAR: &str = "OTPVAULT_SECRET";

/// OtpVault CLI: OTP-gated local password vault.
#[derive(Parser)]
#[command(
    name = "otpvault",
    about = "OTP-gated local password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .otpvault.toml, else .otpvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault and its OTP secret
    Init {
        /// Print the secret without saving it to the secret file
        #[arg(long)]
        no_save: bool,
    },

    /// Add a credential
    Add {
        /// Website or service name
        site: String,
        /// Account username
        username: String,
        /// Generate a strong random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// List all stored credentials
    List,

    /// Search credentials by website or username
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Delete every credential for a website
    Delete {
        /// Website whose credentials should be removed
        site: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Copy the vault to the backup file (replaces the previous backup)
    Backup,

    /// Replace the vault with the backup file
    Restore {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Interactive menu
    Shell,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs to locate the vault.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Load settings from the working directory and apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let mut settings = Settings::load(&project_dir)?;
        if let Some(dir) = &cli.vault_dir {
            settings.vault_dir.clone_from(dir);
        }
        Ok(Self {
            project_dir,
            settings,
        })
    }

    pub fn vault_path(&self) -> PathBuf {
        self.settings.vault_path(&self.project_dir)
    }

    pub fn secret_path(&self) -> PathBuf {
        self.settings.secret_path(&self.project_dir)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.settings.backup_path(&self.project_dir)
    }
}

/// Get the OTP secret, trying in order:
/// 1. `OTPVAULT_SECRET` env var
/// 2. The secret file in the vault directory
/// 3. Interactive hidden prompt
pub fn resolve_secret(ctx: &Context, prompter: &mut dyn Prompter) -> Result<SharedSecret> {
    if let Ok(text) = std::env::var(SECRET_ENV_VAR) {
        if !text.is_empty() {
            return SharedSecret::from_base32(&text);
        }
    }

    let path = ctx.secret_path();
    if path.exists() {
        return load_secret_file(&path);
    }

    let text = prompter.secret_field("Enter the OTP secret")?;
    SharedSecret::from_base32(&text)
}

/// Build a locked session for the vault described by `ctx`.
pub fn open_session(
    ctx: &Context,
    prompter: &mut dyn Prompter,
) -> Result<VaultSession<SqliteStorage>> {
    let secret = resolve_secret(ctx, prompter)?;
    let storage = SqliteStorage::new(ctx.vault_path());
    Ok(VaultSession::new(
        storage,
        secret,
        ctx.settings.session_options(&ctx.project_dir),
    ))
}

/// Run the OTP challenge, unlock the session and check the vault file.
///
/// A corrupted vault is reported as a warning: its records are gone.
pub fn unlock_session<S: Storage>(
    session: &mut VaultSession<S>,
    prompter: &mut dyn Prompter,
) -> Result<Recovery> {
    let issued_at = Utc::now();
    let code = session.challenge(issued_at);
    prompter.show_challenge(&code, issued_at);
    drop(code);

    let submitted = prompter.otp_input()?;
    session.unlock(&submitted, Utc::now())?;

    let recovery = session.recover_if_corrupted()?;
    match &recovery {
        Recovery::Healthy => {}
        Recovery::Created => output::info("Created a new, empty vault."),
        Recovery::Reinitialized { reason } => {
            output::warning(&format!(
                "Vault file was corrupted ({reason}) and has been replaced by an empty vault. All previously stored credentials are lost."
            ));
            output::tip("Run `otpvault restore` to bring back the latest backup.");
        }
    }
    Ok(recovery)
}

/// Open and unlock the vault in one step.
pub fn unlocked_session(
    cli: &Cli,
    prompter: &mut dyn Prompter,
) -> Result<VaultSession<SqliteStorage>> {
    let ctx = Context::load(cli)?;
    let mut session = open_session(&ctx, prompter)?;
    unlock_session(&mut session, prompter)?;
    Ok(session)
}
