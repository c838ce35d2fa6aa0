//! `otpvault add`: store a new credential.

use chrono::Utc;

use crate::cli::output;
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{PasswordSource, Storage, VaultSession};

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, username: &str, generate: bool) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session, &mut prompter, site, username, generate)?;
    session.close();
    Ok(())
}

/// Add one record to an unlocked session.
///
/// Without `generate`, the user is asked whether to generate a password
/// and, if not, to type one.
pub fn run<S: Storage>(
    session: &VaultSession<S>,
    prompter: &mut dyn Prompter,
    site: &str,
    username: &str,
    generate: bool,
) -> Result<()> {
    let generate =
        generate || prompter.yes_no("Would you like to generate a strong password?", true)?;

    let source = if generate {
        PasswordSource::Generate
    } else {
        PasswordSource::Provided(prompter.secret_field("Enter the password")?)
    };

    let outcome = session.add(site, username, source, Utc::now())?;

    if let Some(password) = &outcome.generated {
        output::info(&format!("Generated password: {}", password.as_str()));
    }
    output::success(&format!("Saved credential for '{}' ({})", site.trim(), username.trim()));

    Ok(())
}
