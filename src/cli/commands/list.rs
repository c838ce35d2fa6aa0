//! `otpvault list`: display all stored credentials.

use chrono::Utc;

use crate::cli::output;
use crate::cli::prompt::TerminalPrompter;
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Storage, VaultSession};

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session)?;
    session.close();
    Ok(())
}

pub fn run<S: Storage>(session: &VaultSession<S>) -> Result<()> {
    let listing = session.list()?;
    let now = Utc::now();

    output::print_listing(&listing, "No passwords stored yet.", |r| {
        session.is_expired(r, now)
    });

    Ok(())
}
