//! `otpvault search`: find credentials by website or username.

use chrono::Utc;

use crate::cli::output;
use crate::cli::prompt::TerminalPrompter;
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Storage, VaultSession};

/// Execute the `search` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session, query)?;
    session.close();
    Ok(())
}

pub fn run<S: Storage>(session: &VaultSession<S>, query: &str) -> Result<()> {
    let listing = session.search(query)?;
    let now = Utc::now();

    output::print_listing(&listing, "No matching records found.", |r| {
        session.is_expired(r, now)
    });

    Ok(())
}
