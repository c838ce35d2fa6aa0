//! `otpvault delete`: remove every credential for a website.

use crate::cli::output;
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Storage, VaultSession};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, site: &str, force: bool) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session, &mut prompter, site, force)?;
    session.close();
    Ok(())
}

pub fn run<S: Storage>(
    session: &VaultSession<S>,
    prompter: &mut dyn Prompter,
    site: &str,
    force: bool,
) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !prompter.yes_no(&format!("Delete all credentials for '{site}'?"), false)? {
        output::info("Cancelled.");
        return Ok(());
    }

    match session.delete_by_site(site)? {
        0 => output::info(&format!("Nothing to delete for '{site}'.")),
        1 => output::success(&format!("Deleted 1 credential for '{site}'")),
        n => output::success(&format!("Deleted {n} credentials for '{site}'")),
    }

    Ok(())
}
