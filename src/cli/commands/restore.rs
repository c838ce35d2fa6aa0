//! `otpvault restore`: replace the vault with the latest backup.

use crate::cli::output;
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Storage, VaultSession};

/// Execute the `restore` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session, &mut prompter, force)?;
    session.close();
    Ok(())
}

pub fn run<S: Storage>(
    session: &VaultSession<S>,
    prompter: &mut dyn Prompter,
    force: bool,
) -> Result<()> {
    if !force
        && !prompter.yes_no(
            "Restoring overwrites the current vault with the backup. Continue?",
            false,
        )?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    session.restore()?;
    output::success(&format!(
        "Vault restored from {}",
        session.backup_path().display()
    ));
    Ok(())
}
