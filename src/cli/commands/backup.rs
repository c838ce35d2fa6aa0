//! `otpvault backup`: snapshot the vault file.

use crate::cli::output;
use crate::cli::prompt::TerminalPrompter;
use crate::cli::{unlocked_session, Cli};
use crate::errors::Result;
use crate::vault::{Storage, VaultSession};

/// Execute the `backup` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;
    run(&session)?;
    session.close();
    Ok(())
}

pub fn run<S: Storage>(session: &VaultSession<S>) -> Result<()> {
    let snapshot = session.backup()?;
    output::success(&format!(
        "Vault backed up to {} ({} bytes)",
        snapshot.path.display(),
        snapshot.size
    ));
    output::tip("Only the latest backup is kept.");
    Ok(())
}
