//! `otpvault shell`: interactive menu over one unlocked session.

use dialoguer::Select;

use crate::cli::commands::{add, backup, delete, list, restore, search};
use crate::cli::output;
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::cli::{unlocked_session, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{Storage, VaultSession};

const MENU: &[&str] = &[
    "Add new password",
    "View stored passwords",
    "Delete password",
    "Search passwords",
    "Backup vault",
    "Restore vault",
    "Exit",
];

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut prompter = TerminalPrompter;
    let session = unlocked_session(cli, &mut prompter)?;

    loop {
        let choice = Select::new()
            .with_prompt("Choose an option")
            .items(MENU)
            .default(0)
            .interact_opt()
            .map_err(|e| VaultError::CommandFailed(format!("menu prompt: {e}")))?;

        let Some(choice) = choice else { break };
        if choice == MENU.len() - 1 {
            break;
        }

        // A failed action is reported and the menu continues.
        if let Err(e) = dispatch(&session, &mut prompter, choice) {
            output::error(&e.to_string());
        }
    }

    output::info("Exiting...");
    session.close();
    Ok(())
}

fn dispatch<S: Storage>(
    session: &VaultSession<S>,
    prompter: &mut dyn Prompter,
    choice: usize,
) -> Result<()> {
    match choice {
        0 => {
            let site = prompter.field("Enter the website")?;
            let username = prompter.field("Enter the username")?;
            add::run(session, prompter, &site, &username, false)
        }
        1 => list::run(session),
        2 => {
            let site = prompter.field("Enter the website to delete")?;
            delete::run(session, prompter, &site, false)
        }
        3 => {
            let query = prompter.field("Enter the website or username to search")?;
            search::run(session, &query)
        }
        4 => backup::run(session),
        5 => restore::run(session, prompter, false),
        _ => Ok(()),
    }
}
