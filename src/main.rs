use clap::Parser;
use otpvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity (e.g. `debug`).
const LOG_ENV_VAR: &str = "OTPVAULT_LOG";

/// Log to stderr so stdout stays clean for command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { no_save } => otpvault::cli::commands::init::execute(&cli, no_save),
        Commands::Add {
            ref site,
            ref username,
            generate,
        } => otpvault::cli::commands::add::execute(&cli, site, username, generate),
        Commands::List => otpvault::cli::commands::list::execute(&cli),
        Commands::Search { ref query } => otpvault::cli::commands::search::execute(&cli, query),
        Commands::Delete { ref site, force } => {
            otpvault::cli::commands::delete::execute(&cli, site, force)
        }
        Commands::Backup => otpvault::cli::commands::backup::execute(&cli),
        Commands::Restore { force } => otpvault::cli::commands::restore::execute(&cli, force),
        Commands::Shell => otpvault::cli::commands::shell::execute(&cli),
    };

    if let Err(e) = result {
        otpvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
