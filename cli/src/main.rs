//! sgate - terminal front end for the session gate
//!
//! # Usage
//!
//! ```bash
//! # Store a session the way the login page would
//! sgate --save-session --email a@x.com --token <JWT>
//!
//! # Inspect it
//! sgate --show-session
//!
//! # Run the gate (refreshes an expired token, exits 1 when denied)
//! sgate --check -u http://localhost:8080
//!
//! # Clear it
//! sgate --logout
//! ```

use clap::Parser;
use colored::Colorize;
use env_logger::Env;

use session_gate_cli::{CLIConfiguration, FileSessionStore, Result};

mod args;
mod commands;

use args::Cli;
use commands::check::handle_check;
use commands::session::handle_session;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).try_init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        },
    }
}

/// Returns the process exit code: 0 on success, 1 when the gate denied
/// access, 2 when no command was given.
async fn run(cli: Cli) -> Result<i32> {
    let config = CLIConfiguration::load(&cli.config)?;

    let session_path = cli
        .session_file
        .clone()
        .or_else(|| config.session_file())
        .unwrap_or_else(FileSessionStore::default_path);
    let mut store = FileSessionStore::with_path(session_path);
    log::debug!("[CLI] Session file: {}", store.path().display());

    if handle_session(&cli, &mut store)? {
        return Ok(0);
    }

    if cli.check {
        let gate_config = config.to_gate_config(cli.url.as_deref())?;
        let granted = handle_check(gate_config, store).await?;
        return Ok(if granted { 0 } else { 1 });
    }

    eprintln!("Nothing to do. Try --check, --show-session, --save-session, or --logout.");
    Ok(2)
}
