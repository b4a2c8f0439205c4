use clap::Parser;
use std::path::PathBuf;

/// sgate - run the session gate from a terminal
#[derive(Parser, Debug)]
#[command(name = "sgate")]
#[command(version)]
#[command(about = "Check, refresh, and clear a stored browser session", long_about = None)]
pub struct Cli {
    /// Backend base URL (e.g., http://localhost:8080)
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.session-gate/config.toml")]
    pub config: PathBuf,

    /// Session file path (overrides the config file)
    #[arg(long = "session-file")]
    pub session_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    // Session commands
    /// Show the stored session and what its token says
    #[arg(long = "show-session")]
    pub show_session: bool,

    /// Run the gate: refresh if expired, wipe on failure (exit 1 when denied)
    #[arg(long = "check")]
    pub check: bool,

    /// Clear the stored session
    #[arg(long = "logout")]
    pub logout: bool,

    /// Store a session record (requires --email and --token)
    #[arg(long = "save-session", requires_all = ["email", "token"])]
    pub save_session: bool,

    /// Email for --save-session
    #[arg(long = "email")]
    pub email: Option<String>,

    /// JWT for --save-session
    #[arg(long = "token")]
    pub token: Option<String>,
}
