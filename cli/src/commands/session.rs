use crate::args::Cli;
use colored::Colorize;
use session_gate::{GateError, SessionRecord, SessionStore, TokenClaims};
use session_gate_cli::page::format_expiry;
use session_gate_cli::{CLIError, FileSessionStore, Result};

/// Handle the local session commands. Returns `true` when one ran.
pub fn handle_session(cli: &Cli, store: &mut FileSessionStore) -> Result<bool> {
    if cli.save_session {
        let (Some(email), Some(token)) = (cli.email.as_deref(), cli.token.as_deref()) else {
            return Err(CLIError::ConfigurationError(
                "--save-session requires --email and --token".into(),
            ));
        };
        let record = SessionRecord::new(email, token).with_logged_in(true);
        store.set(&record)?;
        println!("Saved session for {} to {}", email, store.path().display());
        return Ok(true);
    }

    if cli.show_session {
        show_session(store)?;
        return Ok(true);
    }

    if cli.logout {
        store.clear()?;
        println!("Session cleared");
        return Ok(true);
    }

    Ok(false)
}

fn show_session(store: &FileSessionStore) -> Result<()> {
    let record = match store.get()? {
        Some(record) if record.has_token() => record,
        Some(_) | None => {
            println!("No session stored at {}", store.path().display());
            return Ok(());
        },
    };

    println!("Email: {}", record.email);
    let preview: String = record.token.chars().take(20).collect();
    println!("Token: {}...", preview);
    if let Some(logged_in) = record.is_logged_in {
        println!("Logged in: {}", logged_in);
    }

    match TokenClaims::decode_unverified(&record.token) {
        Ok(claims) => {
            if let Some(sub) = claims.subject() {
                println!("Subject: {}", sub);
            }
            println!("Role: {}", claims.role.as_deref().unwrap_or("(none)"));

            let now = chrono::Utc::now().timestamp_millis();
            if claims.is_expired_at(now) {
                let expired = GateError::TokenExpired {
                    expires_at: claims.expires_at,
                };
                println!("Expires: {} {}", format_expiry(claims.expires_at), "(EXPIRED)".red());
                log::debug!("[SESSION] {}", expired);
            } else {
                println!("Expires: {} {}", format_expiry(claims.expires_at), "(valid)".green());
            }
        },
        Err(e) => {
            println!("Token: {} ({})", "undecodable".red(), e);
        },
    }

    Ok(())
}
