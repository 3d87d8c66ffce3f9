//! Auth subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout; diagnostics go through tracing.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use portal_application::Credentials;
use portal_domain::{AuthState, jwt};
use portal_infrastructure::Portal;

/// The refresh cookie lives in the HTTP client's jar, which is not saved.
const REFRESH_NOTE: &str =
    "Refresh cookie: held for this run only; sign in again once the access token has expired";

/// Session subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Sign in with the account email and password.
    Login {
        /// Account email.
        #[arg(short, long, env = "PORTAL_USERNAME")]
        username: String,
        /// Password; read from stdin when omitted.
        #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored token.
    Logout,
    /// Show whether a session is held and what it allows.
    Status,
}

/// Executes a session subcommand.
pub async fn run(action: AuthAction, portal: &Portal, out: &mut impl Write) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            login(portal, out, &username, password).await
        }
        AuthAction::Logout => {
            portal.logout().await;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        AuthAction::Status => status(portal, out).await,
    }
}

async fn login(
    portal: &Portal,
    out: &mut impl Write,
    username: &str,
    password: String,
) -> anyhow::Result<()> {
    let state = portal
        .session()
        .login(&Credentials::new(username, password))
        .await
        .context("login failed")?;

    match state.role() {
        Some(role) => writeln!(out, "Logged in as {username} ({role})")?,
        None => writeln!(out, "Logged in as {username}")?,
    }
    Ok(())
}

async fn status(portal: &Portal, out: &mut impl Write) -> anyhow::Result<()> {
    let AuthState::LoggedIn { role } = portal.session().restore().await else {
        writeln!(out, "Not logged in")?;
        return Ok(());
    };

    writeln!(out, "Logged in")?;
    if let Some(role) = role {
        writeln!(out, "Role: {role}")?;
    }
    let claims = portal
        .session()
        .tokens()
        .get()
        .await
        .and_then(|token| jwt::decode(token.as_str()));
    if let Some(expires_at) = claims.as_ref().and_then(jwt::TokenClaims::expires_at) {
        writeln!(out, "Access token expires: {}", expires_at.to_rfc3339())?;
    }
    writeln!(out, "{REFRESH_NOTE}")?;
    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    anyhow::ensure!(!password.is_empty(), "no password given");
    Ok(password)
}
