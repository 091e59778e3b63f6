//! # Authentication Command Handler
//!
//! Login, registration, password reset and logout.  Nothing else in the console runs
//! until a login succeeds.

use crate::api::{PasswordReset, Registration};
use crate::commands::console::Console;
use crate::commands::errors::UserError;
use crate::commands::shared::{apply_assignments, validate_args_count};
use crate::session::AuthMode;

const LOGIN_USAGE: &str = "Usage: login <username> <password>";

/// Handles `login <username> <password>`.
pub async fn handle_login(args: &[String], console: &mut Console) -> Result<(), UserError> {
    validate_args_count(args, 2, 2, "login", LOGIN_USAGE)?;
    let (username, password) = (&args[0], &args[1]);
    if console.session.login(&console.api, username, password).await {
        tracing::info!(%username, "logged in");
        console.say(format!("Logged in as {}", username));
        Ok(())
    } else {
        Err(session_error(console, "Login failed"))
    }
}

/// Handles `register field=value...`.
pub async fn handle_register(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let mut registration = Registration::default();
    apply_assignments(&mut registration, args)?;
    match console.session.register(&console.api, &registration).await {
        Some(notice) => {
            console.say(notice);
            Ok(())
        }
        None => Err(session_error(console, "Registration failed")),
    }
}

/// Handles `reset-password field=value...`.
pub async fn handle_reset_password(
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    let mut reset = PasswordReset::default();
    apply_assignments(&mut reset, args)?;
    match console.session.reset_password(&console.api, &reset).await {
        Some(notice) => {
            console.say(notice);
            Ok(())
        }
        None => Err(session_error(console, "Password reset failed")),
    }
}

/// Handles `logout`, which also drops every mounted screen.
pub async fn handle_logout(args: &[String], console: &mut Console) -> Result<(), UserError> {
    validate_args_count(args, 0, 0, "logout", "Usage: logout")?;
    console.session.logout();
    console.screens.unmount_all();
    console.say("Logged out");
    Ok(())
}

fn session_error(console: &Console, fallback: &str) -> UserError {
    let message = console.session.error().unwrap_or(fallback);
    match console.session.mode() {
        AuthMode::Login => UserError::new(message),
        mode => UserError::with_usage(message, format!("Fix the fields and run {} again", mode)),
    }
}
