//! # Session
//!
//! The login flag and the three credential forms.  Logging in only flips a flag held in
//! memory; no token is kept and nothing is persisted.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::api::{AuthReply, LoanApi, PasswordReset, Registration};
use crate::validate::{validate_email, validate_new_password, validate_password};

/// Which credential form is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Username and password.
    #[default]
    Login,
    /// New account.
    Register,
    /// Forgotten password.
    Reset,
}

impl Display for AuthMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AuthMode::Login => write!(f, "login"),
            AuthMode::Register => write!(f, "register"),
            AuthMode::Reset => write!(f, "reset-password"),
        }
    }
}

/// Login state of the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    logged_in: bool,
    mode: AuthMode,
    error: Option<String>,
}

const CONNECTION_ERROR: &str = "Error connecting to server";

impl Session {
    /// A logged-out session showing the login form.
    pub fn new() -> Self {
        Self::default()
    }

    /// True after a successful login.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The credential form shown.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// The inline error of the last credential operation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Shows another credential form and clears the inline error.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
    }

    /// Checks the credentials with the server.  Returns whether the session is now
    /// logged in.
    pub async fn login(&mut self, api: &LoanApi, username: &str, password: &str) -> bool {
        self.switch_mode(AuthMode::Login);
        match api.login(username, password).await {
            Ok(reply) if reply.succeeded() => {
                self.logged_in = true;
            }
            Ok(reply) => {
                self.error = Some(refusal(reply, "Login failed"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "login request failed");
                self.error = Some(CONNECTION_ERROR.to_string());
            }
        }
        self.logged_in
    }

    /// Registers an account.  On success returns the notice to show and switches back to
    /// the login form.
    pub async fn register(
        &mut self,
        api: &LoanApi,
        registration: &Registration,
    ) -> Option<&'static str> {
        self.switch_mode(AuthMode::Register);
        let checked = validate_email(&registration.email)
            .and_then(|()| validate_password(&registration.password));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return None;
        }
        self.finish(
            api.register(registration).await,
            "Registration failed",
            "Registration successful! Please log in.",
        )
    }

    /// Resets a forgotten password.  On success returns the notice to show and switches
    /// back to the login form.
    pub async fn reset_password(
        &mut self,
        api: &LoanApi,
        reset: &PasswordReset,
    ) -> Option<&'static str> {
        self.switch_mode(AuthMode::Reset);
        let checked =
            validate_email(&reset.email).and_then(|()| validate_new_password(&reset.new_password));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return None;
        }
        self.finish(
            api.reset_password(reset).await,
            "Password reset failed",
            "Password reset successful! Please log in.",
        )
    }

    /// Clears the login flag.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.switch_mode(AuthMode::Login);
    }

    fn finish(
        &mut self,
        reply: Result<AuthReply, crate::http_utils::HttpError>,
        fallback: &str,
        notice: &'static str,
    ) -> Option<&'static str> {
        match reply {
            Ok(reply) if reply.succeeded() => {
                self.switch_mode(AuthMode::Login);
                Some(notice)
            }
            Ok(reply) => {
                self.error = Some(refusal(reply, fallback));
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "credential request failed");
                self.error = Some(CONNECTION_ERROR.to_string());
                None
            }
        }
    }
}

fn refusal(reply: AuthReply, fallback: &str) -> String {
    reply
        .failure_message
        .unwrap_or_else(|| fallback.to_string())
}
