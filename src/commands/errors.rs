//! # Command Error Handling
//!
//! This module provides error handling utilities for console commands using the
//! handled crate for consistent error property extraction.

use handled::Handle;

use crate::config::ConfigError;
use crate::http_utils::HttpError;
use crate::query::QueryParseError;
use crate::screen::NotListed;
use crate::{FormError, RecordIdParseError, UnknownKind, ValidationError};

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl UserError {
    /// An error with a message and no hint.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            usage_hint: None,
        }
    }

    /// An error with a message and a usage hint.
    pub fn with_usage(message: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            usage_hint: Some(usage.into()),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UserError {}

/// Implements Handle<UserError> for itself to allow extraction
impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

impl Handle<UserError> for HttpError {
    fn handle(&self) -> Option<UserError> {
        let details = self
            .failure_message()
            .unwrap_or_else(|| self.message().to_string());
        let message = match self.status() {
            Some(status) => format!("Request failed (HTTP {}): {}", status, details),
            None => format!("Request failed: {}", details),
        };

        let usage_hint = match self.status() {
            Some(404) => Some(
                "The requested record was not found. Check the ID and try again.".to_string(),
            ),
            Some(400) => Some("Invalid request. Check your input data and try again.".to_string()),
            Some(500..=599) => {
                Some("Server error. The service may be temporarily unavailable.".to_string())
            }
            None => Some("Check that the API server is running and --base-url is right.".to_string()),
            _ => None,
        };

        Some(UserError {
            message,
            usage_hint,
        })
    }
}

impl Handle<UserError> for RecordIdParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError::with_usage(
            self.to_string(),
            "Record IDs are whole numbers as shown by the list command",
        ))
    }
}

impl Handle<UserError> for UnknownKind {
    fn handle(&self) -> Option<UserError> {
        Some(UserError::with_usage(
            self.to_string(),
            "Kinds: city, state, country, occupation, coverage, loan-type, customer, loan",
        ))
    }
}

impl Handle<UserError> for FormError {
    fn handle(&self) -> Option<UserError> {
        let hint = match self {
            FormError::UnknownField(_) => {
                "Use the show command to see the field names of the form"
            }
            FormError::InvalidValue { .. } => "Leave a value blank with field= to clear it",
        };
        Some(UserError::with_usage(self.to_string(), hint))
    }
}

impl Handle<UserError> for ValidationError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError::new(self.to_string()))
    }
}

impl Handle<UserError> for QueryParseError {
    fn handle(&self) -> Option<UserError> {
        let hint = match self {
            QueryParseError::UnknownQuery(_) => format!(
                "Available queries: {}",
                crate::LookupQuery::NAMES.join(", ")
            ),
            QueryParseError::InvalidValue { .. } => {
                "Dates are YYYY-MM-DD, gender is M or F, IDs and amounts are numbers".to_string()
            }
        };
        Some(UserError::with_usage(self.to_string(), hint))
    }
}

impl Handle<UserError> for NotListed {
    fn handle(&self) -> Option<UserError> {
        Some(UserError::with_usage(
            self.to_string(),
            format!(
                "Run '{} list' to see the records that can be edited",
                self.kind.command()
            ),
        ))
    }
}

impl Handle<UserError> for ConfigError {
    fn handle(&self) -> Option<UserError> {
        let hint = match self {
            ConfigError::Read { .. } => "Check the --config path",
            ConfigError::Parse { .. } => {
                "Config keys are base_url, output and log_filter, in JSON or YAML"
            }
            ConfigError::InvalidBaseUrl(_) => "Use an absolute URL such as http://localhost:8080/api",
        };
        Some(UserError::with_usage(self.to_string(), hint))
    }
}

/// Converts any handled error into the user-facing form.
pub fn to_user_error<E>(error: E) -> UserError
where
    E: Handle<UserError> + std::fmt::Display,
{
    error
        .handle()
        .unwrap_or_else(|| UserError::new(error.to_string()))
}

/// Enhanced error formatting for CLI output
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        let mut output = format!("Error: {}", user_error.message);
        if let Some(hint) = user_error.usage_hint {
            output.push_str(&format!("\nHint: {}", hint));
        }
        output
    } else {
        format!("Error: {}", error)
    }
}
