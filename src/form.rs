//! # Form Field Access
//!
//! Records and drafts expose their fields by wire name so the console can fill a draft
//! from `name=value` arguments and render any record as a table row without a
//! hand-written match per type.  Implementations are generated with
//! `#[derive(loandesk_derive::Form)]`.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::RecordId;

/// By-name access to the fields of a record or draft.
pub trait Form {
    /// Wire names of every field, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Renders the named field, or `None` when there is no such field.
    fn field(&self, name: &str) -> Option<String>;

    /// Parses `raw` into the named field.
    fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FormError>;
}

/// A value that can live in a form field.
pub trait FormValue: Sized {
    /// Parses raw user input.  The error is a short reason suitable for display.
    fn parse_form(raw: &str) -> Result<Self, String>;

    /// Renders the value the way a user would type it.
    fn render_form(&self) -> String;
}

/// Errors raised while filling a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The form has no field with this name.
    UnknownField(String),
    /// The field exists but the value does not parse.
    InvalidValue {
        /// The field that rejected the value.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FormError::UnknownField(field) => write!(f, "Unknown field '{}'", field),
            FormError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for FormError {}

impl FormValue for String {
    fn parse_form(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render_form(&self) -> String {
        self.clone()
    }
}

impl FormValue for RecordId {
    fn parse_form(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{}", e))
    }

    fn render_form(&self) -> String {
        self.to_string()
    }
}

impl FormValue for f64 {
    fn parse_form(raw: &str) -> Result<Self, String> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", raw))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("'{}' is not a finite number", raw))
        }
    }

    fn render_form(&self) -> String {
        self.to_string()
    }
}

/// Blank input clears an optional field.
impl<T: FormValue> FormValue for Option<T> {
    fn parse_form(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            T::parse_form(raw).map(Some)
        }
    }

    fn render_form(&self) -> String {
        match self {
            Some(value) => value.render_form(),
            None => String::new(),
        }
    }
}
