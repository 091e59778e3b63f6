//! # Shared Command Utilities
//!
//! This module provides shared tokenizing, validation, and parsing functions used across
//! the command handlers.

use std::str::FromStr;

use handled::Handle;

use crate::commands::errors::{UserError, to_user_error};
use crate::{Form, RecordId};

/// Splits a console line into arguments.
///
/// Arguments are separated by whitespace.  Single or double quotes group text that
/// contains spaces; the quotes themselves are dropped.  A quote may start mid-word, so
/// `cityName="New York"` is one argument.
pub fn tokenize(line: &str) -> Result<Vec<String>, UserError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(UserError::with_usage(
            format!("Unterminated {} quote", q),
            "Close every quote, e.g. cityName=\"New York\"",
        ));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Splits `field=value` arguments.
pub fn parse_assignments(args: &[String]) -> Result<Vec<(String, String)>, UserError> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((field, value)) if !field.is_empty() => {
                Ok((field.to_string(), value.to_string()))
            }
            _ => Err(UserError::with_usage(
                format!("Expected field=value, got '{}'", arg),
                "Write each field as name=value, quoting values with spaces",
            )),
        })
        .collect()
}

/// Applies `field=value` arguments to a form, stopping at the first rejected value.
pub fn apply_assignments<F: Form>(form: &mut F, args: &[String]) -> Result<(), UserError> {
    for (field, value) in parse_assignments(args)? {
        form.set_field(&field, &value).map_err(to_user_error)?;
    }
    Ok(())
}

/// Generic parsing function that works with any type that implements FromStr and whose
/// error type implements Handle<UserError>.
pub fn parse_arg<T, E>(raw: &str) -> Result<T, UserError>
where
    T: FromStr<Err = E>,
    E: Handle<UserError> + std::fmt::Display,
{
    raw.parse().map_err(to_user_error)
}

/// Parses a record identifier argument.
pub fn parse_record_id(raw: &str) -> Result<RecordId, UserError> {
    parse_arg(raw)
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) -> Result<(), UserError> {
    if args.len() < min_count {
        return Err(UserError::with_usage(
            format!("{} command requires more arguments", command),
            usage,
        ));
    }
    if args.len() > max_count {
        return Err(UserError::with_usage(
            format!("{} command has too many arguments", command),
            usage,
        ));
    }
    Ok(())
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $console:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {{
        if $args.is_empty() {
            return Err(crate::commands::errors::UserError::with_usage(
                format!("{} command requires a subcommand", $command_name),
                $usage,
            ));
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $console).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                Err(crate::commands::errors::UserError::with_usage(
                    format!(
                        "Unknown {} subcommand '{}'",
                        $command_name,
                        $args[0],
                    ),
                    format!("Available subcommands: {}", available_subcommands.join(", ")),
                ))
            }
        }
    }};
}

pub(crate) use dispatch_command;
