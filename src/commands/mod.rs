//! # Command Handlers
//!
//! This module contains the command handlers of the loandesk console.  Each command
//! family is implemented in a dedicated submodule.
//!
//! ## Structure
//!
//! - `console` - The read-eval state: session, mounted screen, buffered output
//! - `auth` - Login, registration, password reset and logout
//! - `entity` - Per-kind list, form and delete commands
//! - `query` - Customer lookups
//! - `navigation` - Mounting and unmounting entity screens
//! - `shared` - Tokenizing, argument validation and dispatch utilities
//! - `errors` - Conversion of every error into a user-facing message

pub mod auth;
pub mod console;
pub mod entity;
pub mod errors;
pub mod navigation;
pub mod query;
pub mod shared;

pub use console::{Console, Flow, USAGE};
pub use entity::handle_entity_command;
pub use query::handle_query_command;
