//! # loandesk: An Administrative Console for a Loan-Management API
//!
//! loandesk is the client side of a loan-management back office.  Staff log in, then
//! maintain the reference data (cities, states, countries, occupations, coverages and
//! loan types), the customers, and the loans issued to them.  Every record lives on a
//! remote REST API; loandesk holds no durable state of its own.
//!
//! This crate provides:
//!
//! - **Typed records and drafts** for all eight entity kinds, with by-name field access
//!   generated by `#[derive(loandesk_derive::Form)]`
//! - **A generic CRUD screen** that instantiates once per kind: list, create-or-edit
//!   form, confirmed delete and success/error banners
//! - **Validation** of customer drafts and of the credential forms before anything is
//!   sent
//! - **Customer lookups** whose replies are classified as a record, a list or a count
//! - **A console** that drives all of the above from typed commands
//!
//! ## Core Concepts
//!
//! ### Records and Drafts
//! A [`Record`] is what the API returns; its [`Draft`] is the editable copy a form
//! holds.  Drafts never carry the record identifier: an update names the record in the
//! request path.
//!
//! ### Screens
//! A [`CrudScreen`] owns one kind's list, its [`EditState`] and its [`Notices`].  A
//! draft with no bound identifier is a create; a bound draft is an edit.  Submitting
//! validates first and sends nothing when validation fails.
//!
//! ### Wire Shapes
//! The API wraps payloads in keys derived from the kind: `cityDTO` for one record,
//! `cityListDTO` for a list and `cityCount` for a count.  Auth endpoints answer with
//! `successMessage` or `failureMessage`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use loandesk::{CityDraft, EditState, Form};
//!
//! let mut form: EditState<CityDraft> = EditState::Empty;
//! form.start_create();
//! if let Some(draft) = form.draft_mut() {
//!     draft.set_field("cityName", "Nakuru").unwrap();
//! }
//! assert_eq!(
//!     form.draft().and_then(|d| d.field("cityName")).as_deref(),
//!     Some("Nakuru")
//! );
//! ```

#![warn(missing_docs)]

extern crate self as loandesk;

mod edit_state;
mod form;
mod id;
mod kind;
mod notify;
mod query;
mod records;
mod screen;
mod session;
mod store;
mod test_utils;
mod validate;

/// Typed endpoints of the loan-management API.
///
/// This module wraps the HTTP client with one method per remote operation, decoding
/// the wrapped wire shapes into records.
pub mod api;

/// Output formatting for the console.
///
/// Records render as aligned tables, JSON or YAML.
pub mod cli_utils;

/// Console command handlers.
///
/// This module contains the read-eval state of the console and one submodule per
/// command family.
pub mod commands;

/// Client configuration from files, the environment and command-line options.
pub mod config;

/// HTTP client utilities for talking to the remote API.
///
/// This module provides a small JSON client over `reqwest` and the error type every
/// remote call returns.
pub mod http_utils;

pub use api::{AuthReply, LoanApi, PasswordReset, Registration};
pub use config::{ClientConfig, ConfigError, Overrides};
pub use edit_state::{EditState, Submission};
pub use form::{Form, FormError, FormValue};
pub use id::{RecordId, RecordIdParseError};
pub use kind::{EntityKind, UnknownKind};
pub use notify::{Banner, ConfirmPrompt, Notices, Tone};
pub use query::{
    LookupOutcome, LookupQuery, QueryDisplay, QueryPanel, QueryParseError, classify,
};
pub use records::{
    City, CityDraft, Country, CountryDraft, Coverage, CoverageDraft, Customer, CustomerDraft,
    Draft, Gender, Loan, LoanDraft, LoanType, LoanTypeDraft, Occupation, OccupationDraft,
    Record, State, StateDraft,
};
pub use screen::{CrudScreen, DeleteOutcome, NotListed, SubmitOutcome};
pub use session::{AuthMode, Session};
pub use store::{EntityLists, ListStore};
pub use validate::{
    ValidationError, earliest_dob, validate_customer, validate_customer_on, validate_email,
    validate_new_password, validate_password,
};
