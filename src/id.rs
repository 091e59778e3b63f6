use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

////////////////////////////////////////////// RecordId //////////////////////////////////////////////

/// Identifier of a record, assigned by the remote system.
///
/// Identifiers are opaque to the client: they are only ever parsed from user input or
/// decoded from responses, never generated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw identifier.
    pub fn new(raw: i64) -> Self {
        RecordId(raw)
    }

    /// Returns the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

/////////////////////////////////////////// Display and FromStr ///////////////////////////////////////

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Reasons a string does not name a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdParseError {
    /// Nothing was provided.
    Empty,
    /// The input is not an integer.
    NotANumber(String),
}

impl Display for RecordIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RecordIdParseError::Empty => write!(f, "Record ID must not be empty"),
            RecordIdParseError::NotANumber(input) => {
                write!(f, "Record ID '{}' is not a whole number", input)
            }
        }
    }
}

impl std::error::Error for RecordIdParseError {}

impl FromStr for RecordId {
    type Err = RecordIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RecordIdParseError::Empty);
        }
        s.parse::<i64>()
            .map(RecordId)
            .map_err(|_| RecordIdParseError::NotANumber(s.to_string()))
    }
}
