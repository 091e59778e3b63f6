//! # Lookup Queries
//!
//! Parameterized customer lookups and the panel that shows their outcome.
//!
//! A lookup answers in one of three shapes, wrapped under the kind's wire keys:
//!
//! ```text
//! { "customerDTO": { ... } }        a single record
//! { "customerListDTO": [ ... ] }    a list of records
//! { "customerCount": 3 }            a count
//! ```
//!
//! Some endpoints answer with the bare record instead.  [`classify`] inspects the body
//! and produces a [`LookupOutcome`]; a body matching none of the shapes is
//! [`LookupOutcome::Empty`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::NaiveDate;
use serde_json::Value;

use crate::api::LoanApi;
use crate::{Gender, Record, RecordId};

///////////////////////////////////////////// LookupQuery ////////////////////////////////////////////

/// A customer lookup and its single scalar argument.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupQuery {
    /// The customer with this identifier.
    CustomerById(RecordId),
    /// Customers living in the named city.
    ByCity(String),
    /// Customers of a gender.
    ByGender(Gender),
    /// Customers born before a date.
    BornBefore(NaiveDate),
    /// How many customers live in the named city.
    CountByCity(String),
    /// Customers holding a loan with a premium above an amount.
    PremiumAbove(f64),
    /// Customers with an occupation.
    ByOccupation(RecordId),
    /// Customers born after a date.
    BornAfter(NaiveDate),
}

impl LookupQuery {
    /// Console names of every lookup.
    pub const NAMES: &'static [&'static str] = &[
        "by-id",
        "by-city",
        "by-gender",
        "born-before",
        "count-by-city",
        "premium-above",
        "by-occupation",
        "born-after",
    ];

    /// Builds the lookup `name` from its raw argument.
    pub fn parse(name: &str, raw: &str) -> Result<Self, QueryParseError> {
        let raw = raw.trim();
        let invalid = |reason: String| QueryParseError::InvalidValue {
            query: name.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(invalid("a value is required".to_string()));
        }
        let query = match name {
            "by-id" => LookupQuery::CustomerById(raw.parse().map_err(|e| invalid(format!("{}", e)))?),
            "by-city" => LookupQuery::ByCity(raw.to_string()),
            "by-gender" => LookupQuery::ByGender(raw.parse().map_err(invalid)?),
            "born-before" => LookupQuery::BornBefore(parse_date(raw).map_err(invalid)?),
            "count-by-city" => LookupQuery::CountByCity(raw.to_string()),
            "premium-above" => {
                let amount: f64 = raw
                    .parse()
                    .map_err(|_| invalid(format!("'{}' is not an amount", raw)))?;
                if !amount.is_finite() {
                    return Err(invalid(format!("'{}' is not an amount", raw)));
                }
                LookupQuery::PremiumAbove(amount)
            }
            "by-occupation" => {
                LookupQuery::ByOccupation(raw.parse().map_err(|e| invalid(format!("{}", e)))?)
            }
            "born-after" => LookupQuery::BornAfter(parse_date(raw).map_err(invalid)?),
            _ => return Err(QueryParseError::UnknownQuery(name.to_string())),
        };
        Ok(query)
    }

    /// The console name of this lookup.
    pub fn name(&self) -> &'static str {
        match self {
            LookupQuery::CustomerById(_) => "by-id",
            LookupQuery::ByCity(_) => "by-city",
            LookupQuery::ByGender(_) => "by-gender",
            LookupQuery::BornBefore(_) => "born-before",
            LookupQuery::CountByCity(_) => "count-by-city",
            LookupQuery::PremiumAbove(_) => "premium-above",
            LookupQuery::ByOccupation(_) => "by-occupation",
            LookupQuery::BornAfter(_) => "born-after",
        }
    }

    /// Path segments of the lookup, relative to the API root.
    pub fn segments(&self) -> Vec<String> {
        let (family, value) = match self {
            LookupQuery::CustomerById(id) => return vec!["customers".to_string(), id.to_string()],
            LookupQuery::ByCity(city) => ("by-city", city.clone()),
            LookupQuery::ByGender(gender) => ("by-gender", gender.code().to_string()),
            LookupQuery::BornBefore(date) => ("born-before", date.to_string()),
            LookupQuery::CountByCity(city) => ("count-by-city", city.clone()),
            LookupQuery::PremiumAbove(amount) => ("premium-above", amount.to_string()),
            LookupQuery::ByOccupation(id) => ("by-occupation", id.to_string()),
            LookupQuery::BornAfter(date) => ("born-after", date.to_string()),
        };
        vec!["customers".to_string(), family.to_string(), value]
    }
}

impl Display for LookupQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.segments().join("/"))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date; use YYYY-MM-DD", raw))
}

/// Error for a lookup that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    /// No lookup has this name.
    UnknownQuery(String),
    /// The argument does not fit the lookup.
    InvalidValue {
        /// The lookup name.
        query: String,
        /// Why the argument was rejected.
        reason: String,
    },
}

impl Display for QueryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            QueryParseError::UnknownQuery(name) => write!(f, "Unknown query '{}'", name),
            QueryParseError::InvalidValue { query, reason } => {
                write!(f, "Invalid value for {}: {}", query, reason)
            }
        }
    }
}

impl std::error::Error for QueryParseError {}

//////////////////////////////////////////// LookupOutcome ///////////////////////////////////////////

/// What a lookup response turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<R> {
    /// A single record.
    Record(R),
    /// A list of records, in server order.
    List(Vec<R>),
    /// A count.
    Count(u64),
    /// None of the recognized shapes.
    Empty,
}

/// Classifies a lookup response by inspecting its keys.
///
/// The record key wins over the list key, which wins over the count key.  A body that
/// is itself a record, recognized by the kind's identifier field, is a single record.
pub fn classify<R: Record>(body: &Value) -> LookupOutcome<R> {
    let kind = R::KIND;
    if let Some(record) = decode::<R>(body.get(kind.record_key())) {
        return LookupOutcome::Record(record);
    }
    if let Some(list) = decode::<Vec<R>>(body.get(kind.list_key())) {
        return LookupOutcome::List(list);
    }
    if let Some(count) = body.get(kind.count_key()).and_then(Value::as_u64) {
        return LookupOutcome::Count(count);
    }
    if body.get(kind.id_field()).is_some_and(|id| !id.is_null()) {
        if let Some(record) = decode::<R>(Some(body)) {
            return LookupOutcome::Record(record);
        }
    }
    LookupOutcome::Empty
}

fn decode<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(error = %e, "lookup response is malformed");
            None
        }
    }
}

////////////////////////////////////////////// QueryPanel ////////////////////////////////////////////

/// What the query panel shows.
#[derive(Debug, PartialEq)]
pub enum QueryDisplay<'a, R> {
    /// Matching records.
    Results(&'a [R]),
    /// A count.
    Count(u64),
    /// The last lookup matched nothing, or none has run.
    NoResults,
    /// The last lookup failed.
    Failed(&'a str),
}

/// Results, count and error of the last lookup.
#[derive(Debug, Clone)]
pub struct QueryPanel<R> {
    results: Vec<R>,
    count: Option<u64>,
    error: Option<String>,
}

impl<R> Default for QueryPanel<R> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: None,
            error: None,
        }
    }
}

impl<R: Record> QueryPanel<R> {
    /// Creates an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `query`, replacing whatever the panel showed.
    pub async fn dispatch(&mut self, api: &LoanApi, query: &LookupQuery) {
        self.clear();
        match api.lookup(query).await {
            Ok(body) => self.apply(classify(&body)),
            Err(e) => {
                tracing::warn!(%query, error = %e, "lookup failed");
                let detail = e.failure_message().unwrap_or_else(|| e.to_string());
                self.error = Some(format!("Error executing query: {}", detail));
            }
        }
    }

    fn apply(&mut self, outcome: LookupOutcome<R>) {
        match outcome {
            LookupOutcome::Record(record) => self.results = vec![record],
            LookupOutcome::List(records) => self.results = records,
            LookupOutcome::Count(count) => self.count = Some(count),
            LookupOutcome::Empty => {}
        }
    }

    /// Clears results, count and error.
    pub fn clear(&mut self) {
        self.results.clear();
        self.count = None;
        self.error = None;
    }

    /// Records returned by the last lookup.
    pub fn results(&self) -> &[R] {
        &self.results
    }

    /// Count returned by the last lookup.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Error of the last lookup.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// What the panel shows.
    pub fn display(&self) -> QueryDisplay<'_, R> {
        if let Some(error) = &self.error {
            QueryDisplay::Failed(error)
        } else if let Some(count) = self.count {
            QueryDisplay::Count(count)
        } else if !self.results.is_empty() {
            QueryDisplay::Results(&self.results)
        } else {
            QueryDisplay::NoResults
        }
    }
}
