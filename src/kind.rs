use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

///////////////////////////////////////////// EntityKind /////////////////////////////////////////////

/// The kinds of record managed through the remote API.
///
/// Each kind knows its endpoint family and the keys under which the API wraps single
/// records, lists and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Cities customers live in.
    City,
    /// States customers live in.
    State,
    /// Countries customers live in.
    Country,
    /// Customer occupations.
    Occupation,
    /// Loan coverages.
    Coverage,
    /// Loan (policy) types.
    LoanType,
    /// Customers.
    Customer,
    /// Loans.
    Loan,
}

impl EntityKind {
    /// Every kind, in navigation order.
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Customer,
        EntityKind::City,
        EntityKind::State,
        EntityKind::Country,
        EntityKind::Occupation,
        EntityKind::Coverage,
        EntityKind::LoanType,
        EntityKind::Loan,
    ];

    /// Path segment of the kind's endpoint family.
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::City => "cities",
            EntityKind::State => "states",
            EntityKind::Country => "countries",
            EntityKind::Occupation => "occupations",
            EntityKind::Coverage => "coverages",
            EntityKind::LoanType => "loans-types",
            EntityKind::Customer => "customers",
            EntityKind::Loan => "loan",
        }
    }

    /// Prefix the API uses for `<prefix>DTO`, `<prefix>ListDTO` and `<prefix>Count`.
    pub fn wire_prefix(self) -> &'static str {
        match self {
            EntityKind::City => "city",
            EntityKind::State => "state",
            EntityKind::Country => "country",
            EntityKind::Occupation => "occupation",
            EntityKind::Coverage => "coverage",
            EntityKind::LoanType => "loansType",
            EntityKind::Customer => "customer",
            EntityKind::Loan => "loan",
        }
    }

    /// Name of the identifier field on a record of this kind.
    pub fn id_field(self) -> &'static str {
        match self {
            EntityKind::City => "cityId",
            EntityKind::State => "stateId",
            EntityKind::Country => "countryId",
            EntityKind::Occupation => "occupationId",
            EntityKind::Coverage => "coverageId",
            EntityKind::LoanType => "typeId",
            EntityKind::Customer => "customerId",
            EntityKind::Loan => "loanId",
        }
    }

    /// Key wrapping a single record.
    pub fn record_key(self) -> String {
        format!("{}DTO", self.wire_prefix())
    }

    /// Key wrapping a list of records.
    pub fn list_key(self) -> String {
        format!("{}ListDTO", self.wire_prefix())
    }

    /// Key wrapping a count of records.
    pub fn count_key(self) -> String {
        format!("{}Count", self.wire_prefix())
    }

    /// Human-readable singular noun.
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::City => "city",
            EntityKind::State => "state",
            EntityKind::Country => "country",
            EntityKind::Occupation => "occupation",
            EntityKind::Coverage => "coverage",
            EntityKind::LoanType => "loan type",
            EntityKind::Customer => "customer",
            EntityKind::Loan => "loan",
        }
    }

    /// Human-readable plural noun.
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::City => "cities",
            EntityKind::State => "states",
            EntityKind::Country => "countries",
            EntityKind::Occupation => "occupations",
            EntityKind::Coverage => "coverages",
            EntityKind::LoanType => "loan types",
            EntityKind::Customer => "customers",
            EntityKind::Loan => "loans",
        }
    }

    /// Console command word for the kind.
    pub fn command(self) -> &'static str {
        match self {
            EntityKind::City => "city",
            EntityKind::State => "state",
            EntityKind::Country => "country",
            EntityKind::Occupation => "occupation",
            EntityKind::Coverage => "coverage",
            EntityKind::LoanType => "loan-type",
            EntityKind::Customer => "customer",
            EntityKind::Loan => "loan",
        }
    }

    /// Finds the kind whose endpoint family is `path`.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.noun())
    }
}

/// Error for a string that names no entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl Display for UnknownKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Unknown entity kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let kind = match normalized.as_str() {
            "city" | "cities" => EntityKind::City,
            "state" | "states" => EntityKind::State,
            "country" | "countries" => EntityKind::Country,
            "occupation" | "occupations" => EntityKind::Occupation,
            "coverage" | "coverages" => EntityKind::Coverage,
            "loan-type" | "loan-types" | "loantype" | "loantypes" => EntityKind::LoanType,
            "customer" | "customers" => EntityKind::Customer,
            "loan" | "loans" => EntityKind::Loan,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}
