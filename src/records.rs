//! # Records and Drafts
//!
//! Typed records for every entity kind, as returned by the remote API, and the drafts
//! used to create or update them.  Drafts never carry the record's own identifier: the
//! identifier of an update travels in the request path.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use loandesk_derive::Form;

use crate::{EntityKind, Form, FormValue, RecordId, ValidationError};

/// A record of one entity kind.
pub trait Record: Form + Clone + Debug + Serialize + DeserializeOwned {
    /// The editable counterpart of this record.
    type Draft: Draft;

    /// The kind this record belongs to.
    const KIND: EntityKind;

    /// The identifier assigned by the remote system.
    fn id(&self) -> RecordId;

    /// Copies the editable fields into a fresh draft.
    fn to_draft(&self) -> Self::Draft;

    /// Short name used when the record is offered as a choice in another form.
    fn label(&self) -> String;
}

/// The editable, not yet persisted copy of a record.
pub trait Draft: Form + Clone + Debug + Default + Serialize {
    /// Checks the draft before submission.  Only customers carry rules.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Reads a JSON `null` as the type's default, so one sparse record does not spoil a list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/////////////////////////////////////////////// Gender ///////////////////////////////////////////////

/// Customer gender as accepted by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// `M`
    #[serde(rename = "M")]
    Male,
    /// `F`
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// The single-letter code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            _ => Err(format!("'{}' is not a gender; use M or F", s)),
        }
    }
}

impl FormValue for Gender {
    fn parse_form(raw: &str) -> Result<Self, String> {
        raw.parse()
    }

    fn render_form(&self) -> String {
        self.code().to_string()
    }
}

/////////////////////////////////////////// Named records ////////////////////////////////////////////

macro_rules! named_record {
    ($record:ident, $draft:ident, $kind:expr, $id:ident, $name:ident, $what:literal) => {
        #[doc = concat!("A ", $what, " as listed by the remote API.")]
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Form)]
        #[serde(rename_all = "camelCase")]
        pub struct $record {
            #[doc = concat!("Identifier of the ", $what, ".")]
            pub $id: RecordId,
            #[doc = concat!("Name of the ", $what, ".")]
            #[serde(default, deserialize_with = "null_as_default")]
            pub $name: String,
        }

        #[doc = concat!("Editable copy of a ", $what, ".")]
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Form)]
        #[serde(rename_all = "camelCase")]
        pub struct $draft {
            #[doc = concat!("Name of the ", $what, ".")]
            pub $name: String,
        }

        impl Record for $record {
            type Draft = $draft;
            const KIND: EntityKind = $kind;

            fn id(&self) -> RecordId {
                self.$id
            }

            fn to_draft(&self) -> $draft {
                $draft {
                    $name: self.$name.clone(),
                }
            }

            fn label(&self) -> String {
                self.$name.clone()
            }
        }

        impl Draft for $draft {}
    };
}

named_record!(City, CityDraft, EntityKind::City, city_id, city_name, "city");
named_record!(State, StateDraft, EntityKind::State, state_id, state_name, "state");
named_record!(
    Country,
    CountryDraft,
    EntityKind::Country,
    country_id,
    country_name,
    "country"
);
named_record!(
    Occupation,
    OccupationDraft,
    EntityKind::Occupation,
    occupation_id,
    occupation_name,
    "occupation"
);
named_record!(
    Coverage,
    CoverageDraft,
    EntityKind::Coverage,
    coverage_id,
    coverage_name,
    "coverage"
);
named_record!(
    LoanType,
    LoanTypeDraft,
    EntityKind::LoanType,
    type_id,
    type_name,
    "loan type"
);

////////////////////////////////////////////// Customer //////////////////////////////////////////////

/// A customer as listed by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Identifier of the customer.
    pub customer_id: RecordId,
    /// Given name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Gender code as sent by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    /// Date of birth, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dob: String,
    /// Ten-digit mobile number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile_number: String,
    /// City of residence.
    #[serde(default)]
    pub city_id: Option<RecordId>,
    /// State of residence.
    #[serde(default)]
    pub state_id: Option<RecordId>,
    /// Country of residence.
    #[serde(default)]
    pub country_id: Option<RecordId>,
    /// Occupation.
    #[serde(default)]
    pub occupation_id: Option<RecordId>,
}

/// Editable copy of a customer.
///
/// Text fields hold the raw input so the validation rules can judge it; the foreign keys
/// are not checked for existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender, preselected to `M` on a blank draft.
    pub gender: Option<Gender>,
    /// Date of birth as typed.
    pub dob: String,
    /// Mobile number as typed.
    pub mobile_number: String,
    /// City of residence.
    pub city_id: Option<RecordId>,
    /// State of residence.
    pub state_id: Option<RecordId>,
    /// Country of residence.
    pub country_id: Option<RecordId>,
    /// Occupation.
    pub occupation_id: Option<RecordId>,
}

impl Default for CustomerDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            gender: Some(Gender::Male),
            dob: String::new(),
            mobile_number: String::new(),
            city_id: None,
            state_id: None,
            country_id: None,
            occupation_id: None,
        }
    }
}

impl Record for Customer {
    type Draft = CustomerDraft;
    const KIND: EntityKind = EntityKind::Customer;

    fn id(&self) -> RecordId {
        self.customer_id
    }

    fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.parse().ok(),
            dob: self.dob.clone(),
            mobile_number: self.mobile_number.clone(),
            city_id: self.city_id,
            state_id: self.state_id,
            country_id: self.country_id,
            occupation_id: self.occupation_id,
        }
    }

    fn label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Draft for CustomerDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_customer(self)
    }
}

//////////////////////////////////////////////// Loan ////////////////////////////////////////////////

/// A loan as listed by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Identifier of the loan.
    pub loan_id: RecordId,
    /// Business loan number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub loan_number: String,
    /// Premium amount; blank when the server has none.
    #[serde(default)]
    pub premium: Option<f64>,
    /// Coverage of the loan.
    #[serde(default)]
    pub coverage_id: Option<RecordId>,
    /// Loan type; some responses call this `loanTypeId`.
    #[serde(default, alias = "loanTypeId")]
    pub policy_type_id: Option<RecordId>,
    /// Borrowing customer.
    #[serde(default)]
    pub customer_id: Option<RecordId>,
}

/// Editable copy of a loan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Form)]
#[serde(rename_all = "camelCase")]
pub struct LoanDraft {
    /// Business loan number.
    pub loan_number: String,
    /// Premium amount.
    pub premium: Option<f64>,
    /// Coverage of the loan.
    pub coverage_id: Option<RecordId>,
    /// Loan type.
    pub policy_type_id: Option<RecordId>,
    /// Borrowing customer.
    pub customer_id: Option<RecordId>,
}

impl Record for Loan {
    type Draft = LoanDraft;
    const KIND: EntityKind = EntityKind::Loan;

    fn id(&self) -> RecordId {
        self.loan_id
    }

    fn to_draft(&self) -> LoanDraft {
        LoanDraft {
            loan_number: self.loan_number.clone(),
            premium: self.premium,
            coverage_id: self.coverage_id,
            policy_type_id: self.policy_type_id,
            customer_id: self.customer_id,
        }
    }

    fn label(&self) -> String {
        self.loan_number.clone()
    }
}

impl Draft for LoanDraft {}
