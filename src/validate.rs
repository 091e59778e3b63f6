//! # Draft Validation
//!
//! Pure checks run on every submit attempt before anything reaches the network.  Each
//! check returns the first failing rule only, so the user always sees a single reason.
//!
//! ## Customer rules
//!
//! Checked in this order:
//!
//! 1. every field is present and non-blank
//! 2. first and last name are 2-50 letters or spaces
//! 3. the mobile number is exactly ten digits
//! 4. the date of birth is written `YYYY-MM-DD`
//! 5. the date of birth is a real calendar date that is not in the future
//! 6. the date of birth is not before 1900-01-01
//!
//! ## Usage Examples
//!
//! ```rust
//! use loandesk::{CustomerDraft, ValidationError, validate_customer};
//!
//! let draft = CustomerDraft::default();
//! assert_eq!(
//!     validate_customer(&draft),
//!     Err(ValidationError::Required("First Name"))
//! );
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::CustomerDraft;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]{2,50}$").expect("name pattern compiles"));
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern compiles"));
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";
const MIN_PASSWORD_LEN: usize = 8;

/// The earliest accepted date of birth.
pub fn earliest_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The first rule a draft or credential form broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank; carries the field's label.
    Required(&'static str),
    /// A name is not 2-50 letters or spaces; carries the field's label.
    NamePattern(&'static str),
    /// The mobile number is not exactly ten digits.
    MobileNumber,
    /// The date of birth is not written `YYYY-MM-DD`.
    DateFormat,
    /// The date of birth is not a calendar date, or lies in the future.
    DateNotPast,
    /// The date of birth is before 1900-01-01.
    DateTooEarly,
    /// The email address is not of the form `local@domain.tld`.
    Email,
    /// A registration password is too weak.
    Password,
    /// A replacement password is too weak.
    NewPassword,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationError::Required(label) => write!(f, "{} is required.", label),
            ValidationError::NamePattern(label) => write!(
                f,
                "{} must be 2-50 characters long and contain only letters and spaces.",
                label
            ),
            ValidationError::MobileNumber => write!(f, "Mobile Number must be exactly 10 digits."),
            ValidationError::DateFormat => {
                write!(f, "Date of Birth must be in YYYY-MM-DD format.")
            }
            ValidationError::DateNotPast => write!(f, "Date of Birth must be a valid past date."),
            ValidationError::DateTooEarly => write!(f, "Date of Birth cannot be before 1900."),
            ValidationError::Email => write!(f, "Please enter a valid email address"),
            ValidationError::Password => write!(
                f,
                "Password must be at least 8 characters and include uppercase, lowercase, number, and special character."
            ),
            ValidationError::NewPassword => {
                write!(f, "New password must meet complexity requirements.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a customer draft against today's local date.
pub fn validate_customer(draft: &CustomerDraft) -> Result<(), ValidationError> {
    validate_customer_on(draft, Local::now().date_naive())
}

/// Validates a customer draft, treating `today` as the current date.
pub fn validate_customer_on(
    draft: &CustomerDraft,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let required: [(&'static str, bool); 9] = [
        ("First Name", is_present(&draft.first_name)),
        ("Last Name", is_present(&draft.last_name)),
        ("Gender", draft.gender.is_some()),
        ("Date of Birth", is_present(&draft.dob)),
        ("Mobile Number", is_present(&draft.mobile_number)),
        ("City", draft.city_id.is_some()),
        ("State", draft.state_id.is_some()),
        ("Country", draft.country_id.is_some()),
        ("Occupation", draft.occupation_id.is_some()),
    ];
    if let Some((label, _)) = required.iter().find(|(_, present)| !present) {
        return Err(ValidationError::Required(*label));
    }

    if !NAME_PATTERN.is_match(&draft.first_name) {
        return Err(ValidationError::NamePattern("First Name"));
    }
    if !NAME_PATTERN.is_match(&draft.last_name) {
        return Err(ValidationError::NamePattern("Last Name"));
    }

    if !MOBILE_PATTERN.is_match(&draft.mobile_number) {
        return Err(ValidationError::MobileNumber);
    }

    if !DATE_PATTERN.is_match(&draft.dob) {
        return Err(ValidationError::DateFormat);
    }
    let dob = match NaiveDate::parse_from_str(&draft.dob, "%Y-%m-%d") {
        Ok(dob) if dob <= today => dob,
        _ => return Err(ValidationError::DateNotPast),
    };
    if dob < earliest_dob() {
        return Err(ValidationError::DateTooEarly);
    }

    Ok(())
}

/// Checks that `email` looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

/// Checks password complexity: length, both cases, a digit and a special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(ValidationError::Password)
    }
}

/// Same rules as [`validate_password`], reported for the password reset form.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(ValidationError::NewPassword)
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, RecordId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_draft() -> CustomerDraft {
        CustomerDraft {
            first_name: "Amina".to_string(),
            last_name: "Odhiambo".to_string(),
            gender: Some(Gender::Female),
            dob: "1988-02-29".to_string(),
            mobile_number: "0722000111".to_string(),
            city_id: Some(RecordId::new(1)),
            state_id: Some(RecordId::new(2)),
            country_id: Some(RecordId::new(3)),
            occupation_id: Some(RecordId::new(4)),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(validate_customer_on(&valid_draft(), today()), Ok(()));
    }

    #[test]
    fn missing_fields_reported_in_order() {
        let mut draft = valid_draft();
        draft.last_name = "  ".to_string();
        draft.city_id = None;
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::Required("Last Name"))
        );
        draft.last_name = "Otieno".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::Required("City"))
        );
    }

    #[test]
    fn missing_gender_is_required() {
        let mut draft = valid_draft();
        draft.gender = None;
        let err = validate_customer_on(&draft, today()).unwrap_err();
        assert_eq!(err.to_string(), "Gender is required.");
    }

    #[test]
    fn names_must_be_letters_and_spaces() {
        let mut draft = valid_draft();
        draft.first_name = "A".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::NamePattern("First Name"))
        );
        draft.first_name = "Mary Anne".to_string();
        draft.last_name = "O'Neil".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::NamePattern("Last Name"))
        );
        draft.last_name = "x".repeat(51);
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::NamePattern("Last Name"))
        );
    }

    #[test]
    fn mobile_number_must_be_ten_digits() {
        let mut draft = valid_draft();
        draft.mobile_number = "12345".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::MobileNumber)
        );
        draft.mobile_number = "1234567890".to_string();
        assert_eq!(validate_customer_on(&draft, today()), Ok(()));
        draft.mobile_number = "12345678901".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::MobileNumber)
        );
    }

    #[test]
    fn mobile_number_rejects_non_ascii_digits() {
        let mut draft = valid_draft();
        draft.mobile_number = "١٢٣٤٥٦٧٨٩٠".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::MobileNumber)
        );
    }

    #[test]
    fn dob_format() {
        let mut draft = valid_draft();
        draft.dob = "01/02/1990".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::DateFormat)
        );
    }

    #[test]
    fn dob_must_be_calendar_date() {
        let mut draft = valid_draft();
        draft.dob = "1990-02-30".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::DateNotPast)
        );
    }

    #[test]
    fn dob_must_not_be_future() {
        let mut draft = valid_draft();
        draft.dob = "2024-06-02".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::DateNotPast)
        );
        draft.dob = "2024-06-01".to_string();
        assert_eq!(validate_customer_on(&draft, today()), Ok(()));
    }

    #[test]
    fn dob_minimum() {
        let mut draft = valid_draft();
        draft.dob = "1899-12-31".to_string();
        assert_eq!(
            validate_customer_on(&draft, today()),
            Err(ValidationError::DateTooEarly)
        );
        draft.dob = "1900-01-01".to_string();
        assert_eq!(validate_customer_on(&draft, today()), Ok(()));
    }

    #[test]
    fn email_rules() {
        assert_eq!(validate_email("ops@lender.co.ke"), Ok(()));
        assert_eq!(validate_email("ops@lender"), Err(ValidationError::Email));
        assert_eq!(validate_email("ops lender@x.io"), Err(ValidationError::Email));
    }

    #[test]
    fn password_rules() {
        assert_eq!(validate_password("Str0ng!pass"), Ok(()));
        assert_eq!(validate_password("Sh0rt!"), Err(ValidationError::Password));
        assert_eq!(validate_password("nouppercase1!"), Err(ValidationError::Password));
        assert_eq!(validate_password("NoDigits!!"), Err(ValidationError::Password));
        assert_eq!(validate_password("NoSpecial123"), Err(ValidationError::Password));
        assert_eq!(
            validate_new_password("weak"),
            Err(ValidationError::NewPassword)
        );
    }
}
