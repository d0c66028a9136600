use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::domain::demo::errors::DemoFieldError;
use crate::domain::demo::errors::PhoneError;
use crate::domain::identifier::uuid_identifier;
use crate::domain::pagination::PageRequest;
use crate::domain::user::models::EmailAddress;

uuid_identifier!(
    /// Demo request unique identifier type
    DemoEntryId
);

/// A demo appointment left through the landing-page form.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoEntry {
    pub id: DemoEntryId,
    pub name: DemoText,
    pub brand: DemoText,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub preferred_time: DemoText,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Required, trimmed, length-bounded text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoText(String);

impl DemoText {
    pub const NAME_MAX_LENGTH: usize = 255;
    pub const TIME_MAX_LENGTH: usize = 64;

    pub fn new(field: &'static str, value: String, max: usize) -> Result<Self, DemoFieldError> {
        let value = value.trim().to_string();
        let length = value.chars().count();

        if length == 0 {
            Err(DemoFieldError::Empty { field })
        } else if length > max {
            Err(DemoFieldError::TooLong {
                field,
                max,
                actual: length,
            })
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number: digits with optional leading `+` and spaces or hyphens
/// between groups. Between 6 and 20 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 6;
    const MAX_DIGITS: usize = 20;

    pub fn new(phone: String) -> Result<Self, PhoneError> {
        let phone = phone.trim().to_string();
        let body = phone.strip_prefix('+').unwrap_or(&phone);

        let well_formed = body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
        let digits = body.chars().filter(char::is_ascii_digit).count();

        if well_formed && (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            Ok(Self(phone))
        } else {
            Err(PhoneError::Invalid(phone))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct DemoCommand {
    pub name: DemoText,
    pub brand: DemoText,
    pub phone: PhoneNumber,
    pub email: Option<EmailAddress>,
    pub preferred_time: DemoText,
    pub scheduled_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct ListDemosQuery {
    pub page: PageRequest,
    /// Case-insensitive match on the contact name.
    pub search: Option<String>,
}
