//! Order form checks.
//!
//! Checks run in a fixed order and stop at the first failure, so when several
//! fields are wrong the user sees the message of the earliest check.

use crate::domain::order::{OrderField, OrderFormInput};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;
pub const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
    #[error("Pickup date must be today or in the future.")]
    PickupDateInPast,
    #[error("Please provide more details about your order.")]
    DescriptionTooShort,
}

/// Verdict of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reason: String },
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationResult::Valid,
            Err(error) => ValidationResult::Invalid {
                reason: error.to_string(),
            },
        }
    }
}

/// Runs every check against `input`, treating `today` as the earliest pickup date.
///
/// The description minimum counts Unicode scalar values, not UTF-16 code units,
/// so characters outside the Basic Multilingual Plane (emoji) count once each.
pub fn check(input: &OrderFormInput, today: NaiveDate) -> Result<(), ValidationError> {
    if OrderField::ALL
        .iter()
        .any(|field| input.get(*field).is_empty())
    {
        return Err(ValidationError::MissingFields);
    }

    if !is_valid_email(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }

    let digits = input.phone.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ValidationError::InvalidPhone);
    }

    match parse_pickup_date(&input.pickup_date) {
        Some(date) if date >= today => {}
        _ => return Err(ValidationError::PickupDateInPast),
    }

    if input.description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooShort);
    }

    Ok(())
}

pub fn validate(input: &OrderFormInput, today: NaiveDate) -> ValidationResult {
    check(input, today).into()
}

/// Validates against the local calendar date.
pub fn validate_today(input: &OrderFormInput) -> ValidationResult {
    validate(input, Local::now().date_naive())
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    regex.is_match(email)
}

/// Date inputs submit `YYYY-MM-DD`; a value carrying a time part is truncated to its date.
fn parse_pickup_date(value: &str) -> Option<NaiveDate> {
    let date = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
