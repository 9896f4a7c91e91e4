//! Common validation utilities.

use chrono::NaiveTime;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref NON_DIGIT_RE: Regex = Regex::new(r"\D").unwrap();
}

/// Minimum number of digits in a phone number (area code + 8 digits).
const MIN_PHONE_DIGITS: usize = 10;

/// Maximum number of digits in a phone number (area code + 9 digits).
const MAX_PHONE_DIGITS: usize = 11;

/// Strips everything but digits from a phone number.
pub fn phone_digits(phone: &str) -> String {
    NON_DIGIT_RE.replace_all(phone, "").into_owned()
}

/// Validates a phone number. Empty is accepted; otherwise it must hold
/// 10 or 11 digits once punctuation is removed.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Ok(());
    }
    let digits = phone_digits(phone).len();
    if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must have 10 or 11 digits".into());
        Err(err)
    }
}

/// Validates an optional email address. Empty strings are accepted.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email format".into());
        Err(err)
    }
}

/// Parses a wall-clock time written as `HH:MM`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.len() != 5 || value.as_bytes()[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Rounds a monetary amount to two decimal places.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
