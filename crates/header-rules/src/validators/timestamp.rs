use chrono::{DateTime, FixedOffset, ParseError};

use crate::result::{Failure, ValidationResult};

use super::HeaderValidator;

/// Accepts base-10 integers that fit in an `i64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpochTimestampValidator;

impl HeaderValidator for EpochTimestampValidator {
    fn validate(&self, _header_name: &str, header_value: &str) -> ValidationResult {
        match header_value.parse::<i64>() {
            Ok(_) => ValidationResult::Success,
            Err(error) => {
                Failure::with_cause("Header value is not a valid epoch timestamp", error).into()
            }
        }
    }
}

/// Instant layouts with and without seconds; the fraction is optional.
const INSTANT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const INSTANT_WITH_MINUTES: &str = "%Y-%m-%dT%H:%M%:z";

/// Accepts ISO-8601 instants such as `2024-05-01T10:15Z`,
/// `2024-05-01T10:15:30Z` or `2024-05-01T10:15:30.250+03:00`.
///
/// The date and time must be joined by `T` and followed by `Z` or an
/// offset; both letters are matched without regard to case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Iso8601TimestampValidator;

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let upper = value.to_ascii_uppercase();
    let normalized = upper
        .strip_suffix('Z')
        .map_or_else(|| upper.clone(), |local| format!("{local}+00:00"));
    DateTime::parse_from_str(&normalized, INSTANT_WITH_SECONDS)
        .or_else(|_| DateTime::parse_from_str(&normalized, INSTANT_WITH_MINUTES))
}

impl HeaderValidator for Iso8601TimestampValidator {
    fn validate(&self, _header_name: &str, header_value: &str) -> ValidationResult {
        match parse_instant(header_value) {
            Ok(_) => ValidationResult::Success,
            Err(error) => Failure::with_cause(
                "Invalid timestamp format. Expected ISO-8601 format: yyyy-MM-dd'T'HH:mm:ss.SSSZ",
                error,
            )
            .into(),
        }
    }
}
