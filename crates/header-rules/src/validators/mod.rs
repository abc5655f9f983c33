//! Header value validators.
//!
//! A validator is a pure function from `(header name, header value)` to a
//! [`ValidationResult`]. Absent headers never reach a validator; the rule
//! layer decides whether absence is a violation.
//!
//! Built-in validators:
//! - [`DefaultValidator`]: the value must contain a non-whitespace character.
//! - [`RegexValidator`]: the whole value must match a pattern.
//! - [`EpochTimestampValidator`]: the value must be a signed 64-bit integer.
//! - [`Iso8601TimestampValidator`]: the value must be an ISO-8601 instant.
//! - [`NameEchoValidator`]: the value must repeat the header name with a
//!   minimum number of uppercase letters. It exists to demonstrate named,
//!   application-configured validators.

mod default;
mod echo;
mod pattern;
mod timestamp;

use std::sync::Arc;

use crate::result::ValidationResult;

pub use self::default::DefaultValidator;
pub use self::echo::NameEchoValidator;
pub use self::pattern::RegexValidator;
pub use self::timestamp::{EpochTimestampValidator, Iso8601TimestampValidator};

/// Capability to validate one header value.
///
/// Implementations must be stateless with respect to requests: the same
/// instance is shared by every concurrent validation pass.
///
/// Plain functions and closures with the matching signature are validators:
///
/// ```
/// use header_rules::{HeaderValidator, ValidationResult};
///
/// let digits_only = |_: &str, value: &str| {
///     if value.chars().all(|c| c.is_ascii_digit()) {
///         ValidationResult::Success
///     } else {
///         ValidationResult::failure("digits only")
///     }
/// };
/// assert!(digits_only.validate("X-Count", "42").is_success());
/// ```
pub trait HeaderValidator: Send + Sync {
    /// Validate `header_value`, which was supplied under `header_name`.
    fn validate(&self, header_name: &str, header_value: &str) -> ValidationResult;
}

impl<F> HeaderValidator for F
where
    F: Fn(&str, &str) -> ValidationResult + Send + Sync,
{
    fn validate(&self, header_name: &str, header_value: &str) -> ValidationResult {
        self(header_name, header_value)
    }
}

/// Reference-counted validator shared between rules and requests.
pub type SharedValidator = Arc<dyn HeaderValidator>;

/// Build a regex validator, degrading to [`DefaultValidator`] when the
/// pattern does not compile.
///
/// The compile error is logged at `error` level.
#[must_use]
pub fn regex_or_default(
    header_name: &str,
    pattern: &str,
    case_insensitive: bool,
) -> SharedValidator {
    let compiled = if case_insensitive {
        RegexValidator::case_insensitive(pattern)
    } else {
        RegexValidator::new(pattern)
    };
    match compiled {
        Ok(validator) => Arc::new(validator),
        Err(error) => {
            tracing::error!(
                header = header_name,
                pattern,
                %error,
                "invalid header pattern; falling back to the default validator"
            );
            Arc::new(DefaultValidator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_validators() {
        let validator: SharedValidator = Arc::new(|name: &str, value: &str| {
            if value == name {
                ValidationResult::Success
            } else {
                ValidationResult::failure("mismatch")
            }
        });

        assert!(validator.validate("X-A", "X-A").is_success());
        assert!(!validator.validate("X-A", "x-b").is_success());
    }

    #[test]
    fn malformed_pattern_degrades_to_default() {
        let validator = regex_or_default("X-Broken", "(unclosed", false);

        assert!(validator.validate("X-Broken", "anything").is_success());
        assert!(!validator.validate("X-Broken", "  ").is_success());
    }

    #[test]
    fn valid_pattern_is_enforced() {
        let validator = regex_or_default("X-Version", "v\\d+", true);

        assert!(validator.validate("X-Version", "V2").is_success());
        assert!(!validator.validate("X-Version", "2v").is_success());
    }
}
