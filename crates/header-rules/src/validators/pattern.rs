use regex::{Regex, RegexBuilder};

use crate::result::ValidationResult;

use super::HeaderValidator;

/// Accepts values that match a regular expression in full.
///
/// The pattern is anchored at both ends when compiled, so `v\d+` rejects
/// `v1-beta` even though a prefix matches.
///
/// # Examples
/// ```
/// use header_rules::{HeaderValidator, RegexValidator};
///
/// let validator = RegexValidator::new(r"v\d+").expect("valid pattern");
/// assert!(validator.validate("X-Version", "v12").is_success());
/// assert!(!validator.validate("X-Version", "v12-beta").is_success());
/// ```
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: String,
    matcher: Regex,
}

impl RegexValidator {
    /// Compile a case-sensitive validator.
    ///
    /// # Errors
    /// Returns [`regex::Error`] when the pattern is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Self::build(pattern, false)
    }

    /// Compile a validator that ignores letter case.
    ///
    /// # Errors
    /// Returns [`regex::Error`] when the pattern is not a valid expression.
    pub fn case_insensitive(pattern: &str) -> Result<Self, regex::Error> {
        Self::build(pattern, true)
    }

    fn build(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let matcher = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            pattern: pattern.to_owned(),
            matcher,
        })
    }

    /// The pattern as written in configuration.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl HeaderValidator for RegexValidator {
    fn validate(&self, _header_name: &str, header_value: &str) -> ValidationResult {
        if self.matcher.is_match(header_value) {
            ValidationResult::Success
        } else {
            ValidationResult::failure(format!(
                "Header value '{header_value}' does not match pattern '{}'",
                self.pattern
            ))
        }
    }
}
