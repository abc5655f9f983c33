use crate::result::ValidationResult;

use super::HeaderValidator;

const DEFAULT_MIN_UPPERCASE: usize = 1;

/// Accepts a value that repeats the header name (ignoring case) and contains
/// at least `min_uppercase` uppercase letters.
///
/// Applications register it by name in a
/// [`ValidatorRegistry`](crate::ValidatorRegistry) with the threshold taken
/// from their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEchoValidator {
    min_uppercase: usize,
}

impl NameEchoValidator {
    /// Create a validator requiring `min_uppercase` uppercase letters.
    #[must_use]
    pub const fn new(min_uppercase: usize) -> Self {
        Self { min_uppercase }
    }

    /// Minimum number of uppercase letters required.
    #[must_use]
    pub const fn min_uppercase(&self) -> usize {
        self.min_uppercase
    }
}

impl Default for NameEchoValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_UPPERCASE)
    }
}

impl HeaderValidator for NameEchoValidator {
    fn validate(&self, header_name: &str, header_value: &str) -> ValidationResult {
        let uppercase = header_value.chars().filter(|c| c.is_uppercase()).count();
        if header_value.to_lowercase() == header_name.to_lowercase()
            && uppercase >= self.min_uppercase
        {
            return ValidationResult::Success;
        }
        ValidationResult::failure(format!(
            "Header value '{header_value}' should be '{header_name}' with at least {} uppercase letters",
            self.min_uppercase
        ))
    }
}
