use crate::result::ValidationResult;

use super::HeaderValidator;

/// Accepts any value containing at least one non-whitespace character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultValidator;

impl HeaderValidator for DefaultValidator {
    fn validate(&self, _header_name: &str, header_value: &str) -> ValidationResult {
        if header_value.trim().is_empty() {
            ValidationResult::failure("Header value is required")
        } else {
            ValidationResult::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("value", true)]
    #[case(" padded ", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    fn requires_visible_characters(#[case] value: &str, #[case] accepted: bool) {
        let result = DefaultValidator.validate("X-FeatureName", value);
        assert_eq!(result.is_success(), accepted);
    }

    #[test]
    fn failure_message_is_stable() {
        let result = DefaultValidator.validate("X-FeatureName", " ");
        let failure = result.as_failure().expect("blank value fails");
        assert_eq!(failure.message(), "Header value is required");
    }
}
