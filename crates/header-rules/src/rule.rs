//! Header rules: a header name bound to a presence policy and a validator.
//!
//! Rules compare and hash on their normalized header name only, so a
//! collection of rules behaves as a registry keyed by header name no matter
//! which policy or validator each entry carries.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

use crate::result::ValidationResult;
use crate::validators::{DefaultValidator, HeaderValidator, SharedValidator};

/// Errors raised while constructing a [`HeaderRule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The header name is empty once surrounding whitespace is removed.
    #[error("header name must not be blank")]
    EmptyHeaderName,
}

/// Canonical form of a header name used for every identity comparison.
///
/// # Examples
/// ```
/// use header_rules::normalize_header_name;
///
/// assert_eq!(normalize_header_name("  X-FeatureName "), "x-featurename");
/// ```
#[must_use]
pub fn normalize_header_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Binding between a header name, whether it must be present, and the
/// validator applied to its value.
///
/// ## Invariants
/// - `header_name` is non-blank.
/// - Equality and hashing consider the normalized name only.
///
/// # Examples
/// ```
/// use header_rules::{HeaderRule, EpochTimestampValidator};
///
/// let strict = HeaderRule::new("X-TimeStamp");
/// let relaxed = HeaderRule::new("x-timestamp ")
///     .optional()
///     .with_validator(EpochTimestampValidator);
/// assert_eq!(strict, relaxed);
/// assert!(strict.is_required());
/// assert!(!relaxed.is_required());
/// ```
#[derive(Clone)]
pub struct HeaderRule {
    header_name: String,
    key: String,
    required: bool,
    validator: SharedValidator,
}

impl HeaderRule {
    /// Create a required rule using the [`DefaultValidator`].
    ///
    /// # Panics
    /// Panics when `header_name` is blank. Use [`HeaderRule::try_new`] for
    /// names that come from configuration.
    #[must_use]
    pub fn new(header_name: impl Into<String>) -> Self {
        match Self::try_new(header_name) {
            Ok(rule) => rule,
            Err(err) => panic!("header rules must have a name: {err}"),
        }
    }

    /// Fallible constructor that rejects blank header names.
    ///
    /// # Errors
    /// Returns [`RuleError::EmptyHeaderName`] when the name is blank.
    pub fn try_new(name: impl Into<String>) -> Result<Self, RuleError> {
        let header_name: String = name.into();
        let key = normalize_header_name(&header_name);
        if key.is_empty() {
            return Err(RuleError::EmptyHeaderName);
        }
        Ok(Self {
            header_name,
            key,
            required: true,
            validator: Arc::new(DefaultValidator),
        })
    }

    /// Set whether the header must be present.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the header as optional.
    #[must_use]
    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    /// Replace the validator.
    #[must_use]
    pub fn with_validator(self, validator: impl HeaderValidator + 'static) -> Self {
        self.with_shared_validator(Arc::new(validator))
    }

    /// Replace the validator with an already shared instance.
    #[must_use]
    pub fn with_shared_validator(mut self, validator: SharedValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Header name as configured.
    #[must_use]
    pub fn header_name(&self) -> &str {
        self.header_name.as_str()
    }

    /// Normalized header name used for identity.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Whether a missing header is a violation.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Run the bound validator over a present header value.
    #[must_use]
    pub fn validate(&self, header_value: &str) -> ValidationResult {
        self.validator.validate(&self.header_name, header_value)
    }
}

impl PartialEq for HeaderRule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeaderRule {}

impl Hash for HeaderRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for HeaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderRule")
            .field("header_name", &self.header_name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HeaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_name)
    }
}
