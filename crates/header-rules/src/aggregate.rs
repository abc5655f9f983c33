//! Aggregated header violations for one request.

use std::fmt;

use thiserror::Error;

use crate::result::Failure;
use crate::rule::HeaderRule;

/// Failure message recorded for absent required headers.
pub const MISSING_HEADER_MESSAGE: &str = "Missing required header";

/// Category of a header violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    /// A required header was absent.
    MissingHeader,
    /// A header was present but its value was rejected.
    InvalidHeaderValue,
}

/// One rule violated by a request.
#[derive(Debug, Clone)]
pub struct HeaderViolation {
    kind: ViolationKind,
    rule: HeaderRule,
    failure: Failure,
}

impl HeaderViolation {
    /// Violation for an absent required header.
    #[must_use]
    pub fn missing(rule: HeaderRule) -> Self {
        Self {
            kind: ViolationKind::MissingHeader,
            rule,
            failure: Failure::new(MISSING_HEADER_MESSAGE),
        }
    }

    /// Violation for a header value rejected by its validator.
    #[must_use]
    pub const fn invalid(rule: HeaderRule, failure: Failure) -> Self {
        Self {
            kind: ViolationKind::InvalidHeaderValue,
            rule,
            failure,
        }
    }

    /// Violation category.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// The rule that was violated.
    #[must_use]
    pub const fn rule(&self) -> &HeaderRule {
        &self.rule
    }

    /// Why the rule was violated.
    #[must_use]
    pub const fn failure(&self) -> &Failure {
        &self.failure
    }

    /// Header name as configured on the violated rule.
    #[must_use]
    pub fn header_name(&self) -> &str {
        self.rule.header_name()
    }
}

impl fmt::Display for HeaderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule.header_name(), self.failure.message())
    }
}

/// Every violation found during one validation pass.
///
/// An empty aggregate means the request passed; callers must check
/// [`HeadersValidationError::has_failures`] before treating it as an error.
#[derive(Debug, Clone, Default, Error)]
#[error("{} request header(s) failed validation", .violations.len())]
pub struct HeadersValidationError {
    violations: Vec<HeaderViolation>,
}

impl HeadersValidationError {
    /// Empty aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Record a violation.
    pub fn push(&mut self, violation: HeaderViolation) {
        self.violations.push(violation);
    }

    /// Whether at least one violation was recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations in the order they were recorded.
    #[must_use]
    pub fn violations(&self) -> &[HeaderViolation] {
        self.violations.as_slice()
    }

    /// Iterate over the violations in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, HeaderViolation> {
        self.violations.iter()
    }

    /// Consume the aggregate.
    #[must_use]
    pub fn into_violations(self) -> Vec<HeaderViolation> {
        self.violations
    }
}

impl Extend<HeaderViolation> for HeadersValidationError {
    fn extend<I: IntoIterator<Item = HeaderViolation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

impl FromIterator<HeaderViolation> for HeadersValidationError {
    fn from_iter<I: IntoIterator<Item = HeaderViolation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HeadersValidationError {
    type Item = &'a HeaderViolation;
    type IntoIter = std::slice::Iter<'a, HeaderViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
