//! All-errors-collected evaluation of a rule set against request headers.

use std::sync::Arc;

use tracing::debug;

use crate::aggregate::{HeaderViolation, HeadersValidationError};
use crate::rule::HeaderRule;
use crate::rule_set::RuleSet;

/// Evaluates every rule of a [`RuleSet`] against a header lookup.
///
/// Evaluation never stops early: each rule is visited exactly once and every
/// violation is recorded, so a client learns about all of its header problems
/// in one round trip. The validator is cheap to clone and safe to share
/// between concurrent requests.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use header_rules::{HeaderRulesValidator, RuleSet};
///
/// let validator = HeaderRulesValidator::new(RuleSet::defaults());
/// let headers: HashMap<&str, &str> = HashMap::new();
/// let aggregate = validator.collect(|name| headers.get(name).copied());
/// assert_eq!(aggregate.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct HeaderRulesValidator {
    rules: Arc<RuleSet>,
}

impl HeaderRulesValidator {
    /// Create a validator over `rules`.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self::from_shared(Arc::new(rules))
    }

    /// Create a validator over an already shared rule set.
    #[must_use]
    pub const fn from_shared(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// The rules being enforced.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate every rule and return the possibly empty aggregate.
    ///
    /// `lookup` receives each rule's configured header name and returns the
    /// header value, or `None` when the header is absent.
    pub fn collect<F, V>(&self, lookup: F) -> HeadersValidationError
    where
        F: Fn(&str) -> Option<V>,
        V: AsRef<str>,
    {
        let mut aggregate = HeadersValidationError::new();
        for rule in self.rules.iter() {
            let value = lookup(rule.header_name());
            if let Some(violation) = evaluate(rule, value.as_ref().map(AsRef::<str>::as_ref)) {
                debug!(
                    header = rule.header_name(),
                    kind = ?violation.kind(),
                    reason = violation.failure().message(),
                    cause = violation.failure().cause().map(tracing::field::display),
                    "header rule violated"
                );
                aggregate.push(violation);
            }
        }
        aggregate
    }

    /// Evaluate every rule, failing only when a violation was recorded.
    ///
    /// # Errors
    /// Returns the aggregate when it contains at least one violation.
    pub fn check<F, V>(&self, lookup: F) -> Result<(), HeadersValidationError>
    where
        F: Fn(&str) -> Option<V>,
        V: AsRef<str>,
    {
        let aggregate = self.collect(lookup);
        if aggregate.has_failures() {
            Err(aggregate)
        } else {
            Ok(())
        }
    }
}

fn evaluate(rule: &HeaderRule, value: Option<&str>) -> Option<HeaderViolation> {
    let Some(value) = value else {
        return rule
            .is_required()
            .then(|| HeaderViolation::missing(rule.clone()));
    };
    rule.validate(value)
        .into_failure()
        .map(|failure| HeaderViolation::invalid(rule.clone(), failure))
}
