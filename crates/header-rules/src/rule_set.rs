//! Effective rule set: configured rules merged with the built-in defaults.

use std::collections::HashSet;

use tracing::debug;

use crate::defaults::default_rules;
use crate::rule::{HeaderRule, normalize_header_name};

/// Configured header rules merged with [`default_rules`].
///
/// Configured rules take precedence. They are inserted first, in order, and a
/// later rule whose normalized name was already seen is dropped. Defaults are
/// then appended only for names that are still absent. Iteration follows
/// insertion order, so violations are reported in a stable order.
///
/// # Examples
/// ```
/// use header_rules::{HeaderRule, RuleSet};
///
/// let rules = RuleSet::new([HeaderRule::new("x-channelcode").optional()]);
/// let channel = rules.get("X-ChannelCode").expect("rule is present");
/// assert!(!channel.is_required());
/// assert_eq!(rules.len(), 14);
/// ```
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<HeaderRule>,
}

impl RuleSet {
    /// Merge `configured` rules with the defaults.
    #[must_use]
    pub fn new(configured: impl IntoIterator<Item = HeaderRule>) -> Self {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        let candidates = configured
            .into_iter()
            .chain(default_rules().iter().cloned());
        for rule in candidates {
            if seen.insert(rule.key().to_owned()) {
                rules.push(rule);
            } else {
                debug!(header = rule.header_name(), "duplicate header rule ignored");
            }
        }
        Self { rules }
    }

    /// Rule set containing only the defaults.
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(std::iter::empty())
    }

    /// Look up a rule by header name, ignoring case and padding.
    #[must_use]
    pub fn get(&self, header_name: &str) -> Option<&HeaderRule> {
        let key = normalize_header_name(header_name);
        self.rules.iter().find(|rule| rule.key() == key)
    }

    /// Iterate over the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, HeaderRule> {
        self.rules.iter()
    }

    /// Number of distinct header names covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always `false` in practice since the defaults are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a HeaderRule;
    type IntoIter = std::slice::Iter<'a, HeaderRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
