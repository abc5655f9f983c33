//! Rule declarations as they appear in configuration.
//!
//! Declarations are a JSON document listing header rules:
//!
//! ```json
//! {
//!   "headers": [
//!     { "headerName": "X-Tenant" },
//!     { "headerName": "X-RequestTime", "required": false, "validator": "iso8601-timestamp" },
//!     { "headerName": "X-Region", "pattern": "[a-z]{2}-[a-z]+-\\d", "caseInsensitive": true }
//!   ]
//! }
//! ```
//!
//! `required` defaults to `true`. A rule names its validator through the
//! [`ValidatorRegistry`] or supplies a `pattern`, never both; rules with
//! neither use the default non-blank check.

use serde::Deserialize;
use thiserror::Error;

use crate::registry::ValidatorRegistry;
use crate::rule::{HeaderRule, RuleError};
use crate::rule_set::RuleSet;
use crate::validators::regex_or_default;

/// Errors raised while reading rule declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("invalid header rule declarations: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// A declaration has a blank header name.
    #[error("header rule at index {index} has a blank header name")]
    EmptyHeaderName {
        /// Position of the declaration in the `headers` array.
        index: usize,
    },

    /// A declaration names a validator and supplies a pattern.
    #[error("header rule '{header}' declares both a validator and a pattern")]
    ConflictingValidator {
        /// Header name of the offending declaration.
        header: String,
    },
}

const fn default_required() -> bool {
    true
}

/// One configured header rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeaderRuleDeclaration {
    /// Header name the rule applies to.
    pub header_name: String,
    /// Whether the header must be present.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Identifier resolved through the [`ValidatorRegistry`].
    #[serde(default)]
    pub validator: Option<String>,
    /// Regular expression the whole value must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Match `pattern` without regard to letter case.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl HeaderRuleDeclaration {
    /// Build the rule, resolving the validator through `registry`.
    ///
    /// # Errors
    /// Returns [`RuleError::EmptyHeaderName`] for a blank header name.
    pub fn to_rule(&self, registry: &ValidatorRegistry) -> Result<HeaderRule, RuleError> {
        let base = HeaderRule::try_new(self.header_name.clone())?.with_required(self.required);
        Ok(match (&self.pattern, &self.validator) {
            (Some(pattern), _) => base.with_shared_validator(regex_or_default(
                &self.header_name,
                pattern,
                self.case_insensitive,
            )),
            (None, Some(identifier)) => base.with_shared_validator(registry.resolve(identifier)),
            (None, None) => base,
        })
    }
}

/// The configured rule declarations.
///
/// # Examples
/// ```
/// use header_rules::{HeaderValidationProperties, ValidatorRegistry};
///
/// let json = r#"{"headers": [{"headerName": "X-Tenant", "required": false}]}"#;
/// let properties = HeaderValidationProperties::from_json(json).expect("valid declarations");
/// let rules = properties
///     .rule_set(&ValidatorRegistry::default())
///     .expect("rules build");
/// assert!(!rules.get("x-tenant").expect("declared").is_required());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderValidationProperties {
    /// Declared rules, in priority order.
    #[serde(default)]
    pub headers: Vec<HeaderRuleDeclaration>,
}

impl HeaderValidationProperties {
    /// Parse declarations from JSON.
    ///
    /// # Errors
    /// Returns [`DeclarationError::Parse`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, DeclarationError> {
        serde_json::from_str(json).map_err(|e| DeclarationError::Parse {
            message: e.to_string(),
        })
    }

    /// Resolve the declarations and merge them with the default rules.
    ///
    /// # Errors
    /// Returns [`DeclarationError`] when a declaration has a blank name or
    /// names both a validator and a pattern.
    pub fn rule_set(&self, registry: &ValidatorRegistry) -> Result<RuleSet, DeclarationError> {
        let rules = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, declaration)| {
                if declaration.pattern.is_some() && declaration.validator.is_some() {
                    return Err(DeclarationError::ConflictingValidator {
                        header: declaration.header_name.clone(),
                    });
                }
                declaration
                    .to_rule(registry)
                    .map_err(|_| DeclarationError::EmptyHeaderName { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet::new(rules))
    }
}
