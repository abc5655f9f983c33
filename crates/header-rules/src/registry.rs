//! Resolution of configured validator identifiers.
//!
//! A rule declaration names its validator with a string. The registry maps
//! that string to an executable validator through two tables:
//!
//! - the *type* table holds built-in validator kinds that need no
//!   parameters, keyed by type name and short alias;
//! - the *named* table holds instances the application registers under a
//!   name, typically configured from its own settings.
//!
//! The [`ResolutionPolicy`] fixes which tables are consulted and in what
//! order. When every consulted table misses, the [`DefaultValidator`] is used
//! and an error is logged, so a typo in configuration degrades a rule rather
//! than failing requests.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::validators::{
    DefaultValidator, EpochTimestampValidator, HeaderValidator, Iso8601TimestampValidator,
    SharedValidator,
};

type ValidatorFactory = Arc<dyn Fn() -> SharedValidator + Send + Sync>;

/// Order in which the registry tables are consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolutionPolicy {
    /// Consult the type table only.
    Type,
    /// Consult the named table only.
    Named,
    /// Consult the type table, then the named table.
    #[default]
    TypeThenNamed,
    /// Consult the named table, then the type table.
    NamedThenType,
}

impl ResolutionPolicy {
    /// Canonical configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Named => "named",
            Self::TypeThenNamed => "type-then-named",
            Self::NamedThenType => "named-then-type",
        }
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a resolution policy string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validator resolution policy '{value}'; expected type|named|type-then-named|named-then-type")]
pub struct PolicyParseError {
    value: String,
}

impl FromStr for ResolutionPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "type" | "fqcn" => Ok(Self::Type),
            "named" | "beandefinition" => Ok(Self::Named),
            "typethennamed" | "fqcnb4beandefinition" => Ok(Self::TypeThenNamed),
            "namedthentype" | "beandefinitionb4fqcn" => Ok(Self::NamedThenType),
            _ => Err(PolicyParseError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Type,
    Named,
}

impl Table {
    const fn label(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Named => "named",
        }
    }
}

/// Registry mapping validator identifiers to validators.
///
/// # Examples
/// ```
/// use header_rules::{NameEchoValidator, ResolutionPolicy, ValidatorRegistry};
///
/// let mut registry = ValidatorRegistry::new(ResolutionPolicy::NamedThenType);
/// registry.register_named("CustomValidator", NameEchoValidator::new(2));
///
/// let validator = registry.resolve("CustomValidator");
/// assert!(validator.validate("X-Custom", "X-Custom").is_success());
/// assert!(registry.resolve("epoch-timestamp").validate("X-TimeStamp", "12").is_success());
/// ```
#[derive(Clone)]
pub struct ValidatorRegistry {
    policy: ResolutionPolicy,
    types: HashMap<String, ValidatorFactory>,
    named: HashMap<String, SharedValidator>,
}

impl ValidatorRegistry {
    /// Create a registry with the built-in validator types registered.
    #[must_use]
    pub fn new(policy: ResolutionPolicy) -> Self {
        let mut registry = Self {
            policy,
            types: HashMap::new(),
            named: HashMap::new(),
        };
        registry.register_builtin(
            &["DefaultHeaderValidator", "DefaultValidator", "default"],
            || Arc::new(DefaultValidator) as SharedValidator,
        );
        registry.register_builtin(&["EpochTimestampValidator", "epoch-timestamp"], || {
            Arc::new(EpochTimestampValidator) as SharedValidator
        });
        registry.register_builtin(
            &[
                "ISO8601TimestampHeaderValidator",
                "Iso8601TimestampValidator",
                "iso8601-timestamp",
            ],
            || Arc::new(Iso8601TimestampValidator) as SharedValidator,
        );
        registry
    }

    fn register_builtin(&mut self, identifiers: &[&str], factory: fn() -> SharedValidator) {
        for identifier in identifiers {
            self.register_type(*identifier, factory);
        }
    }

    /// Policy used by [`ValidatorRegistry::resolve`].
    #[must_use]
    pub const fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Register a validator type constructed on every resolution.
    pub fn register_type<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> SharedValidator + Send + Sync + 'static,
    {
        self.types.insert(identifier.into(), Arc::new(factory));
    }

    /// Register a validator instance under a name.
    pub fn register_named(
        &mut self,
        name: impl Into<String>,
        validator: impl HeaderValidator + 'static,
    ) {
        self.named.insert(name.into(), Arc::new(validator));
    }

    /// Resolve `identifier`, falling back to the [`DefaultValidator`].
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> SharedValidator {
        let wanted = identifier.trim();
        let tables: &[Table] = match self.policy {
            ResolutionPolicy::Type => &[Table::Type],
            ResolutionPolicy::Named => &[Table::Named],
            ResolutionPolicy::TypeThenNamed => &[Table::Type, Table::Named],
            ResolutionPolicy::NamedThenType => &[Table::Named, Table::Type],
        };
        for table in tables {
            if let Some(validator) = self.lookup(*table, wanted) {
                return validator;
            }
        }
        let consulted: Vec<&str> = tables.iter().map(|table| table.label()).collect();
        error!(
            validator = wanted,
            policy = %self.policy,
            consulted = ?consulted,
            "validator could not be resolved; falling back to the default validator"
        );
        Arc::new(DefaultValidator)
    }

    fn lookup(&self, table: Table, identifier: &str) -> Option<SharedValidator> {
        match table {
            Table::Type => self.types.get(identifier).map(|factory| factory()),
            Table::Named => self.named.get(identifier).cloned(),
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new(ResolutionPolicy::default())
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.types.keys().collect();
        types.sort();
        let mut named: Vec<_> = self.named.keys().collect();
        named.sort();
        f.debug_struct("ValidatorRegistry")
            .field("policy", &self.policy)
            .field("types", &types)
            .field("named", &named)
            .finish()
    }
}
