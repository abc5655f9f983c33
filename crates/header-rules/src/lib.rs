//! Declarative request-header validation.
//!
//! A [`RuleSet`] binds header names to a presence policy and a
//! [`HeaderValidator`]. [`HeaderRulesValidator`] evaluates every rule against
//! a request's headers and collects all violations into one
//! [`HeadersValidationError`], which [`ResponsePayload::header_validation_failure`]
//! turns into the standard JSON error envelope. [`RequestContext`] carries the
//! conversation and message ids echoed in every response.
//!
//! The crate knows nothing about HTTP frameworks: headers are read through a
//! lookup closure and the envelope is a plain serializable value.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use header_rules::{
//!     ErrorEnvelope, HeaderRulesValidator, HeaderValidationProperties, RequestContext,
//!     ValidatorRegistry,
//! };
//!
//! let declarations = r#"{"headers": [{"headerName": "X-Tenant"}]}"#;
//! let rules = HeaderValidationProperties::from_json(declarations)
//!     .and_then(|properties| properties.rule_set(&ValidatorRegistry::default()))
//!     .expect("valid declarations");
//! let validator = HeaderRulesValidator::new(rules);
//!
//! let headers = HashMap::from([("X-FeatureName", "payments")]);
//! let error = validator
//!     .check(|name| headers.get(name).copied())
//!     .expect_err("required headers are missing");
//!
//! let envelope = ErrorEnvelope::header_validation_failure(&error, Some(&RequestContext::new("c-1")));
//! let failed: Vec<_> = envelope
//!     .error_info
//!     .iter()
//!     .flatten()
//!     .map(|info| info.error_code.as_str())
//!     .collect();
//! assert_eq!(failed.first(), Some(&"X-Tenant"));
//! assert!(!failed.contains(&"X-FeatureName"));
//! ```

pub mod aggregate;
pub mod aggregator;
pub mod context;
pub mod declaration;
pub mod defaults;
pub mod elapsed;
pub mod envelope;
pub mod registry;
pub mod result;
pub mod rule;
pub mod rule_set;
pub mod validators;

pub use aggregate::{HeaderViolation, HeadersValidationError, MISSING_HEADER_MESSAGE, ViolationKind};
pub use aggregator::HeaderRulesValidator;
pub use context::{ContextError, RequestContext};
pub use declaration::{DeclarationError, HeaderRuleDeclaration, HeaderValidationProperties};
pub use defaults::default_rules;
pub use elapsed::{ELAPSED_TIME_HEADER, TIMESTAMP_HEADER, elapsed_time};
pub use envelope::{
    AdditionalData, DefaultResponseConverter, ErrorEnvelope, ErrorInfo, InboundRequest,
    RequestPayload, ResponseConverter, ResponsePayload,
};
pub use registry::{PolicyParseError, ResolutionPolicy, ValidatorRegistry};
pub use result::{Failure, FailureCause, ValidationResult};
pub use rule::{HeaderRule, RuleError, normalize_header_name};
pub use rule_set::RuleSet;
pub use validators::{
    DefaultValidator, EpochTimestampValidator, HeaderValidator, Iso8601TimestampValidator,
    NameEchoValidator, RegexValidator, SharedValidator,
};
