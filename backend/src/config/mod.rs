//! Server settings loaded via OrthoConfig.
//!
//! Every value can be supplied on the command line, in the environment with
//! the `HEADER_GUARD_` prefix, or in a configuration file. Absent values fall
//! back to the defaults exposed by the accessors below.

mod rules;

use std::path::PathBuf;

use header_rules::{
    NameEchoValidator, PolicyParseError, ResolutionPolicy, RuleSet, ValidatorRegistry,
};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub use rules::{RulesLoadError, load_declarations};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPPERCASE_THRESHOLD: usize = 1;

/// Registry name of the uppercase-threshold validator.
pub const CUSTOM_VALIDATOR_NAME: &str = "CustomValidator";

/// Errors raised while turning settings into a rule set.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configured resolution policy is not recognised.
    #[error(transparent)]
    Policy(#[from] PolicyParseError),
    /// The rule declaration file could not be loaded.
    #[error(transparent)]
    Rules(#[from] RulesLoadError),
}

/// Configuration values for the header guard server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEADER_GUARD")]
pub struct HeaderGuardSettings {
    /// Interface the server binds to.
    pub host: Option<String>,
    /// Port the server listens on.
    pub port: Option<u16>,
    /// JSON file declaring additional header rules.
    pub rules_path: Option<PathBuf>,
    /// Order in which validator identifiers are resolved.
    pub resolution_policy: Option<String>,
    /// Minimum uppercase letters required by the `CustomValidator` rule.
    pub uppercase_threshold: Option<usize>,
}

impl HeaderGuardSettings {
    /// Return the configured host, falling back to all interfaces.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to 8080.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured uppercase threshold, falling back to 1.
    #[must_use]
    pub fn uppercase_threshold(&self) -> usize {
        self.uppercase_threshold
            .unwrap_or(DEFAULT_UPPERCASE_THRESHOLD)
    }

    /// Parse the configured resolution policy.
    ///
    /// # Errors
    /// Returns [`SettingsError::Policy`] for unrecognised policy names.
    pub fn resolution_policy(&self) -> Result<ResolutionPolicy, SettingsError> {
        self.resolution_policy
            .as_deref()
            .map_or(Ok(ResolutionPolicy::default()), str::parse)
            .map_err(SettingsError::from)
    }

    /// Build the validator registry, including the named `CustomValidator`.
    ///
    /// # Errors
    /// Returns [`SettingsError::Policy`] for unrecognised policy names.
    pub fn validator_registry(&self) -> Result<ValidatorRegistry, SettingsError> {
        let mut registry = ValidatorRegistry::new(self.resolution_policy()?);
        registry.register_named(
            CUSTOM_VALIDATOR_NAME,
            NameEchoValidator::new(self.uppercase_threshold()),
        );
        Ok(registry)
    }

    /// Resolve the effective rule set.
    ///
    /// Without a rules file only the built-in defaults apply.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the policy is invalid or the rules file
    /// cannot be read or parsed.
    pub fn rule_set(&self) -> Result<RuleSet, SettingsError> {
        let registry = self.validator_registry()?;
        let Some(path) = self.rules_path.as_deref() else {
            info!(reason = "no rules file", "using default header rules only");
            return Ok(RuleSet::defaults());
        };
        let declarations = load_declarations(path)?;
        let rules = declarations
            .rule_set(&registry)
            .map_err(|source| RulesLoadError::Declaration {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            declared = declarations.headers.len(),
            effective = rules.len(),
            policy = %registry.policy(),
            "header rules loaded"
        );
        Ok(rules)
    }
}
