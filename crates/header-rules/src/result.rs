//! Outcome of validating a single header value.
//!
//! Validators never raise; they return a [`ValidationResult`] which is either
//! a success or a [`Failure`] carrying a client-facing message and, when the
//! rejection came from a parser, the underlying error as its cause.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Underlying error recorded against a failure, shareable across threads.
pub type FailureCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Description of why a header value was rejected.
///
/// # Examples
/// ```
/// use header_rules::Failure;
///
/// let failure = Failure::new("Header value is required");
/// assert_eq!(failure.message(), "Header value is required");
/// assert!(failure.cause().is_none());
/// ```
#[derive(Clone)]
pub struct Failure {
    message: String,
    cause: Option<FailureCause>,
}

impl Failure {
    /// Create a failure without an underlying cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a failure that records the error which triggered it.
    #[must_use]
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Client-facing description of the rejection.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Underlying error, if the validator captured one.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({cause})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Result of running a validator over one header value.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// The value satisfies the validator.
    Success,
    /// The value was rejected.
    Failure(Failure),
}

impl ValidationResult {
    /// Shorthand for a failure without a cause.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(message))
    }

    /// Whether the value was accepted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Borrow the failure detail, if any.
    #[must_use]
    pub const fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Success => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Consume the result, yielding the failure detail if any.
    #[must_use]
    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Self::Success => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<Failure> for ValidationResult {
    fn from(value: Failure) -> Self {
        Self::Failure(value)
    }
}
