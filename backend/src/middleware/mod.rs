//! Request middleware.
//!
//! Purpose: correlate every request with a [`header_rules::RequestContext`]
//! and reject requests whose headers break the configured rules.
//!
//! Register [`HeaderValidation`] before [`Correlation`] so correlation runs
//! outermost and rejected requests still carry a conversation id.

pub mod context;
pub mod headers;

pub use context::Correlation;
pub use headers::HeaderValidation;
