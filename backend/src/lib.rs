//! Actix adapter enforcing declarative request-header rules.
//!
//! The rule engine lives in the `header-rules` crate; this library wires it
//! into Actix middleware, renders the standard error envelope, and exposes a
//! small demonstration API.

pub mod config;
pub mod doc;
pub mod inbound;
pub mod middleware;

/// Response header carrying the request's conversation id.
pub const CONVERSATION_ID_HEADER: &str = "conversation-id";

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{Correlation, HeaderValidation};
