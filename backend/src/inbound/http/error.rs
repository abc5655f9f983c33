//! HTTP rendering of header validation failures.
//!
//! Purpose: turn the framework-agnostic [`HeadersValidationError`] into a 400
//! response carrying the standard envelope, keeping the engine crate free of
//! Actix types.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use header_rules::{
    DefaultResponseConverter, ErrorEnvelope, HeadersValidationError, RequestContext,
    ResponseConverter,
};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::CONVERSATION_ID_HEADER;

/// Rendered header validation failure.
#[derive(Debug, Clone, Error)]
#[error("{violations} request header(s) failed validation")]
pub struct HeaderValidationFailure {
    violations: usize,
    conversation_id: Option<String>,
    body: Value,
}

impl HeaderValidationFailure {
    /// Render `error` with `converter`.
    ///
    /// A converter failure is logged and the standard envelope is rendered
    /// instead.
    #[must_use]
    pub fn new(
        error: &HeadersValidationError,
        context: Option<&RequestContext>,
        converter: &dyn ResponseConverter,
    ) -> Self {
        let envelope = ErrorEnvelope::header_validation_failure(error, context);
        let body = converter
            .header_validation_error_body(envelope.clone(), error)
            .unwrap_or_else(|err| {
                error!(error = %err, "response converter failed; rendering the standard envelope");
                serde_json::to_value(&envelope).unwrap_or(Value::Null)
            });
        Self {
            violations: error.len(),
            conversation_id: context.map(|c| c.conversation_id().to_owned()),
            body,
        }
    }

    /// Render `error` as the standard envelope.
    #[must_use]
    pub fn standard(error: &HeadersValidationError, context: Option<&RequestContext>) -> Self {
        Self::new(error, context, &DefaultResponseConverter)
    }

    /// Number of violated rules.
    #[must_use]
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Conversation id echoed in the response header.
    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// JSON body returned to the client.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl ResponseError for HeaderValidationFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.conversation_id {
            builder.insert_header((CONVERSATION_ID_HEADER, id.clone()));
        }
        builder.json(&self.body)
    }
}

#[cfg(test)]
mod tests;
