//! Standard JSON response envelope.
//!
//! Every response, successful or not, shares one shape:
//!
//! ```json
//! {
//!   "statusCode": "0",
//!   "statusDescription": "Failed",
//!   "messageCode": "4000453",
//!   "messageDescription": "Invalid or missing request headers",
//!   "errorInfo": [{"errorCode": "X-ChannelCode", "errorDescription": "Missing required header"}],
//!   "messageID": null,
//!   "conversationID": "5f0c...",
//!   "additionalData": [],
//!   "primaryData": null
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::HeadersValidationError;
use crate::context::RequestContext;

/// Envelope status code shared by success and failure responses.
pub const STATUS_CODE: &str = "0";
/// Status description of failed responses.
pub const FAILED_STATUS_DESCRIPTION: &str = "Failed";
/// Message code of header validation failures.
pub const HEADER_VALIDATION_MESSAGE_CODE: &str = "4000453";
/// Message description of header validation failures.
pub const HEADER_VALIDATION_MESSAGE_DESCRIPTION: &str = "Invalid or missing request headers";
/// Status description of successful responses.
pub const SUCCESS_STATUS_DESCRIPTION: &str = "Success";
/// Message code of successful responses.
pub const SUCCESS_MESSAGE_CODE: &str = "200";
/// Message description of successful responses.
pub const SUCCESS_MESSAGE_DESCRIPTION: &str = "OK!";

/// One entry of the `errorInfo` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// Offending header name.
    pub error_code: String,
    /// Why the header was rejected.
    pub error_description: String,
}

/// Key/value pair echoed between request and response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalData {
    /// Entry key.
    pub key: String,
    /// Entry value.
    pub value: Option<String>,
}

/// Response envelope carrying `primary_data` of type `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload<T> {
    /// Envelope status code.
    pub status_code: Option<String>,
    /// Human-readable status.
    pub status_description: Option<String>,
    /// Machine-readable outcome code.
    pub message_code: Option<String>,
    /// Human-readable outcome.
    pub message_description: Option<String>,
    /// Per-header failures, in the order they were recorded.
    pub error_info: Option<Vec<ErrorInfo>>,
    /// Client-supplied message id.
    #[serde(rename = "messageID")]
    pub message_id: Option<String>,
    /// Per-request correlation id.
    #[serde(rename = "conversationID")]
    pub conversation_id: Option<String>,
    /// Echoed key/value pairs, empty when absent.
    #[serde(default)]
    pub additional_data: Vec<AdditionalData>,
    /// Response body proper.
    pub primary_data: Option<T>,
}

/// Envelope rendered for header validation failures.
pub type ErrorEnvelope = ResponsePayload<Value>;

impl<T> ResponsePayload<T> {
    /// Envelope carrying only `primary_data`.
    #[must_use]
    pub const fn new(primary_data: T) -> Self {
        Self {
            status_code: None,
            status_description: None,
            message_code: None,
            message_description: None,
            error_info: None,
            message_id: None,
            conversation_id: None,
            additional_data: Vec::new(),
            primary_data: Some(primary_data),
        }
    }

    /// Success envelope correlated with `context`.
    ///
    /// # Examples
    /// ```
    /// use header_rules::{RequestContext, RequestPayload, ResponsePayload};
    ///
    /// let request: RequestPayload<String> =
    ///     serde_json::from_str(r#"{"messageID": "m-1", "primaryData": "Ada"}"#).expect("valid body");
    /// let context = RequestContext::new("c-1");
    /// let response = ResponsePayload::success("Hello, Ada!", Some(&context)).echoing(&request);
    /// assert_eq!(response.message_code.as_deref(), Some("200"));
    /// assert_eq!(response.message_id.as_deref(), Some("m-1"));
    /// ```
    #[must_use]
    pub fn success(primary_data: T, context: Option<&RequestContext>) -> Self {
        Self {
            status_code: Some(STATUS_CODE.to_owned()),
            status_description: Some(SUCCESS_STATUS_DESCRIPTION.to_owned()),
            message_code: Some(SUCCESS_MESSAGE_CODE.to_owned()),
            message_description: Some(SUCCESS_MESSAGE_DESCRIPTION.to_owned()),
            error_info: Some(Vec::new()),
            conversation_id: context.map(|c| c.conversation_id().to_owned()),
            ..Self::new(primary_data)
        }
    }

    /// Echo the message id and additional data of `request`.
    #[must_use]
    pub fn echoing(mut self, request: &impl InboundRequest) -> Self {
        self.message_id = request.message_id().map(str::to_owned);
        self.additional_data = request.additional_data().to_vec();
        self
    }

    /// Failure envelope listing every violation of `error`.
    ///
    /// Correlation ids come from `context`; they are `null` when no context
    /// is available.
    #[must_use]
    pub fn header_validation_failure(
        error: &HeadersValidationError,
        context: Option<&RequestContext>,
    ) -> Self {
        let error_info = error
            .iter()
            .map(|violation| ErrorInfo {
                error_code: violation.header_name().to_owned(),
                error_description: violation.failure().message().to_owned(),
            })
            .collect();
        Self {
            status_code: Some(STATUS_CODE.to_owned()),
            status_description: Some(FAILED_STATUS_DESCRIPTION.to_owned()),
            message_code: Some(HEADER_VALIDATION_MESSAGE_CODE.to_owned()),
            message_description: Some(HEADER_VALIDATION_MESSAGE_DESCRIPTION.to_owned()),
            error_info: Some(error_info),
            message_id: context.and_then(RequestContext::message_id).map(str::to_owned),
            conversation_id: context.map(|c| c.conversation_id().to_owned()),
            additional_data: Vec::new(),
            primary_data: None,
        }
    }
}

/// Inbound body able to report a client message id.
pub trait InboundRequest {
    /// Client-supplied message id.
    fn message_id(&self) -> Option<&str>;

    /// Key/value pairs to echo in the response.
    fn additional_data(&self) -> &[AdditionalData] {
        &[]
    }
}

/// Standard inbound request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload<T> {
    /// Client-supplied message id.
    #[serde(rename = "messageID", default)]
    pub message_id: Option<String>,
    /// Request body proper.
    pub primary_data: T,
    /// Key/value pairs to echo, empty when absent.
    #[serde(default)]
    pub additional_data: Vec<AdditionalData>,
}

impl<T> InboundRequest for RequestPayload<T> {
    fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    fn additional_data(&self) -> &[AdditionalData] {
        &self.additional_data
    }
}

/// Hook for replacing the body rendered on header validation failure.
///
/// The default implementation renders the standard envelope unchanged.
pub trait ResponseConverter: Send + Sync {
    /// Body to render for `error`, given the standard `envelope`.
    ///
    /// # Errors
    /// Returns a serialization error if the body cannot be rendered as JSON.
    fn header_validation_error_body(
        &self,
        envelope: ErrorEnvelope,
        _error: &HeadersValidationError,
    ) -> Result<Value, serde_json::Error> {
        serde_json::to_value(envelope)
    }
}

/// Converter that keeps the standard envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseConverter;

impl ResponseConverter for DefaultResponseConverter {}
