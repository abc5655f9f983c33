//! Tests for header validation failure rendering.

use super::*;
use actix_web::body::to_bytes;
use header_rules::{Failure, HeaderRule, HeaderViolation};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn aggregate() -> HeadersValidationError {
    [
        HeaderViolation::missing(HeaderRule::new("X-ChannelCode")),
        HeaderViolation::invalid(
            HeaderRule::new("X-TimeStamp"),
            Failure::new("Header value is not a valid epoch timestamp"),
        ),
    ]
    .into_iter()
    .collect()
}

#[rstest]
#[actix_rt::test]
async fn renders_bad_request_with_envelope(aggregate: HeadersValidationError) {
    let context = RequestContext::new("c-1").with_message_id("m-1");
    let failure = HeaderValidationFailure::standard(&aggregate, Some(&context));
    assert_eq!(failure.violations(), 2);
    assert_eq!(failure.to_string(), "2 request header(s) failed validation");

    let response = failure.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(CONVERSATION_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("c-1")
    );
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(
        body,
        json!({
            "statusCode": "0",
            "statusDescription": "Failed",
            "messageCode": "4000453",
            "messageDescription": "Invalid or missing request headers",
            "errorInfo": [
                {"errorCode": "X-ChannelCode", "errorDescription": "Missing required header"},
                {
                    "errorCode": "X-TimeStamp",
                    "errorDescription": "Header value is not a valid epoch timestamp"
                }
            ],
            "messageID": "m-1",
            "conversationID": "c-1",
            "additionalData": [],
            "primaryData": null
        })
    );
}

#[rstest]
fn omits_header_without_context(aggregate: HeadersValidationError) {
    let failure = HeaderValidationFailure::standard(&aggregate, None);
    let response = failure.error_response();
    assert!(!response.headers().contains_key(CONVERSATION_ID_HEADER));
    assert_eq!(failure.body()["conversationID"], Value::Null);
}

struct Broken;

impl ResponseConverter for Broken {
    fn header_validation_error_body(
        &self,
        _envelope: ErrorEnvelope,
        _error: &HeadersValidationError,
    ) -> Result<Value, serde_json::Error> {
        serde_json::from_str("{")
    }
}

#[rstest]
fn failing_converter_falls_back_to_standard_envelope(aggregate: HeadersValidationError) {
    let failure = HeaderValidationFailure::new(&aggregate, None, &Broken);
    assert_eq!(failure.body()["messageCode"], "4000453");
}
