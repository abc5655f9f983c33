//! OpenAPI schema definitions for envelope types.
//!
//! The `header-rules` types stay free of utoipa. The wrappers here mirror
//! their wire shape and exist only for documentation.

use utoipa::{IntoParams, ToSchema};

/// OpenAPI schema for [`header_rules::ErrorInfo`].
#[derive(ToSchema)]
#[schema(as = header_rules::ErrorInfo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorInfoSchema {
    /// Offending header name.
    #[schema(example = "X-ChannelCode")]
    error_code: String,
    /// Why the header was rejected.
    #[schema(example = "Missing required header")]
    error_description: String,
}

/// OpenAPI schema for [`header_rules::AdditionalData`].
#[derive(ToSchema)]
#[schema(as = header_rules::AdditionalData)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AdditionalDataSchema {
    #[schema(example = "channel")]
    key: String,
    #[schema(example = "web")]
    value: Option<String>,
}

/// Request envelope whose `primaryData` is the name to greet.
#[derive(ToSchema)]
#[schema(as = GreetingRequest, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct GreetingRequestSchema {
    /// Client message id, echoed in the response.
    #[schema(rename = "messageID", example = "m-1")]
    message_id: Option<String>,
    #[schema(example = "Ada")]
    primary_data: String,
    additional_data: Vec<AdditionalDataSchema>,
}

/// Success envelope whose `primaryData` is a greeting.
#[derive(ToSchema)]
#[schema(as = GreetingResponse, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct GreetingResponseSchema {
    #[schema(example = "0")]
    status_code: Option<String>,
    #[schema(example = "Success")]
    status_description: Option<String>,
    #[schema(example = "200")]
    message_code: Option<String>,
    #[schema(example = "OK!")]
    message_description: Option<String>,
    error_info: Option<Vec<ErrorInfoSchema>>,
    #[schema(rename = "messageID")]
    message_id: Option<String>,
    #[schema(rename = "conversationID")]
    conversation_id: Option<String>,
    additional_data: Vec<AdditionalDataSchema>,
    #[schema(example = "Hello, Ada!")]
    primary_data: Option<String>,
}

/// OpenAPI schema for [`header_rules::ErrorEnvelope`].
///
/// Returned with status 400 when request headers break the configured rules.
#[derive(ToSchema)]
#[schema(as = header_rules::ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    #[schema(example = "0")]
    status_code: Option<String>,
    #[schema(example = "Failed")]
    status_description: Option<String>,
    #[schema(example = "4000453")]
    message_code: Option<String>,
    #[schema(example = "Invalid or missing request headers")]
    message_description: Option<String>,
    /// One entry per violated header rule.
    error_info: Option<Vec<ErrorInfoSchema>>,
    #[schema(rename = "messageID")]
    message_id: Option<String>,
    #[schema(rename = "conversationID")]
    conversation_id: Option<String>,
    additional_data: Vec<AdditionalDataSchema>,
    primary_data: Option<serde_json::Value>,
}

/// Headers required by the default rule set.
#[derive(IntoParams)]
#[into_params(parameter_in = Header)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI parameter generation via utoipa"
)]
pub struct StandardHeaders {
    #[param(rename = "X-FeatureName", example = "payments")]
    feature_name: String,
    #[param(rename = "X-ServiceCode", example = "PAY-01")]
    service_code: String,
    #[param(rename = "X-ServiceName", example = "payments")]
    service_name: String,
    /// `v<major>.<minor>`.
    #[param(rename = "X-MinorServiceVersion", example = "v1.12")]
    minor_service_version: String,
    #[param(rename = "X-ChannelCategory", example = "digital")]
    channel_category: String,
    #[param(rename = "X-ChannelCode", example = "WEB")]
    channel_code: String,
    #[param(rename = "X-ChannelName", example = "web")]
    channel_name: String,
    /// Epoch seconds; drives `X-ElapsedTime` on the response.
    #[param(rename = "X-TimeStamp", example = "1700000000")]
    time_stamp: Option<String>,
    /// Absolute `http` or `https` URL.
    #[param(rename = "X-CallBackURL", example = "https://example.com/callback")]
    call_back_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn property_names<S: PartialSchema>() -> Vec<String> {
        match S::schema() {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_envelope_uses_wire_names() {
        let names = property_names::<ErrorEnvelopeSchema>();
        for field in [
            "statusCode",
            "statusDescription",
            "messageCode",
            "messageDescription",
            "errorInfo",
            "messageID",
            "conversationID",
            "additionalData",
            "primaryData",
        ] {
            assert!(names.iter().any(|n| n == field), "missing {field}: {names:?}");
        }
    }

    #[test]
    fn error_info_uses_wire_names() {
        let names = property_names::<ErrorInfoSchema>();
        assert_eq!(names, ["errorCode", "errorDescription"]);
    }

    #[test]
    fn standard_headers_are_header_params() {
        use utoipa::openapi::path::ParameterIn;

        let params = StandardHeaders::into_params(|| None);
        assert_eq!(params.len(), 9);
        assert!(params.iter().all(|p| p.parameter_in == ParameterIn::Header));
        assert!(params.iter().any(|p| p.name == "X-MinorServiceVersion"));
    }
}
