//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the greeting and health endpoints together with the
//! envelope schema wrappers from [`crate::inbound::http::schemas`]. The
//! document is served by Swagger UI in debug builds and exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{
    AdditionalDataSchema, ErrorEnvelopeSchema, ErrorInfoSchema, GreetingRequestSchema,
    GreetingResponseSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Header guard API",
        description = "Endpoints guarded by declarative request-header rules."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::hello::greet,
        crate::inbound::http::hello::greet_by_name,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorInfoSchema,
        AdditionalDataSchema,
        ErrorEnvelopeSchema,
        GreetingRequestSchema,
        GreetingResponseSchema
    )),
    tags(
        (name = "hello", description = "Greeting endpoints behind header validation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/hello", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn registers_envelope_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("header_rules.ErrorEnvelope"));
        assert!(schemas.contains_key("header_rules.ErrorInfo"));
        assert!(schemas.contains_key("GreetingResponse"));
    }
}
