//! Greeting endpoints demonstrating the standard envelope.
//!
//! Both handlers run behind header validation; a request reaching them has
//! already passed every rule.

use actix_web::{get, post, web};
use header_rules::{RequestContext, RequestPayload, ResponsePayload};

use crate::inbound::http::payload::MessagePayload;
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, GreetingRequestSchema, GreetingResponseSchema, StandardHeaders,
};

/// Greet the world.
#[utoipa::path(
    get,
    path = "/api/hello",
    tags = ["hello"],
    params(StandardHeaders),
    responses(
        (status = 200, description = "Greeting", body = GreetingResponseSchema),
        (status = 400, description = "Invalid or missing request headers", body = ErrorEnvelopeSchema)
    )
)]
#[get("/api/hello")]
pub async fn greet() -> web::Json<ResponsePayload<String>> {
    web::Json(ResponsePayload::success(
        "Hello, World!".to_owned(),
        RequestContext::current().as_ref(),
    ))
}

/// Greet the name carried in `primaryData`, echoing `messageID` and
/// `additionalData`.
#[utoipa::path(
    post,
    path = "/api/hello",
    tags = ["hello"],
    params(StandardHeaders),
    request_body = GreetingRequestSchema,
    responses(
        (status = 200, description = "Greeting", body = GreetingResponseSchema),
        (status = 400, description = "Invalid or missing request headers, or malformed body", body = ErrorEnvelopeSchema)
    )
)]
#[post("/api/hello")]
pub async fn greet_by_name(
    request: MessagePayload<RequestPayload<String>>,
) -> web::Json<ResponsePayload<String>> {
    let greeting = format!("Hello, {}!", request.primary_data);
    web::Json(
        ResponsePayload::success(greeting, RequestContext::current().as_ref()).echoing(&request),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    #[actix_rt::test]
    async fn greets_the_world() {
        let app = test::init_service(App::new().service(greet)).await;
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/hello").to_request())
                .await;
        assert_eq!(body["primaryData"], "Hello, World!");
        assert_eq!(body["messageCode"], "200");
        assert_eq!(body["errorInfo"], json!([]));
    }

    #[actix_rt::test]
    async fn greets_by_name_and_echoes_request() {
        let app = test::init_service(App::new().service(greet_by_name)).await;
        let req = test::TestRequest::post()
            .uri("/api/hello")
            .set_json(json!({
                "messageID": "m-1",
                "primaryData": "Ada",
                "additionalData": [{"key": "channel", "value": "web"}]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["primaryData"], "Hello, Ada!");
        assert_eq!(body["messageID"], "m-1");
        assert_eq!(body["additionalData"], json!([{"key": "channel", "value": "web"}]));
        assert_eq!(body["statusDescription"], "Success");
    }
}
