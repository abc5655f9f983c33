//! End-to-end request flow through correlation, header validation, and the
//! greeting handlers.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use header_guard::inbound::http::health::{HealthState, live, ready};
use header_guard::inbound::http::hello::{greet, greet_by_name};
use header_guard::{CONVERSATION_ID_HEADER, Correlation, HeaderValidation};
use header_rules::{ELAPSED_TIME_HEADER, RuleSet};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

const COMPLETE: [(&str, &str); 7] = [
    ("X-FeatureName", "payments"),
    ("X-ServiceCode", "PAY-01"),
    ("X-ServiceName", "payments"),
    ("X-MinorServiceVersion", "v1.12"),
    ("X-ChannelCategory", "digital"),
    ("X-ChannelCode", "WEB"),
    ("X-ChannelName", "web"),
];

async fn call(req: test::TestRequest) -> ServiceResponse<EitherBody<BoxBody>> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let app = test::init_service(
        App::new()
            .app_data(health)
            .wrap(HeaderValidation::new(RuleSet::defaults()))
            .wrap(Correlation)
            .service(greet)
            .service(greet_by_name)
            .service(ready)
            .service(live),
    )
    .await;
    test::call_service(&app, req.to_request()).await
}

fn with_complete_headers(mut req: test::TestRequest) -> test::TestRequest {
    for header in COMPLETE {
        req = req.insert_header(header);
    }
    req
}

fn conversation_id<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(CONVERSATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("conversation id header")
}

#[actix_rt::test]
async fn greeting_echoes_message_and_conversation_ids() {
    let req = with_complete_headers(test::TestRequest::post().uri("/api/hello"))
        .set_json(json!({"messageID": "m-42", "primaryData": "Ada"}));

    let res = call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let header = conversation_id(&res);
    assert!(Uuid::parse_str(&header).is_ok());

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["primaryData"], "Hello, Ada!");
    assert_eq!(body["messageID"], "m-42");
    assert_eq!(body["conversationID"], header.as_str());
}

#[actix_rt::test]
async fn rejection_envelope_matches_conversation_header() {
    let res = call(test::TestRequest::get().uri("/api/hello")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = conversation_id(&res);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["conversationID"], header.as_str());
    assert_eq!(body["messageID"], Value::Null);
    assert_eq!(body["messageCode"], "4000453");
    let codes: Vec<&str> = body["errorInfo"]
        .as_array()
        .expect("errorInfo list")
        .iter()
        .filter_map(|entry| entry["errorCode"].as_str())
        .collect();
    assert_eq!(codes.len(), COMPLETE.len());
    for (name, _) in COMPLETE {
        assert!(codes.contains(&name), "{name} not reported: {codes:?}");
    }
}

#[rstest]
#[case("X-MinorServiceVersion", "1.123.3-alpha01")]
#[case("X-TimeStamp", "yesterday")]
#[case("X-CallBackURL", "notaurl")]
#[actix_rt::test]
async fn invalid_optional_or_required_value_is_rejected(
    #[case] header: &'static str,
    #[case] value: &'static str,
) {
    let req = with_complete_headers(test::TestRequest::get().uri("/api/hello"))
        .insert_header((header, value));
    let res = call(req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    let entries = body["errorInfo"].as_array().expect("errorInfo list");
    assert_eq!(entries.len(), 1, "{entries:?}");
    assert_eq!(entries.first().map(|e| &e["errorCode"]), Some(&json!(header)));
}

#[actix_rt::test]
async fn timestamp_yields_elapsed_time() {
    let sent = chrono::Utc::now().timestamp() - 2;
    let req = with_complete_headers(test::TestRequest::get().uri("/api/hello"))
        .insert_header(("X-TimeStamp", sent.to_string()));
    let res = call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let elapsed: i64 = res
        .headers()
        .get(ELAPSED_TIME_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("elapsed time header");
    assert!((1_000..60_000).contains(&elapsed), "{elapsed}");
}

#[actix_rt::test]
async fn probes_skip_validation_but_keep_correlation() {
    let res = call(test::TestRequest::get().uri("/health/live")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(CONVERSATION_ID_HEADER));
}
