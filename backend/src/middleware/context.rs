//! Request context middleware.
//!
//! Each request runs inside its own [`RequestContext`] scope with a fresh
//! conversation id. The id is echoed in a `conversation-id` response header,
//! and the elapsed time since the client's `X-TimeStamp` is reported in
//! `X-ElapsedTime`. The context is cleared once the inner service finishes,
//! whether it succeeded or failed.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use chrono::Utc;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use header_rules::{ELAPSED_TIME_HEADER, RequestContext, TIMESTAMP_HEADER, elapsed_time};
use tracing::error;

use crate::CONVERSATION_ID_HEADER;

/// Middleware installing a [`RequestContext`] around every request.
///
/// Wrap it outside [`HeaderValidation`](crate::middleware::HeaderValidation)
/// so rejected requests are still correlated.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use header_guard::Correlation;
///
/// let app = App::new().wrap(Correlation);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlation;

impl<S, B> Transform<S, ServiceRequest> for Correlation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`Correlation`].
pub struct CorrelationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CorrelationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let context = RequestContext::generate();
        let conversation_id = context.conversation_id().to_owned();
        let timestamp = header_text(req.headers(), TIMESTAMP_HEADER);
        Box::pin(RequestContext::scope(context, async move {
            let outcome = service.call(req).await;
            RequestContext::clear();
            let mut res = outcome?;

            let headers = res.response_mut().headers_mut();
            insert(headers, CONVERSATION_ID_HEADER, &conversation_id);
            let existing = header_text(headers, ELAPSED_TIME_HEADER);
            if let Some(elapsed) = elapsed_time(timestamp.as_deref(), existing.as_deref(), Utc::now())
            {
                insert(headers, ELAPSED_TIME_HEADER, &elapsed);
            }
            Ok(res)
        }))
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(header), Ok(encoded)) => {
            headers.insert(header, encoded);
        }
        (Err(error), _) => {
            error!(%error, header = name, "failed to encode response header name");
        }
        (_, Err(error)) => {
            error!(%error, header = name, value, "failed to encode response header value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    fn observed_context() -> HttpResponse {
        match RequestContext::current() {
            Some(context) => HttpResponse::Ok().body(context.conversation_id().to_owned()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[actix_web::test]
    async fn handler_sees_the_echoed_conversation_id() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { observed_context() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.status().is_success());
        let echoed = res
            .headers()
            .get(CONVERSATION_ID_HEADER)
            .expect("conversation id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), echoed);
        assert!(uuid::Uuid::parse_str(&echoed).is_ok());
    }

    #[actix_web::test]
    async fn each_request_gets_a_new_conversation_id() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let mut ids = Vec::new();
        for _ in 0..2 {
            let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            ids.push(res.headers().get(CONVERSATION_ID_HEADER).cloned());
        }
        assert!(ids.iter().all(Option::is_some));
        assert_ne!(ids.first(), ids.last());
    }

    #[actix_web::test]
    async fn context_does_not_outlive_the_request() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let _res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(RequestContext::current(), None);
    }

    #[actix_web::test]
    async fn reports_elapsed_time_for_timestamped_requests() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let sent = (Utc::now().timestamp() - 2).to_string();
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TIMESTAMP_HEADER, sent))
            .to_request();
        let res = test::call_service(&app, req).await;
        let elapsed: i64 = res
            .headers()
            .get(ELAPSED_TIME_HEADER)
            .expect("elapsed time header")
            .to_str()
            .expect("header is ascii")
            .parse()
            .expect("milliseconds");
        assert!((2_000..60_000).contains(&elapsed), "elapsed {elapsed}");
    }

    #[actix_web::test]
    async fn keeps_an_elapsed_time_set_by_the_handler() {
        let app = test::init_service(App::new().wrap(Correlation).route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .insert_header((ELAPSED_TIME_HEADER, "7"))
                    .finish()
            }),
        ))
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TIMESTAMP_HEADER, "1700000000"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(ELAPSED_TIME_HEADER).map(HeaderValue::as_bytes),
            Some(b"7".as_slice())
        );
    }

    #[actix_web::test]
    async fn skips_elapsed_time_without_timestamp() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(!res.headers().contains_key(ELAPSED_TIME_HEADER));
    }
}
