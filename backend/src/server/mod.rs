//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::future::Future;
use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use header_rules::{HeaderRulesValidator, RuleSet};
use tracing::{info, warn};

use header_guard::inbound::http::health::{HealthState, live, ready};
use header_guard::inbound::http::hello::{greet, greet_by_name};
use header_guard::{Correlation, HeaderValidation};
#[cfg(debug_assertions)]
use header_guard::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    rules: Arc<RuleSet>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let validation = HeaderValidation::from_validator(HeaderRulesValidator::from_shared(rules))
        .exempt("/docs")
        .exempt("/api-docs");

    let app = App::new()
        .app_data(health_state)
        .wrap(validation)
        .wrap(Correlation)
        .service(greet)
        .service(greet_by_name)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Flag the process as unhealthy once `shutdown` resolves, so liveness
/// probes report the drain while in-flight requests complete.
async fn mark_unhealthy_on<F>(shutdown: F, health_state: web::Data<HealthState>)
where
    F: Future<Output = ()>,
{
    shutdown.await;
    info!("shutdown requested; failing liveness probes");
    health_state.mark_unhealthy();
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig { bind_addr, rules } = config;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), rules.clone()))
        .bind(bind_addr)?
        .run();

    actix_web::rt::spawn(mark_unhealthy_on(
        async {
            if let Err(error) = actix_web::rt::signal::ctrl_c().await {
                warn!(%error, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        },
        health_state.clone(),
    ));
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use header_guard::CONVERSATION_ID_HEADER;

    #[actix_rt::test]
    async fn rejects_bare_request_with_conversation_id() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            Arc::new(RuleSet::defaults()),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/api/hello").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.headers().contains_key(CONVERSATION_ID_HEADER));
    }

    #[actix_rt::test]
    async fn shutdown_fails_liveness() {
        let state = web::Data::new(HealthState::new());
        state.mark_ready();
        mark_unhealthy_on(std::future::ready(()), state.clone()).await;

        let app = test::init_service(build_app(state, Arc::new(RuleSet::defaults()))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_rt::test]
    async fn probes_bypass_validation() {
        let state = web::Data::new(HealthState::new());
        state.mark_ready();
        let app = test::init_service(build_app(state, Arc::new(RuleSet::defaults()))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
