//! Header validation middleware.
//!
//! Evaluates the configured [`RuleSet`] against every request before it
//! reaches a handler. Requests with any violation are answered with HTTP 400
//! and the standard error envelope listing every offending header; the
//! handler is never invoked.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::HeaderMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use header_rules::{
    DefaultResponseConverter, HeaderRulesValidator, HeaderViolation, HeadersValidationError,
    RequestContext, ResponseConverter, RuleSet,
};
use tracing::info;

use crate::inbound::http::error::HeaderValidationFailure;

/// Path prefix exempt from validation by default.
pub const HEALTH_PATH_PREFIX: &str = "/health/";

/// Middleware rejecting requests whose headers break the configured rules.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use header_guard::{Correlation, HeaderValidation};
/// use header_rules::RuleSet;
///
/// let app = App::new()
///     .wrap(HeaderValidation::new(RuleSet::defaults()))
///     .wrap(Correlation);
/// ```
#[derive(Clone)]
pub struct HeaderValidation {
    validator: HeaderRulesValidator,
    converter: Arc<dyn ResponseConverter>,
    exempt_prefixes: Vec<String>,
}

impl HeaderValidation {
    /// Validate requests against `rules`.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self::from_validator(HeaderRulesValidator::new(rules))
    }

    /// Validate requests with an existing validator.
    #[must_use]
    pub fn from_validator(validator: HeaderRulesValidator) -> Self {
        Self {
            validator,
            converter: Arc::new(DefaultResponseConverter),
            exempt_prefixes: vec![HEALTH_PATH_PREFIX.to_owned()],
        }
    }

    /// Render failure bodies with `converter`.
    #[must_use]
    pub fn with_converter(mut self, converter: impl ResponseConverter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    /// Skip validation for request paths starting with `prefix`.
    #[must_use]
    pub fn exempt(mut self, prefix: impl Into<String>) -> Self {
        self.exempt_prefixes.push(prefix.into());
        self
    }

    fn is_exempt(&self, path: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn check(&self, headers: &HeaderMap) -> Result<(), HeadersValidationError> {
        self.validator.check(|name| {
            headers
                .get(name.trim())
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
        })
    }
}

impl std::fmt::Debug for HeaderValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderValidation")
            .field("rules", &self.validator.rules().len())
            .field("exempt_prefixes", &self.exempt_prefixes)
            .finish_non_exhaustive()
    }
}

impl<S, B> Transform<S, ServiceRequest> for HeaderValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = HeaderValidationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HeaderValidationMiddleware {
            service: Rc::new(service),
            guard: Rc::new(self.clone()),
        }))
    }
}

/// Service wrapper produced by [`HeaderValidation`].
pub struct HeaderValidationMiddleware<S> {
    service: Rc<S>,
    guard: Rc<HeaderValidation>,
}

impl<S, B> Service<ServiceRequest> for HeaderValidationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let guard = Rc::clone(&self.guard);
        Box::pin(async move {
            let outcome = if guard.is_exempt(req.path()) {
                Ok(())
            } else {
                guard.check(req.headers())
            };
            match outcome {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(error) => {
                    let context = RequestContext::current();
                    info!(
                        path = req.path(),
                        violations = error.len(),
                        headers = ?error.iter().map(HeaderViolation::header_name).collect::<Vec<_>>(),
                        "request rejected by header rules"
                    );
                    let failure = HeaderValidationFailure::new(
                        &error,
                        context.as_ref(),
                        guard.converter.as_ref(),
                    );
                    Ok(req.error_response(failure).map_into_right_body())
                }
            }
        })
    }
}
