//! JSON body extractor recording the client's message id.
//!
//! [`MessagePayload`] deserializes any body implementing [`InboundRequest`]
//! and records its message id on the active [`RequestContext`], so error
//! envelopes rendered later in the same request echo it. The standard
//! [`RequestPayload`](header_rules::RequestPayload) is the usual body, but an
//! application may supply its own shape.

use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use header_rules::{AdditionalData, InboundRequest, RequestContext};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Inbound JSON body of type `B`.
#[derive(Debug, Clone)]
pub struct MessagePayload<B>(B);

impl<B> MessagePayload<B> {
    /// Unwrap into the inner body.
    pub fn into_inner(self) -> B {
        self.0
    }
}

impl<B> Deref for MessagePayload<B> {
    type Target = B;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<B: InboundRequest> InboundRequest for MessagePayload<B> {
    fn message_id(&self) -> Option<&str> {
        self.0.message_id()
    }

    fn additional_data(&self) -> &[AdditionalData] {
        self.0.additional_data()
    }
}

impl<B> FromRequest for MessagePayload<B>
where
    B: InboundRequest + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<B>::from_request(req, payload);
        Box::pin(async move {
            let request = body.await?.into_inner();
            if let Some(id) = request.message_id() {
                if let Ok(context) = RequestContext::attach_message_id(id) {
                    debug!(
                        conversation_id = context.conversation_id(),
                        message_id = id,
                        "message id recorded"
                    );
                }
            }
            Ok(Self(request))
        })
    }
}
