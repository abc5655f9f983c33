//! Request-scoped correlation identifiers.
//!
//! A [`RequestContext`] lives in Tokio task-local storage for the lifetime of
//! one request future. [`RequestContext::scope`] opens the slot; the slot is
//! dropped when the future completes, fails, or is cancelled, so no context
//! outlives its request even when worker threads are reused.
//!
//! Task-local values are not inherited by spawned tasks. Capture the context
//! with [`RequestContext::current`] and pass it explicitly, or open a new
//! scope in the spawned task.

use std::cell::RefCell;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task_local;
use tracing::{debug, warn};
use uuid::Uuid;

task_local! {
    static REQUEST_CONTEXT: RefCell<Option<RequestContext>>;
}

/// Errors raised when the ambient context is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No [`RequestContext::scope`] is active on the current task.
    #[error("no request context scope is active")]
    NoScope,
}

/// Correlation identifiers for one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(rename = "conversationID")]
    conversation_id: String,
    #[serde(rename = "messageID")]
    message_id: Option<String>,
}

impl RequestContext {
    /// Context with the given conversation id and no message id.
    #[must_use]
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message_id: None,
        }
    }

    /// Context with a fresh random conversation id.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Copy of this context carrying `message_id`.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Conversation id.
    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Client-supplied message id, if one was recorded.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Context installed in the current scope, if any.
    ///
    /// # Examples
    /// ```
    /// use header_rules::RequestContext;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
    /// let context = RequestContext::new("c-1");
    /// let observed = RequestContext::scope(context.clone(), async { RequestContext::current() }).await;
    /// assert_eq!(observed, Some(context));
    /// assert_eq!(RequestContext::current(), None);
    /// # });
    /// ```
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_CONTEXT
            .try_with(|slot| slot.borrow().clone())
            .ok()
            .flatten()
    }

    /// Replace the context of the current scope.
    ///
    /// # Errors
    /// Returns [`ContextError::NoScope`] outside [`RequestContext::scope`].
    pub fn install(context: Self) -> Result<(), ContextError> {
        REQUEST_CONTEXT
            .try_with(|slot| {
                debug!(
                    conversation_id = context.conversation_id(),
                    message_id = context.message_id(),
                    "request context set"
                );
                slot.replace(Some(context));
            })
            .map_err(|_| ContextError::NoScope)
    }

    /// Remove the context of the current scope, returning it.
    ///
    /// Outside a scope there is nothing to clear and `None` is returned.
    pub fn clear() -> Option<Self> {
        REQUEST_CONTEXT
            .try_with(|slot| slot.take())
            .ok()
            .flatten()
            .inspect(|context| {
                debug!(
                    conversation_id = context.conversation_id(),
                    "request context cleared"
                );
            })
    }

    /// Record a client-supplied message id on the current context.
    ///
    /// The existing conversation id is kept; a fresh one is generated when
    /// the scope holds no context.
    ///
    /// # Errors
    /// Returns [`ContextError::NoScope`] outside [`RequestContext::scope`].
    pub fn attach_message_id(id: impl Into<String>) -> Result<Self, ContextError> {
        let message_id: String = id.into();
        let Some(existing) = REQUEST_CONTEXT.try_with(|slot| slot.borrow().clone()).ok() else {
            warn!(
                message_id = message_id.as_str(),
                "message id received outside a request scope"
            );
            return Err(ContextError::NoScope);
        };
        let updated = existing
            .unwrap_or_else(Self::generate)
            .with_message_id(message_id);
        Self::install(updated.clone())?;
        Ok(updated)
    }

    /// Run `fut` with `context` installed for its whole lifetime.
    pub async fn scope<F>(context: Self, fut: F) -> F::Output
    where
        F: Future,
    {
        REQUEST_CONTEXT.scope(RefCell::new(Some(context)), fut).await
    }

    /// Run `f` synchronously with `context` installed.
    pub fn sync_scope<F, R>(context: Self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        REQUEST_CONTEXT.sync_scope(RefCell::new(Some(context)), f)
    }
}
