//! Declarative middleware and route composition.
//!
//! The gateway is wired from two ordered lists: cross-cutting [`Stage`]s
//! and declarative [`Route`] descriptors. Both lists are built once at
//! startup from static configuration and consumed by a single fold,
//! [`compose`], which returns the fully wired router value. `Stage` is
//! generic over the registration target, so composition order is
//! observable in tests with nothing more than a `Vec` recorder: no
//! listener, no sockets.
//!
//! Handlers never see the raw transport request. They receive a
//! [`RequestView`] (method, path, query, body) and finish in one of three
//! ways: produce a [`Reply`], signal [`Step::Continue`] to defer to the
//! next handler in their chain, or fail with an [`ApiError`] that
//! transfers control to the error resolution policy.
use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Method, StatusCode};

use crate::core::error::ApiError;

/// A registration-time pipeline stage: a named, single-shot transform of
/// the registration target. Stages run exactly once, in list order, during
/// startup wiring. A stage that panics aborts startup; misregistration is
/// a configuration error, not a runtime error.
pub struct Stage<R> {
    name: &'static str,
    apply: Box<dyn FnOnce(R) -> R + Send>,
}

impl<R> Stage<R> {
    pub fn new(name: &'static str, apply: impl FnOnce(R) -> R + Send + 'static) -> Self {
        Self {
            name,
            apply: Box::new(apply),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Apply an ordered list of stages onto the target and return the wired
/// value. An empty list is a no-op.
pub fn compose<R>(target: R, stages: impl IntoIterator<Item = Stage<R>>) -> R {
    stages.into_iter().fold(target, |wired, stage| {
        tracing::debug!(stage = stage.name, "applying pipeline stage");
        (stage.apply)(wired)
    })
}

/// The abstracted request a handler operates on.
///
/// Carrying plain data instead of the transport object keeps handlers unit
/// testable without a live server. Cloning is cheap: the body is
/// reference-counted [`Bytes`].
#[derive(Debug, Clone)]
pub struct RequestView {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: Bytes,
}

impl RequestView {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: HashMap<String, String>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// What a handler decided to do with the request.
#[derive(Debug, Clone)]
pub enum Step {
    /// Terminal: write this reply.
    Respond(Reply),
    /// Defer to the next handler in the chain, or to the error pipeline
    /// if this handler was the last one.
    Continue,
}

/// The response a handler produces: a status plus a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl Reply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// 200 with the given payload.
    pub fn ok(body: serde_json::Value) -> Self {
        Self::json(StatusCode::OK, body)
    }
}

/// A request-processing function. Handlers may complete synchronously or
/// suspend on I/O; either way they resolve to a [`Step`] or an error.
pub type BoxedHandler =
    Arc<dyn Fn(RequestView) -> BoxFuture<'static, Result<Step, ApiError>> + Send + Sync>;

/// Box an async closure into a [`BoxedHandler`].
pub fn handler<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(RequestView) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Step, ApiError>> + Send + 'static,
{
    Arc::new(move |view| Box::pin(f(view)))
}

/// Declarative route descriptor: a path, a method, and an ordered handler
/// chain. A later chain element only runs when the previous one signalled
/// [`Step::Continue`].
pub struct Route {
    path: &'static str,
    method: Method,
    handlers: Vec<BoxedHandler>,
}

impl Route {
    /// A route with a single handler, normalized into a one-element chain.
    pub fn new(method: Method, path: &'static str, handler: BoxedHandler) -> Self {
        Self::chain(method, path, vec![handler])
    }

    /// A route with an explicit handler chain.
    pub fn chain(method: Method, path: &'static str, handlers: Vec<BoxedHandler>) -> Self {
        Self {
            path,
            method,
            handlers,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn into_handlers(self) -> Vec<BoxedHandler> {
        self.handlers
    }
}

/// Run a handler chain against a request view.
///
/// Errors propagate immediately. A chain that falls off its end without
/// responding defers to the error pipeline the same way a request that
/// matched no route does: by raising NotFound.
pub async fn run_chain(handlers: &[BoxedHandler], view: RequestView) -> Result<Reply, ApiError> {
    for handler in handlers {
        match handler(view.clone()).await? {
            Step::Respond(reply) => return Ok(reply),
            Step::Continue => {}
        }
    }
    Err(ApiError::not_found("Method not found."))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    fn view() -> RequestView {
        RequestView::new(Method::GET, "/test", HashMap::new(), Bytes::new())
    }

    fn recorder_stage(name: &'static str) -> Stage<Vec<&'static str>> {
        Stage::new(name, move |mut applied: Vec<&'static str>| {
            applied.push(name);
            applied
        })
    }

    #[test]
    fn test_compose_applies_stages_in_list_order() {
        let stages = vec![recorder_stage("a"), recorder_stage("b"), recorder_stage("c")];
        let applied = compose(Vec::new(), stages);
        assert_eq!(applied, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_compose_with_no_stages_is_a_noop() {
        let applied: Vec<&'static str> = compose(Vec::new(), Vec::new());
        assert!(applied.is_empty());
    }

    #[test]
    fn test_single_handler_normalizes_to_one_element_chain() {
        let route = Route::new(
            Method::GET,
            "/health",
            handler(|_| async { Ok(Step::Respond(Reply::ok(json!({"status": "ok"})))) }),
        );
        assert_eq!(route.into_handlers().len(), 1);
    }

    fn counting_handler(calls: Arc<AtomicUsize>) -> BoxedHandler {
        handler(move |_| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Step::Continue)
            }
        })
    }

    #[tokio::test]
    async fn test_respond_short_circuits_later_handlers() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let chain = vec![
            handler(|_| async { Ok(Step::Respond(Reply::ok(json!("first")))) }),
            counting_handler(later_calls.clone()),
        ];
        let reply = run_chain(&chain, view()).await.unwrap();
        assert_eq!(reply.body, json!("first"));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_continue_defers_to_next_handler() {
        let chain = vec![
            handler(|_| async { Ok(Step::Continue) }),
            handler(|_| async { Ok(Step::Respond(Reply::ok(json!("second")))) }),
        ];
        let reply = run_chain(&chain, view()).await.unwrap();
        assert_eq!(reply.body, json!("second"));
    }

    #[tokio::test]
    async fn test_handler_error_propagates_immediately() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let chain = vec![
            handler(|_| async { Err(ApiError::bad_request("Missing q parameter")) }),
            counting_handler(later_calls.clone()),
        ];
        let err = run_chain(&chain, view()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_chain_raises_not_found() {
        let chain = vec![handler(|_| async { Ok(Step::Continue) })];
        let err = run_chain(&chain, view()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Method not found.");
    }
}
