//! HTTP adapter: binds the transport-free pipeline core to axum.
//!
//! This is the only module that touches raw transport types. Inbound
//! requests are reduced to a [`RequestView`], handler chains run through
//! [`run_chain`], and every error (thrown by a handler or raised by the
//! not-found fallback) funnels through [`render_error`] into the
//! resolution policy. One recovery path, no exceptions.
use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    body::to_bytes,
    extract::Request,
    response::{IntoResponse, Response},
    routing::{MethodFilter, on},
};
use serde_json::json;

use crate::{
    adapters::middleware,
    config::RunMode,
    core::{
        error::ApiError,
        pipeline::{
            BoxedHandler, Reply, RequestView, Route, Stage, Step, compose, handler, run_chain,
        },
        resolve,
        search::SearchService,
    },
};

/// Upper bound on buffered request bodies. The API is GET-only today, so
/// anything near this is suspect.
const BODY_LIMIT: usize = 64 * 1024;

/// Build the fully wired application router.
///
/// Wiring order: application routes, then the not-found fallback as the
/// last route stage, then the cross-cutting layers (which wrap everything
/// registered before them).
pub fn build_router(mode: RunMode, service: Arc<SearchService>) -> Router {
    let mut stages = vec![routes_stage(api_routes(service), mode), not_found_stage(mode)];
    stages.extend(middleware::stages());
    compose(Router::new(), stages)
}

/// The application route table.
fn api_routes(service: Arc<SearchService>) -> Vec<Route> {
    vec![
        Route::chain(
            http::Method::GET,
            "/api/v1/search",
            vec![require_query("q"), search_places(service)],
        ),
        Route::new(http::Method::GET, "/health", health()),
        Route::new(http::Method::GET, "/", api_docs()),
    ]
}

/// Validation middleware: reject an absent or empty query parameter
/// before the search handler runs.
fn require_query(name: &'static str) -> BoxedHandler {
    handler(move |view: RequestView| async move {
        match view.query_param(name) {
            Some(value) if !value.trim().is_empty() => Ok(Step::Continue),
            _ => Err(ApiError::bad_request(format!("Missing {name} parameter"))),
        }
    })
}

/// Terminal search handler. Assumes validation already ran.
fn search_places(service: Arc<SearchService>) -> BoxedHandler {
    handler(move |view: RequestView| {
        let service = service.clone();
        async move {
            let query = view.query_param("q").unwrap_or_default().to_string();
            let places = service.search(&query).await.map_err(ApiError::server)?;
            Ok(Step::Respond(Reply::ok(places.into_value())))
        }
    })
}

fn health() -> BoxedHandler {
    handler(|_view| async { Ok(Step::Respond(Reply::ok(json!({"status": "ok"})))) })
}

/// Static API descriptor, served read-only for human consumption.
fn api_docs() -> BoxedHandler {
    handler(|_view| async {
        Ok(Step::Respond(Reply::ok(json!({
            "name": "geogate",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": [{
                "path": "/api/v1/search",
                "method": "GET",
                "query": {"q": "free-text search term, minimum 3 characters for a provider call"},
                "statuses": [200, 400, 404, 500],
            }],
        }))))
    })
}

/// Register an ordered list of route descriptors onto the router.
pub fn register_routes(router: Router, routes: Vec<Route>, mode: RunMode) -> Router {
    routes
        .into_iter()
        .fold(router, |router, route| mount(router, route, mode))
}

fn routes_stage(routes: Vec<Route>, mode: RunMode) -> Stage<Router> {
    Stage::new("routes", move |router| register_routes(router, routes, mode))
}

/// The last-registered route stage: anything that reaches it raises
/// NotFound through the same funnel as errors thrown deeper in a chain.
/// Covers unmatched paths and matched paths with an unregistered method
/// alike, so both render the same way.
fn not_found_stage(mode: RunMode) -> Stage<Router> {
    let handlers: Arc<Vec<BoxedHandler>> = Arc::new(vec![handler(|_view| async {
        Err(ApiError::not_found("Method not found."))
    })]);
    let raise = move |req: Request| {
        let handlers = handlers.clone();
        async move { dispatch(&handlers, mode, req).await }
    };
    Stage::new("not_found", move |router: Router| {
        router
            .fallback(raise.clone())
            .method_not_allowed_fallback(raise)
    })
}

/// Mount one route descriptor. Invalid method/path combinations abort
/// startup, in line with registration errors being configuration errors.
fn mount(router: Router, route: Route, mode: RunMode) -> Router {
    let path = route.path();
    let filter = MethodFilter::try_from(route.method().clone())
        .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
    let handlers = Arc::new(route.into_handlers());

    router.route(
        path,
        on(filter, move |req: Request| {
            let handlers = handlers.clone();
            async move { dispatch(&handlers, mode, req).await }
        }),
    )
}

/// Run a chain against an inbound request and write the outcome.
async fn dispatch(handlers: &[BoxedHandler], mode: RunMode, req: Request) -> Response {
    let view = match into_view(req).await {
        Ok(view) => view,
        Err(err) => return render_error(&err, mode),
    };
    match run_chain(handlers, view).await {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(err) => render_error(&err, mode),
    }
}

/// Reduce the transport request to the abstracted view handlers consume.
async fn into_view(req: Request) -> Result<RequestView, ApiError> {
    let (parts, body) = req.into_parts();

    let query: HashMap<String, String> = parts
        .uri
        .query()
        .map(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    let body = to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|_| ApiError::payload_too_large("Request body too large"))?;

    Ok(RequestView::new(
        parts.method,
        parts.uri.path().to_string(),
        query,
        body,
    ))
}

/// Convert a propagated error into a response via the resolution policy.
/// Client errors log at warn, server errors at error with full detail;
/// the rendered body is what the policy decided is safe to expose.
fn render_error(err: &ApiError, mode: RunMode) -> Response {
    match err {
        ApiError::Client { status, message } => {
            tracing::warn!(status = %status, message = %message, "client error");
        }
        ApiError::Server(report) => {
            tracing::error!(error = ?report, "server error");
        }
    }

    let rendered = resolve::resolve(err, mode);
    (rendered.status, Json(json!({"error": rendered.message}))).into_response()
}
