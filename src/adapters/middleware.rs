//! Cross-cutting middleware stages.
//!
//! These are lightweight composable layers attached to the axum `Router`
//! through the stage list consumed by [`compose`](crate::core::pipeline::compose):
//! request-id injection, request timing, and security headers. They stay
//! stateless to keep the hot path free of contention.
use std::time::Instant;

use axum::{
    Router, extract::Request, http::HeaderValue, middleware, middleware::Next, response::Response,
};

use crate::core::pipeline::Stage;

/// Generate a per-request UUID and expose it via tracing plus `X-Request-ID`.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let span = tracing::info_span!("request", request_id = %request_id);
    let _enter = span.enter();

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Log start/end of a request including latency.
pub async fn request_timing_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    tracing::info!("Started processing {} {}", method, uri);

    let response = next.run(req).await;
    let duration = start.elapsed();

    tracing::info!(
        "Completed {} {} - {} in {:?}",
        method,
        uri,
        response.status(),
        duration
    );

    response
}

/// Add common security hardening headers.
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

/// The default cross-cutting stage list, in registration order. Layers
/// wrap the routes registered before them, so these must be composed
/// after the route stages.
pub fn stages() -> Vec<Stage<Router>> {
    vec![
        Stage::new("request_id", |router: Router| {
            router.layer(middleware::from_fn(request_id_middleware))
        }),
        Stage::new("request_timing", |router: Router| {
            router.layer(middleware::from_fn(request_timing_middleware))
        }),
        Stage::new("security_headers", |router: Router| {
            router.layer(middleware::from_fn(security_headers_middleware))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt; // for oneshot

    use super::*;
    use crate::core::pipeline::compose;

    fn ok_router() -> Router {
        Router::new().route(
            "/",
            get(|| async {
                axum::response::Response::builder()
                    .status(StatusCode::OK)
                    .body(Body::empty())
                    .unwrap()
            }),
        )
    }

    #[tokio::test]
    async fn test_security_headers_middleware() {
        let app = ok_router().layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers();

        assert!(headers.contains_key("X-Content-Type-Options"));
        assert!(headers.contains_key("X-Frame-Options"));
        assert!(headers.contains_key("Referrer-Policy"));
    }

    #[tokio::test]
    async fn test_request_id_middleware() {
        let app = ok_router().layer(middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers();

        assert!(headers.contains_key("X-Request-ID"));

        let request_id = headers.get("X-Request-ID").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn test_default_stages_compose_onto_a_router() {
        let app = compose(ok_router(), stages());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-Request-ID"));
        assert!(response.headers().contains_key("X-Content-Type-Options"));
    }
}
