//! Cross Origin Resource Sharing policy.
//!
//! Fixed rather than configurable: any origin, `GET`/`POST`/`OPTIONS`, and the
//! `Content-Type`/`Mcp-Session-Id` headers. No per-deployment tuning.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderName, HeaderValue, Method, StatusCode};
use tower_http::cors::{Any, CorsLayer};

pub fn permissive_cors_layer() -> CorsLayer {
    let mcp_session_id: HeaderName = HeaderName::from_static("mcp-session-id");
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, mcp_session_id])
}

/// Short-circuits every `OPTIONS` request with `204 No Content` plus the fixed CORS headers,
/// ahead of any route matching. `CorsLayer`'s own preflight handling answers `200`, not the
/// `204` every `OPTIONS` request is expected to return.
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Mcp-Session-Id"),
    );
    response
}
