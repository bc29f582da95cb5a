//! HTTP middleware shared by all routes.

use axum::{
    body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// Header used to propagate request ids between services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id carried in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Tags the request with an id and echoes it back on the response.
///
/// An incoming `x-request-id` header is honored when it parses as a UUID;
/// anything else gets a freshly generated id.
pub async fn track_request(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(RequestId(id));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Builds the tracing span for a request, carrying its id alongside the
/// method and target.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|RequestId(id)| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
