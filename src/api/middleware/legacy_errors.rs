//! Legacy error flattening.
//!
//! Older clients of the donation API expect every failure as
//! `400 Bad Request` with the bare message as a plain-text body. When
//! `api.legacy_errors` is enabled this middleware rewrites typed error
//! responses of the `/cauza` routes into that shape. Health and user routes
//! keep their typed responses.

use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;

/// Path prefix of the routes older clients call.
const LEGACY_PREFIX: &str = "/cauza";

/// Collapses any 4xx/5xx response into `400` with a `text/plain` message.
pub async fn legacy_error_middleware(request: Request, next: Next) -> Response {
    let legacy_route = request.uri().path().starts_with(LEGACY_PREFIX);
    let response = next.run(request).await;

    let status = response.status();
    if !legacy_route || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let message = match serde_json::from_slice::<ErrorResponse>(&bytes) {
        Ok(error) => error.message,
        Err(_) => String::from_utf8_lossy(&bytes).trim().to_string(),
    };

    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}
