//! Request body handling in front of the routes.
//!
//! JSON bodies are buffered and parsed before any handler runs, so a
//! malformed or oversized payload gets the error envelope even on routes
//! that ignore the body. Other content types pass through untouched and are
//! only capped by `RequestBodyLimitLayer`.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use contacts::api::rest::error::ApiError;
use http_body_util::LengthLimitError;
use serde::de::IgnoredAny;

/// Message shared by every body rejection.
const BODY_ERROR_MESSAGE: &str = "Something went wrong!";

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn payload_too_large() -> Response {
    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, BODY_ERROR_MESSAGE)
        .with_error("request entity too large")
        .into_response()
}

fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Buffer and parse `application/json` bodies up to `limit` bytes.
///
/// An empty body is accepted. The buffered bytes are handed on unchanged.
pub async fn parse_json_body(State(limit): State<usize>, request: Request, next: Next) -> Response {
    if !is_json(request.headers()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if exceeded_limit(&e) => {
            tracing::debug!(limit, "Rejected oversized JSON body");
            return payload_too_large();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            return ApiError::bad_request(BODY_ERROR_MESSAGE)
                .with_error(e.to_string())
                .into_response();
        }
    };

    if !bytes.is_empty()
        && let Err(e) = serde_json::from_slice::<IgnoredAny>(&bytes)
    {
        tracing::debug!(error = %e, "Rejected malformed JSON body");
        return ApiError::bad_request(BODY_ERROR_MESSAGE)
            .with_error(e.to_string())
            .into_response();
    }

    next.run(Request::from_parts(parts, axum::body::Body::from(bytes)))
        .await
}

/// Replace the plain-text 413 of `RequestBodyLimitLayer` with the error
/// envelope.
pub async fn envelope_payload_too_large(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json(response.headers()) {
        return payload_too_large();
    }
    response
}
