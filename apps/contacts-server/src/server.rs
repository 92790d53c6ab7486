//! HTTP host: middleware stack, bind, serve until a shutdown signal.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::middleware::{from_fn_with_state, map_response};
use axum::response::{IntoResponse, Response};
use contacts::api::rest::error::ApiError;
use contacts::{ENDPOINTS, InMemoryContactsRepository, Service};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::field::Empty;

use crate::body;
use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::signals;

/// Turn a handler panic into the generic 500 envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic".to_owned()
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    ApiError::internal("Something went wrong!", detail).into_response()
}

/// Apply trace layer to router.
fn apply_trace_layer(router: Router) -> Router {
    use tower_http::trace::TraceLayer;

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!(parent: span, "request completed");
                },
            ),
    )
}

/// Wrap `router` in the host middleware stack.
///
/// Requests flow outermost to innermost:
/// Trace -> CORS -> `CatchPanic` -> 413 envelope -> `BodyLimit` -> JSON body
/// parse -> routes. CORS sits outside the panic catcher so 500s from a
/// panicking handler still carry the allow-origin headers.
///
/// # Errors
/// Returns an error if the CORS section is invalid.
pub fn apply_middleware(router: Router, config: &AppConfig) -> Result<Router> {
    let limit = config.contacts.body_limit_bytes;
    let router = router
        // 1) Reject malformed or oversized JSON before a handler sees it
        .layer(from_fn_with_state(limit, body::parse_json_body))
        // 2) Cap bodies announced through Content-Length
        .layer(RequestBodyLimitLayer::new(limit))
        // 3) Render the limit rejection as the error envelope
        .layer(map_response(body::envelope_payload_too_large))
        // 4) Panics become the generic 500
        .layer(CatchPanicLayer::custom(panic_response))
        // 5) CORS on every response, panics included
        .layer(build_cors_layer(&config.cors)?);

    Ok(apply_trace_layer(router))
}

/// Build the application router with the full middleware stack.
///
/// # Errors
/// Returns an error if the CORS section is invalid.
pub fn build_app(config: &AppConfig, service: Arc<Service>) -> Result<Router> {
    apply_middleware(contacts::router(service), config)
}

fn log_startup(addr: SocketAddr, total: usize) {
    tracing::info!(%addr, "Server is running on http://{addr}");
    tracing::info!(total_contacts = total, "Total contacts loaded: {total}");
    for (method, path, summary) in ENDPOINTS {
        tracing::info!("  {method:<6} {path:<36} - {summary}");
    }
}

async fn shutdown_signal() {
    match signals::next_shutdown_signal().await {
        Ok(signal) => {
            tracing::info!(%signal, "Shutdown signal received, draining connections");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "shutdown: signal listener failed, falling back to ctrl_c()"
            );
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// Load the dataset, bind, and serve until SIGINT/SIGTERM.
///
/// # Errors
/// Returns an error if the dataset cannot be loaded, the address cannot be
/// bound, or the server fails.
pub async fn run(config: AppConfig) -> Result<()> {
    let repo = InMemoryContactsRepository::load(&config.contacts).with_context(|| {
        format!(
            "failed to load contacts dataset {}",
            config.contacts.dataset_path.display()
        )
    })?;
    let total = repo.len();
    let service = Arc::new(Service::new(Arc::new(repo)));

    let app = build_app(&config, service)?;
    let addr = config.bind_addr()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log_startup(listener.local_addr()?, total);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
