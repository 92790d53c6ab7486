use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Served endpoints as `(method, path, summary)`, for the startup banner.
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/api/contacts", "Get all contacts"),
    ("GET", "/api/contacts/favourites", "Get favourite contacts"),
    ("GET", "/api/contacts/search?name=...", "Search by name"),
    ("GET", "/api/contacts/{id}", "Get single contact"),
    ("PATCH", "/api/contacts/{id}/favourite", "Toggle favourite"),
    ("GET", "/health", "Health check"),
];

/// Mount the contact routes and the health check on `router`.
#[must_use]
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/api/contacts", get(handlers::list_contacts))
        .route("/api/contacts/favourites", get(handlers::list_favourites))
        .route("/api/contacts/search", get(handlers::search_contacts))
        .route("/api/contacts/{id}", get(handlers::get_contact))
        .route(
            "/api/contacts/{id}/favourite",
            patch(handlers::toggle_favourite),
        )
        .route("/health", get(handlers::health_check))
        .layer(Extension(service))
}

/// Complete application router.
///
/// Unknown paths and known paths hit with an unsupported method both get the
/// uniform `Route not found` 404 envelope.
#[must_use]
pub fn router(service: Arc<Service>) -> Router {
    register_routes(Router::new(), service)
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
}
