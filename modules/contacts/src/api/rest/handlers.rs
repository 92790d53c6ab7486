use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Path, Query};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::info;

use super::dto::{
    ContactListResponse, ContactResponse, FavouriteToggledResponse, HealthResponse,
    SearchQuery, SearchResponse,
};
use super::error::{ApiError, ApiResult, WithOperationContext};
use crate::domain::model::ContactId;
use crate::domain::service::Service;

pub async fn list_contacts(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<ContactListResponse>> {
    let contacts = svc
        .list_contacts()
        .await
        .context("Error fetching contacts")?;
    info!(count = contacts.len(), "Listing contacts");
    Ok(Json(contacts.into()))
}

pub async fn list_favourites(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<ContactListResponse>> {
    let favourites = svc
        .list_favourites()
        .await
        .context("Error fetching favourite contacts")?;
    info!(count = favourites.len(), "Listing favourite contacts");
    Ok(Json(favourites.into()))
}

pub async fn search_contacts(
    Extension(svc): Extension<Arc<Service>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected search query string");
        ApiError::bad_request(rejection.body_text())
    })?;

    let matches = svc
        .search_by_name(query.name.as_deref())
        .await
        .context("Error searching contacts")?;

    // Only reachable with a non-empty term; the service rejects the rest.
    let search_term = query.name.unwrap_or_default();
    info!(search_term = %search_term, count = matches.len(), "Searched contacts by name");
    Ok(Json(SearchResponse::new(search_term, matches)))
}

pub async fn get_contact(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactResponse>> {
    let id = ContactId::from(id);
    info!(contact_id = %id, "Getting contact details");

    let contact = svc.get_contact(&id).await.context("Error fetching contact")?;
    Ok(Json(contact.into()))
}

pub async fn toggle_favourite(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FavouriteToggledResponse>> {
    let id = ContactId::from(id);
    info!(contact_id = %id, "Toggling favourite status");

    let contact = svc
        .toggle_favourite(&id)
        .await
        .context("Error updating favourite status")?;
    Ok(Json(contact.into()))
}

pub async fn health_check(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<HealthResponse>> {
    let total_contacts = svc
        .total_contacts()
        .await
        .context("Error checking health")?;
    Ok(Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        total_contacts,
    }))
}

pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
