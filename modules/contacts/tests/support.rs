#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `contacts` integration tests.
//!
//! Builds an isolated directory per test and drives the full router with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use contacts::infra::storage::parse_dataset;
use contacts::{ContactsRepository, InMemoryContactsRepository, Service};
use serde_json::{Value, json};
use tower::ServiceExt as _;

/// Dataset used by most REST tests, in the document-database export shape.
#[must_use]
pub fn sample_dataset() -> Value {
    json!([
        {
            "id": { "$oid": "1" },
            "full_name": "Alice Smith",
            "email": "alice@example.com",
            "is_favourite": false
        },
        {
            "id": { "$oid": "2" },
            "full_name": "Bob Jones",
            "email": "bob@example.com",
            "is_favourite": true
        },
        {
            "id": "3",
            "full_name": "Malice Aforethought",
            "phone": "555-0100"
        },
        {
            "id": { "$oid": "4" },
            "full_name": "Carol White",
            "is_favourite": true,
            "address": { "city": "Leeds", "postcode": "LS1" }
        }
    ])
}

pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_dataset(&sample_dataset())
    }

    #[must_use]
    pub fn with_dataset(dataset: &Value) -> Self {
        let contacts = parse_dataset(dataset.to_string().as_bytes()).expect("valid dataset");
        let repo = InMemoryContactsRepository::from_contacts(contacts).expect("unique ids");
        Self::with_repository(Arc::new(repo))
    }

    #[must_use]
    pub fn with_repository(repo: Arc<dyn ContactsRepository>) -> Self {
        let service = Arc::new(Service::new(repo));
        Self {
            app: contacts::router(service),
        }
    }

    pub async fn request(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri).await
    }

    pub async fn patch(&self, uri: &str) -> (StatusCode, Value) {
        self.request("PATCH", uri).await
    }
}

/// Ids of the `data` array of a list/search response.
#[must_use]
pub fn data_ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|c| c["id"].as_str().expect("string id").to_owned())
        .collect()
}
