//! Contacts Module
//!
//! Serves a fixed, in-memory directory of contact records over REST:
//! listing, favourites filtering, case-insensitive name search, lookup by id
//! and toggling the favourite flag.
//!
//! ## Layout
//!
//! - `domain` - the `Contact` model, the `ContactsRepository` port and the
//!   directory `Service`
//! - `infra` - dataset loader and the in-memory repository
//! - `api::rest` - DTOs, handlers, routes and error mapping
//!
//! The HTTP host (CORS, tracing, body limits, serving) lives in the
//! `contacts-server` app; this crate only hands it a `Router`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub use config::ContactsConfig;

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::{ENDPOINTS, router};
pub use domain::model::{Contact, ContactId};
pub use domain::repo::ContactsRepository;
pub use domain::service::Service;
pub use infra::storage::InMemoryContactsRepository;
