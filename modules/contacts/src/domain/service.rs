//! Directory service - the read and toggle operations over the contact store.
//!
//! Every operation is a scan or a single-record lookup against the
//! `ContactsRepository` port; the service owns the filtering rules and the
//! mapping of storage failures into `DomainError`.

use std::sync::Arc;

use super::error::DomainError;
use super::model::{Contact, ContactId};
use super::repo::ContactsRepository;

/// Query parameter that carries the search term.
pub const SEARCH_PARAM: &str = "name";

pub struct Service {
    repo: Arc<dyn ContactsRepository>,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn ContactsRepository>) -> Self {
        Self { repo }
    }

    /// All contacts in load order.
    ///
    /// # Errors
    /// Returns `DomainError::Internal` if the store cannot be read.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        tracing::debug!("Listing all contacts");
        Ok(self.repo.list().await?)
    }

    /// Contacts whose favourite flag is set, in load order.
    ///
    /// # Errors
    /// Returns `DomainError::Internal` if the store cannot be read.
    pub async fn list_favourites(&self) -> Result<Vec<Contact>, DomainError> {
        tracing::debug!("Listing favourite contacts");
        let favourites = self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(Contact::is_favourite)
            .collect();
        Ok(favourites)
    }

    /// Case-insensitive substring search on `full_name`.
    ///
    /// An absent or empty term is a caller error. No match is an empty list,
    /// not a failure.
    ///
    /// # Errors
    /// Returns `DomainError::MissingParameter` for an absent/empty term and
    /// `DomainError::Internal` if the store cannot be read or a stored name
    /// is not a string.
    pub async fn search_by_name(&self, name: Option<&str>) -> Result<Vec<Contact>, DomainError> {
        let term = match name {
            Some(term) if !term.is_empty() => term,
            _ => return Err(DomainError::missing_parameter(SEARCH_PARAM)),
        };

        tracing::debug!(search_term = %term, "Searching contacts by name");

        let needle = term.to_lowercase();
        let mut matches = Vec::new();
        for contact in self.repo.list().await? {
            let hit = contact.name_contains(&needle).ok_or_else(|| {
                DomainError::internal(format!(
                    "contact '{}' has a non-string full_name",
                    contact.id
                ))
            })?;
            if hit {
                matches.push(contact);
            }
        }
        Ok(matches)
    }

    /// # Errors
    /// Returns `DomainError::ContactNotFound` if no record has `id`.
    pub async fn get_contact(&self, id: &ContactId) -> Result<Contact, DomainError> {
        tracing::debug!(contact_id = %id, "Getting contact by id");
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| DomainError::contact_not_found(id.clone()))
    }

    /// Flip the favourite flag of one contact and return the updated record.
    ///
    /// # Errors
    /// Returns `DomainError::ContactNotFound` if no record has `id`.
    pub async fn toggle_favourite(&self, id: &ContactId) -> Result<Contact, DomainError> {
        let updated = self
            .repo
            .update(id, &Contact::toggle_favourite)
            .await?
            .ok_or_else(|| DomainError::contact_not_found(id.clone()))?;

        tracing::info!(
            contact_id = %id,
            is_favourite = updated.is_favourite(),
            "Favourite status updated"
        );
        Ok(updated)
    }

    /// # Errors
    /// Returns `DomainError::Internal` if the store cannot be read.
    pub async fn total_contacts(&self) -> Result<usize, DomainError> {
        Ok(self.repo.count().await?)
    }
}
