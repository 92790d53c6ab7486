use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::loader::{LoadError, load_dataset};
use crate::config::ContactsConfig;
use crate::domain::model::{Contact, ContactId};
use crate::domain::repo::{ContactMutation, ContactsRepository};

/// Records in load order plus an id -> position index.
///
/// The collection never grows or shrinks after construction, so positions
/// stay valid for the lifetime of the index.
struct Directory {
    contacts: Vec<Contact>,
    index: HashMap<ContactId, usize>,
}

/// In-process contact store backing the directory service.
///
/// Readers take the shared lock and clone out a snapshot. `update` holds the
/// exclusive lock for the whole read-modify-write, so concurrent toggles of
/// the same record never lose an update.
pub struct InMemoryContactsRepository {
    inner: RwLock<Directory>,
}

impl InMemoryContactsRepository {
    /// Build a store from already-parsed records.
    ///
    /// # Errors
    /// Returns `LoadError::DuplicateId` if two records share an id.
    pub fn from_contacts(contacts: Vec<Contact>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(contacts.len());
        for (pos, contact) in contacts.iter().enumerate() {
            match index.entry(contact.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(LoadError::DuplicateId {
                        id: contact.id.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }
        }

        Ok(Self {
            inner: RwLock::new(Directory { contacts, index }),
        })
    }

    /// An empty directory.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(Directory {
                contacts: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Load the dataset named by `cfg`.
    ///
    /// A missing file yields an empty store when `allow_missing_dataset` is
    /// set; every other failure is returned.
    ///
    /// # Errors
    /// Returns `LoadError` if the dataset cannot be read or parsed, or holds
    /// duplicate ids.
    pub fn load(cfg: &ContactsConfig) -> Result<Self, LoadError> {
        let path = cfg.dataset_path.as_path();
        if cfg.allow_missing_dataset && !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Contacts dataset not found; starting with an empty directory"
            );
            return Ok(Self::empty());
        }

        let repo = Self::from_contacts(load_dataset(path)?)?;
        tracing::info!(
            path = %path.display(),
            total = repo.len(),
            "Contacts dataset loaded"
        );
        Ok(repo)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContactsRepository for InMemoryContactsRepository {
    async fn list(&self) -> anyhow::Result<Vec<Contact>> {
        Ok(self.inner.read().contacts.clone())
    }

    async fn find(&self, id: &ContactId) -> anyhow::Result<Option<Contact>> {
        let dir = self.inner.read();
        Ok(dir.index.get(id).map(|&pos| dir.contacts[pos].clone()))
    }

    async fn update(
        &self,
        id: &ContactId,
        mutation: ContactMutation<'_>,
    ) -> anyhow::Result<Option<Contact>> {
        let mut guard = self.inner.write();
        let dir = &mut *guard;
        let Some(&pos) = dir.index.get(id) else {
            return Ok(None);
        };

        let mut updated = dir.contacts[pos].clone();
        mutation(&mut updated);
        // The id is the index key and must survive any mutation.
        anyhow::ensure!(
            updated.id == *id,
            "mutation changed the id of contact '{id}'"
        );
        dir.contacts[pos] = updated.clone();
        Ok(Some(updated))
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.len())
    }
}
