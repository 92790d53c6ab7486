use async_trait::async_trait;

use super::model::{Contact, ContactId};

/// In-place change applied to a single record under the store's write guard.
pub type ContactMutation<'a> = &'a (dyn Fn(&mut Contact) + Send + Sync);

/// Port for the domain layer: the storage operations the directory needs.
///
/// The collection is fixed in size; there is no insert or delete. Object-safe
/// and async-friendly via `async_trait` so a persistent store can replace the
/// in-memory one without touching the service.
#[async_trait]
pub trait ContactsRepository: Send + Sync {
    /// Snapshot of every record in load order.
    async fn list(&self) -> anyhow::Result<Vec<Contact>>;

    /// Exact-match lookup by id.
    async fn find(&self, id: &ContactId) -> anyhow::Result<Option<Contact>>;

    /// Apply `mutation` to the record with `id` and return the updated copy.
    ///
    /// Returns `Ok(None)` when no record has that id. The read-modify-write
    /// must be atomic with respect to concurrent callers.
    async fn update(
        &self,
        id: &ContactId,
        mutation: ContactMutation<'_>,
    ) -> anyhow::Result<Option<Contact>>;

    /// Number of records held.
    async fn count(&self) -> anyhow::Result<usize>;
}
