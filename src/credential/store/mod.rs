//! Host credential storage contract.
//!
//! The host server owns credential persistence and its transactional
//! guarantees; this plugin only performs single create, read, and delete
//! calls through [`CredentialStore`]. Methods return `anyhow::Result` so a
//! host backend can attach whatever context it has.

mod memory;

pub use memory::InMemoryCredentialStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::credential::models::StoredCredential;

/// Generic credential storage exposed by the host.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists a new credential for the user and assigns its id.
    ///
    /// The returned record is the stored one, id included. Any id on the
    /// incoming record is ignored.
    async fn create_credential(
        &self,
        user_id: Uuid,
        credential: StoredCredential,
    ) -> Result<StoredCredential>;

    /// Removes a stored credential. Returns `false` when no record matched.
    async fn delete_credential(&self, user_id: Uuid, credential_id: Uuid) -> Result<bool>;

    /// All stored credentials of the given type for the user.
    async fn credentials_by_type(
        &self,
        user_id: Uuid,
        credential_type: &str,
    ) -> Result<Vec<StoredCredential>>;

    /// Looks up one stored credential by id.
    async fn credential_by_id(
        &self,
        user_id: Uuid,
        credential_id: Uuid,
    ) -> Result<Option<StoredCredential>>;
}
