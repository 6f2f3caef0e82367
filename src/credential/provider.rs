//! Store adapter and verifier for secret question credentials.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::credential::models::{SecretQuestionCredential, CREDENTIAL_TYPE};
use crate::credential::store::CredentialStore;
use crate::error::{Error, Result};

/// Type-filtered adapter over the host's generic credential storage, plus the
/// answer verifier.
///
/// One stateless value per registration; safe to share across requests. No
/// field is mutated after construction.
#[derive(Clone)]
pub struct SecretQuestionCredentialProvider {
    store: Arc<dyn CredentialStore>,
}

impl SecretQuestionCredentialProvider {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn credential_type(&self) -> &'static str {
        CREDENTIAL_TYPE
    }

    #[must_use]
    pub fn supports_credential_type(&self, credential_type: &str) -> bool {
        credential_type == CREDENTIAL_TYPE
    }

    /// Persists a new credential and returns the stored view, id assigned.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] when the host store fails and
    /// [`Error::Serialization`] when a blob cannot be encoded.
    pub async fn create_credential(
        &self,
        user_id: Uuid,
        credential: SecretQuestionCredential,
    ) -> Result<SecretQuestionCredential> {
        let stored = self
            .store
            .create_credential(user_id, credential.to_stored()?)
            .await?;
        SecretQuestionCredential::from_stored(&stored)
    }

    /// Removes a stored credential. Returns `false` when nothing matched.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] when the host store fails.
    pub async fn delete_credential(&self, user_id: Uuid, credential_id: Uuid) -> Result<bool> {
        Ok(self.store.delete_credential(user_id, credential_id).await?)
    }

    /// Whether the user has at least one secret question credential.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] when the host store fails.
    pub async fn is_configured_for(&self, user_id: Uuid) -> Result<bool> {
        let records = self
            .store
            .credentials_by_type(user_id, CREDENTIAL_TYPE)
            .await?;
        Ok(!records.is_empty())
    }

    /// The credential checked when a verification request carries no explicit
    /// id: the highest-priority record, oldest first on ties.
    ///
    /// # Errors
    /// Returns [`Error::NotConfigured`] when the user has no credential of
    /// this type.
    pub async fn default_credential(&self, user_id: Uuid) -> Result<SecretQuestionCredential> {
        let mut records = self
            .store
            .credentials_by_type(user_id, CREDENTIAL_TYPE)
            .await?;
        records.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        let first = records.into_iter().next().ok_or(Error::NotConfigured)?;
        SecretQuestionCredential::from_stored(&first)
    }

    /// Decides whether a submitted answer matches a stored credential.
    ///
    /// Empty answers never match and cause no lookup. Without an explicit id
    /// the default credential is checked. Comparison is exact string equality;
    /// no case folding, trimming, or unicode normalization is applied.
    ///
    /// Pure predicate: no side effects on any state.
    ///
    /// # Errors
    /// Returns [`Error::CredentialNotFound`] when an explicit id does not
    /// resolve, [`Error::NotConfigured`] when a default was needed but the
    /// user has no credential, and [`Error::Storage`] on store failure.
    pub async fn is_valid(
        &self,
        user_id: Uuid,
        credential_id: Option<Uuid>,
        submitted_answer: &str,
    ) -> Result<bool> {
        if submitted_answer.is_empty() {
            debug!("empty secret question answer, no match attempted");
            return Ok(false);
        }

        let credential = match credential_id {
            Some(id) => {
                let stored = self
                    .store
                    .credential_by_id(user_id, id)
                    .await?
                    .ok_or_else(|| Error::CredentialNotFound {
                        credential_id: id.to_string(),
                    })?;
                SecretQuestionCredential::from_stored(&stored)?
            }
            None => self.default_credential(user_id).await?,
        };

        Ok(credential.answer() == submitted_answer)
    }
}
