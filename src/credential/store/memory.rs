//! In-memory credential storage.
//!
//! Keeps credentials in a process-local map. Useful for tests and for
//! embedding the plugin without a database; records are lost on restart.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::credential::models::StoredCredential;
use crate::credential::store::CredentialStore;

/// `RwLock`-backed [`CredentialStore`] keyed by user id.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<HashMap<Uuid, Vec<StoredCredential>>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_credential(
        &self,
        user_id: Uuid,
        mut credential: StoredCredential,
    ) -> Result<StoredCredential> {
        credential.id = Some(Uuid::new_v4());
        let mut credentials = self
            .credentials
            .write()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        credentials
            .entry(user_id)
            .or_default()
            .push(credential.clone());
        Ok(credential)
    }

    async fn delete_credential(&self, user_id: Uuid, credential_id: Uuid) -> Result<bool> {
        let mut credentials = self
            .credentials
            .write()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        let Some(records) = credentials.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id != Some(credential_id));
        Ok(records.len() < before)
    }

    async fn credentials_by_type(
        &self,
        user_id: Uuid,
        credential_type: &str,
    ) -> Result<Vec<StoredCredential>> {
        let credentials = self
            .credentials
            .read()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        Ok(credentials
            .get(&user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.credential_type == credential_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn credential_by_id(
        &self,
        user_id: Uuid,
        credential_id: Uuid,
    ) -> Result<Option<StoredCredential>> {
        let credentials = self
            .credentials
            .read()
            .map_err(|_| anyhow!("credential store lock poisoned"))?;
        Ok(credentials
            .get(&user_id)
            .and_then(|records| records.iter().find(|record| record.id == Some(credential_id)))
            .cloned())
    }
}
