//! Credential record model.
//!
//! The host stores credentials as generic rows with two JSON blobs: a
//! `credential_data` blob with externalizable fields and a `secret_data` blob
//! that is never displayed or logged. [`SecretQuestionCredential`] is the typed
//! view over such a row for the `SECRET_QUESTION` type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Type discriminator for secret question credentials.
pub const CREDENTIAL_TYPE: &str = "SECRET_QUESTION";

/// Generic credential row as persisted by the host's credential storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Store-assigned identifier, `None` until the record has been created.
    pub id: Option<Uuid>,
    pub credential_type: String,
    /// Display label, editable by the owning user, never used in matching.
    pub user_label: Option<String>,
    pub created_at: DateTime<Utc>,
    /// JSON blob with externalizable fields.
    pub credential_data: String,
    /// JSON blob with secret fields. Never displayed, never logged.
    pub secret_data: String,
    /// Ordering hint used to pick a default when the user has several
    /// credentials of the same type.
    pub priority: i32,
}

/// Externalizable part of a secret question credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretQuestionCredentialData {
    pub question: String,
}

/// Secret part of a secret question credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretQuestionSecretData {
    pub answer: String,
}

// Keep the answer out of debug output and logs.
impl fmt::Debug for SecretQuestionSecretData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretQuestionSecretData")
            .field("answer", &"[redacted]")
            .finish()
    }
}

/// Typed view over a stored `SECRET_QUESTION` credential.
#[derive(Debug, Clone)]
pub struct SecretQuestionCredential {
    id: Option<Uuid>,
    user_label: Option<String>,
    created_at: DateTime<Utc>,
    priority: i32,
    credential_data: SecretQuestionCredentialData,
    secret_data: SecretQuestionSecretData,
}

impl SecretQuestionCredential {
    /// Builds a new, not yet persisted credential from a question and answer.
    ///
    /// The id stays unset until the store assigns one on creation.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: None,
            user_label: None,
            created_at: Utc::now(),
            priority: 0,
            credential_data: SecretQuestionCredentialData {
                question: question.into(),
            },
            secret_data: SecretQuestionSecretData {
                answer: answer.into(),
            },
        }
    }

    /// Parses the typed view out of a generic stored row.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedCredentialType`] for rows of another type
    /// and [`Error::Serialization`] when either JSON blob is malformed.
    pub fn from_stored(stored: &StoredCredential) -> Result<Self> {
        if stored.credential_type != CREDENTIAL_TYPE {
            return Err(Error::UnsupportedCredentialType {
                credential_type: stored.credential_type.clone(),
            });
        }
        let credential_data: SecretQuestionCredentialData =
            serde_json::from_str(&stored.credential_data)?;
        let secret_data: SecretQuestionSecretData = serde_json::from_str(&stored.secret_data)?;
        Ok(Self {
            id: stored.id,
            user_label: stored.user_label.clone(),
            created_at: stored.created_at,
            priority: stored.priority,
            credential_data,
            secret_data,
        })
    }

    /// Serializes the typed view back into the generic row shape.
    ///
    /// Both blobs are written together so a record is never partially
    /// serialized.
    ///
    /// # Errors
    /// Returns [`Error::Serialization`] if either blob cannot be encoded.
    pub fn to_stored(&self) -> Result<StoredCredential> {
        Ok(StoredCredential {
            id: self.id,
            credential_type: CREDENTIAL_TYPE.to_string(),
            user_label: self.user_label.clone(),
            created_at: self.created_at,
            credential_data: serde_json::to_string(&self.credential_data)?,
            secret_data: serde_json::to_string(&self.secret_data)?,
            priority: self.priority,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    #[must_use]
    pub fn user_label(&self) -> Option<&str> {
        self.user_label.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.credential_data.question
    }

    /// The stored answer. Callers compare it, they do not log it.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.secret_data.answer
    }

    #[must_use]
    pub fn with_user_label(mut self, label: impl Into<String>) -> Self {
        self.user_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}
