//! Secret question credential: record model, host storage contract, and the
//! store adapter plus verifier built on top of it.

pub mod models;
pub mod provider;
pub mod store;

pub use models::{
    SecretQuestionCredential, SecretQuestionCredentialData, SecretQuestionSecretData,
    StoredCredential, CREDENTIAL_TYPE,
};
pub use provider::SecretQuestionCredentialProvider;
pub use store::{CredentialStore, InMemoryCredentialStore};
