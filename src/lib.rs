//! Secret question second factor for identity and access management servers.
//!
//! The host server owns the authentication flow engine, credential
//! persistence, form rendering, and the admin console; this crate supplies
//! the callback implementations for one credential type:
//!
//! - [`credential`]: the `SECRET_QUESTION` record model, the
//!   [`CredentialStore`] contract the host implements, and the provider that
//!   adapts and verifies against it.
//! - [`authenticator`]: the challenge step. It skips the question when the
//!   bypass cookie is present, renders the prompt otherwise, and on a correct
//!   submission issues the cookie and reports success.
//! - [`required_action`]: the enrollment step run for users without a
//!   credential.
//! - [`registration`]: factories and the descriptors the host's admin layer
//!   shows.
//!
//! Wiring it up:
//!
//! ```
//! use std::sync::Arc;
//! use secret_question::credential::InMemoryCredentialStore;
//! use secret_question::registration::SecretQuestionAuthenticatorFactory;
//!
//! let store = Arc::new(InMemoryCredentialStore::new());
//! let factory = SecretQuestionAuthenticatorFactory::new(store);
//! let authenticator = factory.create();
//! # let _ = authenticator;
//! ```
//!
//! Answers are stored in plaintext and compared with exact string equality,
//! matching the credential type this implements; the bypass cookie is not
//! bound to a user or verification event. Both are documented tradeoffs of
//! the design, not extension points.

pub mod authenticator;
pub mod credential;
pub mod error;
pub mod flow;
pub mod registration;
pub mod required_action;

pub use authenticator::SecretQuestionAuthenticator;
pub use credential::{
    CredentialStore, SecretQuestionCredential, SecretQuestionCredentialProvider, StoredCredential,
};
pub use error::{Error, Result};
pub use flow::{
    AuthenticationOutcome, Authenticator, FlowContext, FlowError, FormChallenge, Realm,
    RequiredAction, RequiredActionOutcome, User,
};
pub use required_action::SecretQuestionRequiredAction;
