//! Error taxonomy for the secret question plugin.

use thiserror::Error;

/// Failures surfaced to the invoking flow engine.
///
/// A wrong answer is not an error: the verifier reports it as `Ok(false)` and
/// the challenge step turns it into a failure challenge. Everything here is
/// either a configuration problem, a contract violation, or a store failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The user has no secret question credential and one was required to
    /// resolve a default. Propagated, never swallowed.
    #[error("user has no secret question credential configured")]
    NotConfigured,

    /// An explicit credential id did not resolve to a stored credential.
    #[error("secret question credential {credential_id} not found")]
    CredentialNotFound { credential_id: String },

    /// A stored credential of a different type was handed to this plugin.
    #[error("unsupported credential type {credential_type}")]
    UnsupportedCredentialType { credential_type: String },

    /// The `cookie.max.age` option is present but not a number. This is a
    /// configuration error for the execution, not something to default away.
    #[error("invalid cookie.max.age value: {value:?}")]
    InvalidCookieMaxAge { value: String },

    /// Cookie attributes could not be encoded into a response header.
    #[error("invalid cookie header: {0}")]
    InvalidCookieHeader(#[from] http::header::InvalidHeaderValue),

    /// Malformed credential or secret data blob.
    #[error("credential data error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Host credential store failure, passed through with its context.
    #[error("credential store error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
