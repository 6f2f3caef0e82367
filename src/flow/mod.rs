//! Contracts shared with the host's authentication flow engine.
//!
//! The flow engine owns step sequencing, retries, and lockout policy. It hands
//! each callback a [`FlowContext`] carrying the established user, the decoded
//! request, and the factory-configured options, and consumes the outcome. Form
//! rendering stays host-side: a challenge outcome names the template to render
//! and an optional error code, nothing more.

use std::collections::HashMap;

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use uuid::Uuid;

use crate::error::Result;

/// Form field carrying the submitted answer.
pub const FORM_FIELD_SECRET_ANSWER: &str = "secret_answer";

/// Optional form field selecting which credential to check.
pub const FORM_FIELD_CREDENTIAL_ID: &str = "credentialId";

/// The slice of the host's user model these callbacks need.
///
/// The principal is established upstream; this plugin never discovers
/// identity.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// One-time setup actions the flow engine still has to run for this user.
    pub required_actions: Vec<String>,
}

impl User {
    #[must_use]
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            required_actions: Vec::new(),
        }
    }

    /// Queues a required action unless it is already pending.
    pub fn add_required_action(&mut self, action_id: &str) {
        if !self.required_actions.iter().any(|id| id == action_id) {
            self.required_actions.push(action_id.to_string());
        }
    }
}

/// Realm (tenant) the current request belongs to.
#[derive(Debug, Clone)]
pub struct Realm {
    pub name: String,
}

impl Realm {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Base path cookies are scoped to, `/realms/{name}`.
    #[must_use]
    pub fn base_path(&self) -> String {
        format!("/realms/{}", self.name)
    }
}

/// Per-request context the flow engine dispatches callbacks with.
#[derive(Debug, Clone)]
pub struct FlowContext {
    pub realm: Realm,
    pub user: User,
    request_headers: HeaderMap,
    form_data: HashMap<String, String>,
    config: HashMap<String, String>,
    response_headers: HeaderMap,
}

impl FlowContext {
    #[must_use]
    pub fn new(realm: Realm, user: User) -> Self {
        Self {
            realm,
            user,
            request_headers: HeaderMap::new(),
            form_data: HashMap::new(),
            config: HashMap::new(),
            response_headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn with_request_headers(mut self, headers: HeaderMap) -> Self {
        self.request_headers = headers;
        self
    }

    /// Decoded form fields of the current submission.
    #[must_use]
    pub fn with_form_data(mut self, form_data: HashMap<String, String>) -> Self {
        self.form_data = form_data;
        self
    }

    /// Options configured for this execution in the admin layer.
    #[must_use]
    pub fn with_config(mut self, config: HashMap<String, String>) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn form_value(&self, field: &str) -> Option<&str> {
        self.form_data.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Value of the named cookie on the incoming request, if any.
    #[must_use]
    pub fn request_cookie(&self, name: &str) -> Option<String> {
        for header in self.request_headers.get_all(COOKIE) {
            let Ok(value) = header.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                let key = parts.next()?.trim();
                let val = parts.next().unwrap_or("").trim();
                if key == name {
                    return Some(val.to_string());
                }
            }
        }
        None
    }

    /// Injects a header into the response the host will send.
    pub fn add_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.append(name, value);
    }

    #[must_use]
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }
}

/// What the host's form renderer needs to build a challenge page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormChallenge {
    /// Template name within the host's login theme.
    pub template: String,
    /// Error code for the renderer to annotate the form with.
    pub error: Option<String>,
}

impl FormChallenge {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Failure kind reported to the flow engine; retry and lockout policy stay
/// with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    InvalidCredentials,
}

/// Outcome of a challenge step invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// The step passed; the engine moves on.
    Success,
    /// Blocking response: render the form and wait for a submission.
    Challenge(FormChallenge),
    /// Recoverable failure: re-render the form and report the failure kind.
    FailureChallenge {
        error: FlowError,
        form: FormChallenge,
    },
}

/// Outcome of a required action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredActionOutcome {
    Challenge(FormChallenge),
    Success,
}

/// Authentication step callbacks invoked by the flow engine.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Whether a principal must be established before this step runs.
    fn requires_user(&self) -> bool;

    /// Whether this step applies to the user at all.
    async fn configured_for(&self, user: &User) -> Result<bool>;

    /// Queues the setup actions a not-yet-configured user has to run through,
    /// when the host allows self-setup.
    fn set_required_actions(&self, user: &mut User);

    /// First call into the step: skip, or render the challenge.
    async fn authenticate(&self, context: &mut FlowContext) -> Result<AuthenticationOutcome>;

    /// Processes the form submission for a previously rendered challenge.
    async fn action(&self, context: &mut FlowContext) -> Result<AuthenticationOutcome>;
}

/// Required action (one-time enrollment) callbacks.
#[async_trait]
pub trait RequiredAction: Send + Sync {
    /// Renders the enrollment form.
    async fn challenge(&self, context: &mut FlowContext) -> Result<RequiredActionOutcome>;

    /// Processes the enrollment form submission.
    async fn process_action(&self, context: &mut FlowContext) -> Result<RequiredActionOutcome>;
}
