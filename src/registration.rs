//! Registration metadata for the host's admin layer.
//!
//! The admin console only needs descriptors: ids, display texts, the
//! configurable options, and which flow requirements the step may take.
//! Factories build the process-wide singleton callback values once at plugin
//! registration.

use std::sync::Arc;

use crate::authenticator::SecretQuestionAuthenticator;
use crate::credential::{CredentialStore, SecretQuestionCredentialProvider, CREDENTIAL_TYPE};
use crate::required_action::SecretQuestionRequiredAction;

/// Provider id of the challenge step.
pub const AUTHENTICATOR_PROVIDER_ID: &str = "secret-question-authenticator";

/// Provider id of the credential provider.
pub const CREDENTIAL_PROVIDER_ID: &str = "secret-question";

/// Provider id of the enrollment required action.
pub const REQUIRED_ACTION_ID: &str = "secret_question_config";

/// Flow requirement choices the admin console may assign to the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Alternative,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPropertyKind {
    Text,
}

/// One configurable option surfaced in the admin console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProperty {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ConfigPropertyKind,
    pub help_text: &'static str,
}

/// Admin-console description of the challenge step.
#[derive(Debug, Clone)]
pub struct AuthenticatorDescriptor {
    pub id: &'static str,
    pub display_type: &'static str,
    pub reference_category: &'static str,
    pub help_text: &'static str,
    pub requirement_choices: &'static [Requirement],
    /// Whether the flow engine may queue the enrollment action for users the
    /// step is not configured for.
    pub user_setup_allowed: bool,
    pub configurable: bool,
    pub config_properties: Vec<ConfigProperty>,
}

/// Admin-console description of the enrollment required action.
#[derive(Debug, Clone)]
pub struct RequiredActionDescriptor {
    pub id: &'static str,
    pub display_text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCategory {
    TwoFactor,
}

/// Account-console metadata for the credential type.
#[derive(Debug, Clone)]
pub struct CredentialTypeMetadata {
    pub credential_type: &'static str,
    pub category: CredentialCategory,
    pub display_name: &'static str,
    pub help_text: &'static str,
    pub create_action: &'static str,
    pub removeable: bool,
}

/// Builds the challenge step singleton and its descriptor.
pub struct SecretQuestionAuthenticatorFactory {
    singleton: Arc<SecretQuestionAuthenticator>,
}

impl SecretQuestionAuthenticatorFactory {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            singleton: Arc::new(SecretQuestionAuthenticator::new(store)),
        }
    }

    /// The shared callback instance; every call returns the same value.
    #[must_use]
    pub fn create(&self) -> Arc<SecretQuestionAuthenticator> {
        Arc::clone(&self.singleton)
    }

    #[must_use]
    pub fn descriptor() -> AuthenticatorDescriptor {
        AuthenticatorDescriptor {
            id: AUTHENTICATOR_PROVIDER_ID,
            display_type: "Secret Question",
            reference_category: "Secret Question",
            help_text: "A secret question that a user has to answer. \
                        i.e. What is your mother's maiden name.",
            requirement_choices: &[
                Requirement::Required,
                Requirement::Alternative,
                Requirement::Disabled,
            ],
            user_setup_allowed: true,
            configurable: true,
            config_properties: vec![ConfigProperty {
                name: crate::authenticator::cookie::CONFIG_COOKIE_MAX_AGE,
                label: "Cookie Max Age",
                kind: ConfigPropertyKind::Text,
                help_text: "Max age in seconds of the SECRET_QUESTION_COOKIE.",
            }],
        }
    }
}

/// Builds the enrollment step singleton and its descriptor.
pub struct SecretQuestionRequiredActionFactory {
    singleton: Arc<SecretQuestionRequiredAction>,
}

impl SecretQuestionRequiredActionFactory {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            singleton: Arc::new(SecretQuestionRequiredAction::new(store)),
        }
    }

    #[must_use]
    pub fn create(&self) -> Arc<SecretQuestionRequiredAction> {
        Arc::clone(&self.singleton)
    }

    #[must_use]
    pub fn descriptor() -> RequiredActionDescriptor {
        RequiredActionDescriptor {
            id: REQUIRED_ACTION_ID,
            display_text: "Secret Question",
        }
    }
}

/// Builds the credential provider and its account-console metadata.
pub struct SecretQuestionCredentialProviderFactory {
    store: Arc<dyn CredentialStore>,
}

impl SecretQuestionCredentialProviderFactory {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn create(&self) -> SecretQuestionCredentialProvider {
        SecretQuestionCredentialProvider::new(Arc::clone(&self.store))
    }

    #[must_use]
    pub fn metadata() -> CredentialTypeMetadata {
        CredentialTypeMetadata {
            credential_type: CREDENTIAL_TYPE,
            category: CredentialCategory::TwoFactor,
            display_name: CREDENTIAL_PROVIDER_ID,
            help_text: "secret-question-text",
            create_action: AUTHENTICATOR_PROVIDER_ID,
            removeable: false,
        }
    }
}
