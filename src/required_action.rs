//! Enrollment step: one-time required action creating the credential.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::credential::{CredentialStore, SecretQuestionCredential, SecretQuestionCredentialProvider};
use crate::error::Result;
use crate::flow::{
    FlowContext, FormChallenge, RequiredAction, RequiredActionOutcome, FORM_FIELD_SECRET_ANSWER,
};

/// Login theme template rendering the enrollment form.
pub const TEMPLATE_SECRET_QUESTION_CONFIG: &str = "secret-question-config.ftl";

/// The question every enrollment uses. The prompt is fixed, only the answer
/// is user-chosen.
pub const ENROLLMENT_QUESTION: &str = "What is your mom's first name?";

/// Required-action callback the flow engine runs for users without a secret
/// question credential, when self-setup is allowed.
///
/// Repeated enrollment is not prevented: each submission creates another
/// record and default-credential resolution decides which one gets checked.
pub struct SecretQuestionRequiredAction {
    provider: SecretQuestionCredentialProvider,
}

impl SecretQuestionRequiredAction {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            provider: SecretQuestionCredentialProvider::new(store),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &SecretQuestionCredentialProvider {
        &self.provider
    }
}

#[async_trait]
impl RequiredAction for SecretQuestionRequiredAction {
    async fn challenge(&self, _context: &mut FlowContext) -> Result<RequiredActionOutcome> {
        Ok(RequiredActionOutcome::Challenge(FormChallenge::new(
            TEMPLATE_SECRET_QUESTION_CONFIG,
        )))
    }

    async fn process_action(&self, context: &mut FlowContext) -> Result<RequiredActionOutcome> {
        // A missing field enrolls an empty answer, which can never verify;
        // the form contract makes the field mandatory.
        let answer = context.form_value(FORM_FIELD_SECRET_ANSWER).unwrap_or("");
        let credential = SecretQuestionCredential::new(ENROLLMENT_QUESTION, answer);
        let created = self
            .provider
            .create_credential(context.user.id, credential)
            .await?;
        debug!(
            user = %context.user.username,
            credential_id = ?created.id(),
            "enrolled secret question credential"
        );
        Ok(RequiredActionOutcome::Success)
    }
}
