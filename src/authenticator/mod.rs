//! Challenge step: verify the secret question or skip it on a bypass cookie.

pub mod cookie;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::credential::{CredentialStore, SecretQuestionCredentialProvider};
use crate::error::{Error, Result};
use crate::flow::{
    AuthenticationOutcome, Authenticator, FlowContext, FlowError, FormChallenge, User,
    FORM_FIELD_CREDENTIAL_ID, FORM_FIELD_SECRET_ANSWER,
};
use crate::registration::REQUIRED_ACTION_ID;

use cookie::{has_bypass_cookie, set_bypass_cookie};

/// Login theme template rendering the question prompt.
pub const TEMPLATE_SECRET_QUESTION: &str = "secret-question.ftl";

/// Error code the form renderer shows on a wrong answer.
pub const ERROR_BAD_SECRET: &str = "badSecret";

/// The authentication-flow callback for the secret question step.
///
/// One stateless value per registration, shared across unrelated requests;
/// all mutable state is request-scoped or lives in the host store.
pub struct SecretQuestionAuthenticator {
    provider: SecretQuestionCredentialProvider,
}

impl SecretQuestionAuthenticator {
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

    /// Pulls the answer and optional credential id out of the submission and
    /// runs the verifier. An absent or empty `credentialId` field resolves to
    /// the default credential.
    async fn validate_answer(&self, context: &FlowContext) -> Result<bool> {
        let answer = context.form_value(FORM_FIELD_SECRET_ANSWER).unwrap_or("");
        let credential_id = match context.form_value(FORM_FIELD_CREDENTIAL_ID) {
            Some(raw) if !raw.is_empty() => {
                Some(Uuid::parse_str(raw).map_err(|_| Error::CredentialNotFound {
                    credential_id: raw.to_string(),
                })?)
            }
            _ => None,
        };
        self.provider
            .is_valid(context.user.id, credential_id, answer)
            .await
    }
}

#[async_trait]
impl Authenticator for SecretQuestionAuthenticator {
    // The question belongs to a specific user, so identity comes first.
    fn requires_user(&self) -> bool {
        true
    }

    async fn configured_for(&self, user: &User) -> Result<bool> {
        self.provider.is_configured_for(user.id).await
    }

    fn set_required_actions(&self, user: &mut User) {
        user.add_required_action(REQUIRED_ACTION_ID);
    }

    /// Renders the prompt, or succeeds outright when the bypass cookie is
    /// present. Never processes a submission.
    async fn authenticate(&self, context: &mut FlowContext) -> Result<AuthenticationOutcome> {
        if has_bypass_cookie(context) {
            return Ok(AuthenticationOutcome::Success);
        }
        Ok(AuthenticationOutcome::Challenge(FormChallenge::new(
            TEMPLATE_SECRET_QUESTION,
        )))
    }

    async fn action(&self, context: &mut FlowContext) -> Result<AuthenticationOutcome> {
        if !self.validate_answer(context).await? {
            debug!(user = %context.user.username, "wrong secret question answer");
            return Ok(AuthenticationOutcome::FailureChallenge {
                error: FlowError::InvalidCredentials,
                form: FormChallenge::new(TEMPLATE_SECRET_QUESTION).with_error(ERROR_BAD_SECRET),
            });
        }
        set_bypass_cookie(context)?;
        Ok(AuthenticationOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{InMemoryCredentialStore, SecretQuestionCredential};
    use http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
    use std::collections::HashMap;

    fn authenticator() -> SecretQuestionAuthenticator {
        SecretQuestionAuthenticator::new(Arc::new(InMemoryCredentialStore::new()))
    }

    fn context() -> FlowContext {
        FlowContext::new(
            crate::flow::Realm::new("test"),
            User::new(Uuid::new_v4(), "alice"),
        )
    }

    fn answer_form(answer: &str) -> HashMap<String, String> {
        HashMap::from([(FORM_FIELD_SECRET_ANSWER.to_string(), answer.to_string())])
    }

    #[tokio::test]
    async fn renders_the_question_without_a_cookie() {
        let outcome = authenticator().authenticate(&mut context()).await.unwrap();
        assert_eq!(
            outcome,
            AuthenticationOutcome::Challenge(FormChallenge::new(TEMPLATE_SECRET_QUESTION))
        );
    }

    #[tokio::test]
    async fn bypass_cookie_skips_the_question_for_any_user_state() {
        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_static("SECRET_QUESTION_ANSWERED=true"),
        );
        // No credential enrolled at all: the cookie alone decides.
        let mut context = context().with_request_headers(headers);
        let outcome = authenticator().authenticate(&mut context).await.unwrap();
        assert_eq!(outcome, AuthenticationOutcome::Success);
        assert!(context.response_headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn correct_answer_succeeds_and_issues_one_cookie() {
        let authenticator = authenticator();
        let user = User::new(Uuid::new_v4(), "alice");
        authenticator
            .provider()
            .create_credential(user.id, SecretQuestionCredential::new("Q", "tuxedo"))
            .await
            .unwrap();

        let mut context = FlowContext::new(crate::flow::Realm::new("test"), user)
            .with_form_data(answer_form("tuxedo"));
        let outcome = authenticator.action(&mut context).await.unwrap();

        assert_eq!(outcome, AuthenticationOutcome::Success);
        let cookies: Vec<_> = context
            .response_headers()
            .get_all(SET_COOKIE)
            .iter()
            .collect();
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].to_str().unwrap().contains("Max-Age=2592000"));
    }

    #[tokio::test]
    async fn wrong_answer_rechallenges_with_the_error_code() {
        let authenticator = authenticator();
        let mut context = context().with_form_data(answer_form("wrong"));
        authenticator
            .provider()
            .create_credential(context.user.id, SecretQuestionCredential::new("Q", "right"))
            .await
            .unwrap();

        let outcome = authenticator.action(&mut context).await.unwrap();
        assert_eq!(
            outcome,
            AuthenticationOutcome::FailureChallenge {
                error: FlowError::InvalidCredentials,
                form: FormChallenge::new(TEMPLATE_SECRET_QUESTION).with_error(ERROR_BAD_SECRET),
            }
        );
        assert!(context.response_headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn missing_answer_is_a_plain_no_match() {
        let authenticator = authenticator();
        let mut context = context();
        authenticator
            .provider()
            .create_credential(context.user.id, SecretQuestionCredential::new("Q", "right"))
            .await
            .unwrap();

        let outcome = authenticator.action(&mut context).await.unwrap();
        assert!(matches!(
            outcome,
            AuthenticationOutcome::FailureChallenge { .. }
        ));
    }

    #[tokio::test]
    async fn unparseable_credential_id_is_not_found() {
        let authenticator = authenticator();
        let mut context = context().with_form_data(HashMap::from([
            (FORM_FIELD_SECRET_ANSWER.to_string(), "x".to_string()),
            (FORM_FIELD_CREDENTIAL_ID.to_string(), "not-a-uuid".to_string()),
        ]));
        let err = authenticator.action(&mut context).await.unwrap_err();
        assert!(matches!(
            err,
            Error::CredentialNotFound { credential_id } if credential_id == "not-a-uuid"
        ));
    }

    #[tokio::test]
    async fn bad_cookie_config_fails_after_a_correct_answer() {
        let authenticator = authenticator();
        let mut context = context()
            .with_form_data(answer_form("right"))
            .with_config(HashMap::from([(
                cookie::CONFIG_COOKIE_MAX_AGE.to_string(),
                "forever".to_string(),
            )]));
        authenticator
            .provider()
            .create_credential(context.user.id, SecretQuestionCredential::new("Q", "right"))
            .await
            .unwrap();

        let err = authenticator.action(&mut context).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCookieMaxAge { .. }));
    }

    #[tokio::test]
    async fn directs_unconfigured_users_to_enrollment() {
        let authenticator = authenticator();
        let mut user = User::new(Uuid::new_v4(), "alice");
        assert!(!authenticator.configured_for(&user).await.unwrap());

        authenticator.set_required_actions(&mut user);
        assert_eq!(user.required_actions, vec![REQUIRED_ACTION_ID.to_string()]);
    }
}
