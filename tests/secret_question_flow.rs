//! End-to-end walk through the secret question flow: a user with no
//! credential is sent to enrollment, answers the challenge, and is bypassed
//! on the next login by the issued cookie.

use std::collections::HashMap;
use std::sync::Arc;

use http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use uuid::Uuid;

use secret_question::authenticator::{ERROR_BAD_SECRET, TEMPLATE_SECRET_QUESTION};
use secret_question::credential::{CredentialStore, InMemoryCredentialStore};
use secret_question::registration::{
    SecretQuestionAuthenticatorFactory, SecretQuestionRequiredActionFactory, REQUIRED_ACTION_ID,
};
use secret_question::required_action::ENROLLMENT_QUESTION;
use secret_question::{
    AuthenticationOutcome, Authenticator, FlowContext, FlowError, FormChallenge, Realm,
    RequiredAction, RequiredActionOutcome, User,
};

fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[tokio::test]
async fn enroll_verify_and_bypass() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let authenticator =
        SecretQuestionAuthenticatorFactory::new(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .create();
    let enrollment =
        SecretQuestionRequiredActionFactory::new(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .create();

    let realm = Realm::new("acme");
    let mut user = User::new(Uuid::new_v4(), "alice");

    // The step does not apply yet; the flow engine is told to enroll first.
    assert!(authenticator.requires_user());
    assert!(!authenticator.configured_for(&user).await.unwrap());
    authenticator.set_required_actions(&mut user);
    assert_eq!(user.required_actions, vec![REQUIRED_ACTION_ID.to_string()]);

    // Enrollment renders its form, then persists the answer under the fixed
    // question.
    let mut context = FlowContext::new(realm.clone(), user.clone());
    let outcome = enrollment.challenge(&mut context).await.unwrap();
    assert!(matches!(outcome, RequiredActionOutcome::Challenge(_)));

    let mut context = FlowContext::new(realm.clone(), user.clone())
        .with_form_data(form(&[("secret_answer", "blue")]));
    let outcome = enrollment.process_action(&mut context).await.unwrap();
    assert_eq!(outcome, RequiredActionOutcome::Success);

    let credential = enrollment
        .provider()
        .default_credential(user.id)
        .await
        .unwrap();
    assert_eq!(credential.question(), ENROLLMENT_QUESTION);
    assert_eq!(credential.answer(), "blue");
    assert!(authenticator.configured_for(&user).await.unwrap());

    // First login: no cookie, so the question is rendered.
    let mut context = FlowContext::new(realm.clone(), user.clone());
    let outcome = authenticator.authenticate(&mut context).await.unwrap();
    assert_eq!(
        outcome,
        AuthenticationOutcome::Challenge(FormChallenge::new(TEMPLATE_SECRET_QUESTION))
    );

    // A wrong answer re-challenges with the error code and no cookie.
    let mut context = FlowContext::new(realm.clone(), user.clone())
        .with_form_data(form(&[("secret_answer", "green")]));
    let outcome = authenticator.action(&mut context).await.unwrap();
    assert_eq!(
        outcome,
        AuthenticationOutcome::FailureChallenge {
            error: FlowError::InvalidCredentials,
            form: FormChallenge::new(TEMPLATE_SECRET_QUESTION).with_error(ERROR_BAD_SECRET),
        }
    );
    assert!(context.response_headers().get(SET_COOKIE).is_none());

    // The right answer succeeds and issues exactly one bypass cookie with the
    // configured lifetime.
    let mut context = FlowContext::new(realm.clone(), user.clone())
        .with_form_data(form(&[("secret_answer", "blue")]))
        .with_config(form(&[("cookie.max.age", "3600")]));
    let outcome = authenticator.action(&mut context).await.unwrap();
    assert_eq!(outcome, AuthenticationOutcome::Success);

    let cookies: Vec<_> = context
        .response_headers()
        .get_all(SET_COOKIE)
        .iter()
        .collect();
    assert_eq!(cookies.len(), 1);
    assert_eq!(
        cookies[0].to_str().unwrap(),
        "SECRET_QUESTION_ANSWERED=true; Path=/realms/acme; Max-Age=3600; HttpOnly; SameSite=None"
    );

    // Next login carries the cookie back and the question is skipped.
    let mut headers = HeaderMap::new();
    headers.append(
        COOKIE,
        HeaderValue::from_static("SECRET_QUESTION_ANSWERED=true"),
    );
    let mut context =
        FlowContext::new(realm.clone(), user.clone()).with_request_headers(headers);
    let outcome = authenticator.authenticate(&mut context).await.unwrap();
    assert_eq!(outcome, AuthenticationOutcome::Success);
    assert!(context.response_headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn explicit_credential_id_selects_among_multiple_records() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let authenticator =
        SecretQuestionAuthenticatorFactory::new(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .create();

    let realm = Realm::new("acme");
    let user = User::new(Uuid::new_v4(), "bob");

    let provider = authenticator.provider();
    provider
        .create_credential(
            user.id,
            secret_question::SecretQuestionCredential::new("Q1", "first"),
        )
        .await
        .unwrap();
    let newer = provider
        .create_credential(
            user.id,
            secret_question::SecretQuestionCredential::new("Q2", "second"),
        )
        .await
        .unwrap();

    // Without an id the default (older, equal priority) record is checked,
    // so the newer record's answer does not match.
    let mut context = FlowContext::new(realm.clone(), user.clone())
        .with_form_data(form(&[("secret_answer", "second")]));
    let outcome = authenticator.action(&mut context).await.unwrap();
    assert!(matches!(
        outcome,
        AuthenticationOutcome::FailureChallenge { .. }
    ));

    // An explicit id overrides the default resolution.
    let id = newer.id().unwrap().to_string();
    let mut context = FlowContext::new(realm, user).with_form_data(form(&[
        ("secret_answer", "second"),
        ("credentialId", id.as_str()),
    ]));
    let outcome = authenticator.action(&mut context).await.unwrap();
    assert_eq!(outcome, AuthenticationOutcome::Success);
}
