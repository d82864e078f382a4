mod common;

use common::{fake_settings, FakeProvider};
use designsync::git::workflow::{commit_component_test, commit_workflow};
use designsync::git::{ErrorKind, GitProvider, ProviderError};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn first_commit_creates_file_and_opens_pull_request() {
    let provider = FakeProvider::new();
    let settings = fake_settings();

    let outcome = commit_workflow(
        &provider,
        &settings,
        "chore: update design tokens",
        "src/tokens.css",
        ":root { --spacing-md: 16px; }",
        "design-tokens-update",
    )
    .await
    .unwrap();

    let state = provider.state.lock().unwrap();
    assert_eq!(state.branches, vec!["design-tokens-update"]);
    assert_eq!(state.commits.len(), 1);
    assert_eq!(state.commits[0].action, "create");
    assert_eq!(state.commits[0].path, "src/tokens.css");
    assert_eq!(state.pr_create_calls, 1);
    assert!(outcome.pull_request_url.is_some());
}

#[tokio::test]
async fn second_commit_updates_and_reuses_open_pull_request() {
    let provider = FakeProvider::new();
    let settings = fake_settings();
    provider.seed_file("design-tokens-update", "src/tokens.css", "old");
    provider.seed_open_pull("design-tokens-update", "https://example.com/pr/1");

    let outcome = commit_workflow(
        &provider,
        &settings,
        "chore: update design tokens",
        "src/tokens.css",
        "new",
        "design-tokens-update",
    )
    .await
    .unwrap();

    let state = provider.state.lock().unwrap();
    assert_eq!(state.commits[0].action, "update");
    assert_eq!(state.pr_create_calls, 0);
    assert_eq!(
        outcome.pull_request_url.as_deref(),
        Some("https://example.com/pr/1")
    );
}

#[tokio::test]
async fn repeated_runs_are_idempotent_on_branch_and_pull_request() {
    let provider = FakeProvider::new();
    let settings = fake_settings();

    for _ in 0..3 {
        commit_workflow(
            &provider,
            &settings,
            "chore: update design tokens",
            "src/tokens.css",
            "content",
            "design-tokens-update",
        )
        .await
        .unwrap();
    }

    let state = provider.state.lock().unwrap();
    assert_eq!(state.branches.len(), 1);
    assert_eq!(state.branch_create_calls, 3);
    assert_eq!(state.pr_create_calls, 1);
    assert_eq!(state.commits[0].action, "create");
    assert_eq!(state.commits[1].action, "update");
    assert_eq!(state.commits[2].action, "update");
}

#[tokio::test]
async fn missing_token_fails_as_auth_before_any_call() {
    let provider = FakeProvider::new();
    let mut settings = fake_settings();
    settings.token = None;

    let err = commit_workflow(
        &provider,
        &settings,
        "msg",
        "src/tokens.css",
        "content",
        "branch",
    )
    .await
    .unwrap_err();

    assert_eq!(err.error_type, ErrorKind::Auth);
    assert!(provider.state.lock().unwrap().commits.is_empty());
}

#[tokio::test]
async fn provider_auth_failure_classifies_with_operation_context() {
    let provider =
        FakeProvider::failing_project(ProviderError::from_status(401, "unauthorized".into()));
    let settings = fake_settings();

    let err = commit_workflow(
        &provider,
        &settings,
        "msg",
        "src/tokens.css",
        "content",
        "branch",
    )
    .await
    .unwrap_err();

    assert_eq!(err.error_type, ErrorKind::Auth);
    assert!(err.message.contains("fetch the project"));

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["errorType"], "auth");
}

#[tokio::test]
async fn component_test_commit_templates_path_and_branch() {
    let provider = FakeProvider::new();
    let settings = fake_settings();

    let outcome = commit_component_test(
        &provider,
        &settings,
        "Button / Primary",
        "describe('Button / Primary', () => {});",
    )
    .await
    .unwrap();

    assert_eq!(outcome.branch, "design-tests-button-primary");
    let state = provider.state.lock().unwrap();
    assert_eq!(state.commits[0].path, "components/button-primary.spec.ts");
    assert_eq!(state.commits[0].branch, "design-tests-button-primary");
    assert_eq!(state.pr_create_calls, 1);
}

#[tokio::test]
async fn component_name_without_alphanumerics_is_rejected() {
    let provider = FakeProvider::new();
    let settings = fake_settings();

    let err = commit_component_test(&provider, &settings, "///", "content")
        .await
        .unwrap_err();
    assert_eq!(err.error_type, ErrorKind::Unknown);
}

#[tokio::test]
async fn credential_validation_never_errors() {
    let settings = fake_settings();

    let good = FakeProvider::new();
    assert!(good.validate_credentials(&settings).await);

    let bad =
        FakeProvider::failing_project(ProviderError::from_status(401, "unauthorized".into()));
    assert!(!bad.validate_credentials(&settings).await);
}

#[tokio::test]
async fn unsupported_repository_listing_surfaces_as_api_error() {
    let provider = FakeProvider::new();
    let settings = fake_settings();

    let err = provider.list_repositories(&settings).await.unwrap_err();
    assert!(matches!(err, ProviderError::Unsupported(_)));

    let failure = designsync::git::classify(err, "list repositories");
    assert_eq!(failure.error_type, ErrorKind::Api);
    assert!(failure.message.contains("does not support"));
}
