//! Commit workflow orchestration.
//!
//! A workflow runs as a fixed sequence against one provider: resolve the
//! project, ensure the feature branch, check whether the file exists, commit
//! (create or update), then ensure an open pull request. Every provider error
//! is classified here, at the boundary, so callers only ever see
//! [`CommitFailure`].

use crate::config::GitSettings;
use crate::git::error::{classify, CommitFailure};
use crate::git::provider::GitProvider;
use log::{debug, info};
use serde::Serialize;

const PR_DESCRIPTION: &str =
    "Automatically created pull request for design token updates.";
const TEST_PR_DESCRIPTION: &str =
    "Automatically created pull request for generated component tests.";

/// Successful workflow result.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub commit_id: String,
    pub branch: String,
    /// URL of the open pull request, reused when one already existed.
    pub pull_request_url: Option<String>,
}

/// Commit `content` to `file_path` on `branch` and ensure an open pull
/// request back to the default branch.
pub async fn commit_workflow(
    provider: &dyn GitProvider,
    settings: &GitSettings,
    message: &str,
    file_path: &str,
    content: &str,
    branch: &str,
) -> Result<CommitOutcome, CommitFailure> {
    validate_inputs(settings, message, file_path, branch)?;

    let project = provider
        .get_project(settings)
        .await
        .map_err(|e| classify(e, "fetch the project"))?;
    debug!(
        "project {} resolved, default branch {}",
        project.full_name, project.default_branch
    );

    provider
        .create_branch(settings, branch, &project.default_branch)
        .await
        .map_err(|e| classify(e, "create the branch"))?;

    let prior = provider
        .get_file(settings, file_path, branch)
        .await
        .map_err(|e| classify(e, "check the file"))?;
    debug!(
        "{file_path} {} on {branch}",
        if prior.is_some() { "exists" } else { "does not exist" }
    );

    let commit = provider
        .commit_file(settings, message, file_path, content, branch, prior.as_ref())
        .await
        .map_err(|e| classify(e, "commit the file"))?;
    info!("committed {} to {branch}", commit.id);

    let pull_request_url =
        ensure_pull_request(provider, settings, branch, &project.default_branch, message, PR_DESCRIPTION)
            .await?;

    Ok(CommitOutcome {
        commit_id: commit.id,
        branch: branch.to_string(),
        pull_request_url,
    })
}

/// Commit a generated component test. The file path comes from the test file
/// template with `{componentName}` substituted, and each component gets its
/// own branch under the configured test branch prefix.
pub async fn commit_component_test(
    provider: &dyn GitProvider,
    settings: &GitSettings,
    component_name: &str,
    content: &str,
) -> Result<CommitOutcome, CommitFailure> {
    let normalized = normalize_component_name(component_name);
    if normalized.is_empty() {
        return Err(CommitFailure::unknown(
            "Component name must contain at least one letter or digit.",
        ));
    }

    let file_path = settings
        .test_file_template()
        .replace("{componentName}", &normalized);
    let branch = format!("{}-{normalized}", settings.test_branch());
    let message = format!("test: add generated test for {component_name}");

    validate_inputs(settings, &message, &file_path, &branch)?;

    let project = provider
        .get_project(settings)
        .await
        .map_err(|e| classify(e, "fetch the project"))?;

    provider
        .create_branch(settings, &branch, &project.default_branch)
        .await
        .map_err(|e| classify(e, "create the branch"))?;

    let prior = provider
        .get_file(settings, &file_path, &branch)
        .await
        .map_err(|e| classify(e, "check the file"))?;

    let commit = provider
        .commit_file(settings, &message, &file_path, content, &branch, prior.as_ref())
        .await
        .map_err(|e| classify(e, "commit the file"))?;
    info!("committed {} to {branch}", commit.id);

    let pull_request_url = ensure_pull_request(
        provider,
        settings,
        &branch,
        &project.default_branch,
        &message,
        TEST_PR_DESCRIPTION,
    )
    .await?;

    Ok(CommitOutcome {
        commit_id: commit.id,
        branch,
        pull_request_url,
    })
}

/// Reuse the open pull request for `branch` or create one.
async fn ensure_pull_request(
    provider: &dyn GitProvider,
    settings: &GitSettings,
    branch: &str,
    target: &str,
    title: &str,
    description: &str,
) -> Result<Option<String>, CommitFailure> {
    let existing = provider
        .find_existing_pull_request(settings, branch)
        .await
        .map_err(|e| classify(e, "look up the pull request"))?;

    if let Some(pr) = existing {
        debug!("reusing open pull request #{}", pr.number);
        return Ok(Some(pr.web_url));
    }

    let pr = provider
        .create_pull_request(settings, branch, target, title, description, false)
        .await
        .map_err(|e| classify(e, "create the pull request"))?;
    info!("opened pull request #{}", pr.number);
    Ok(Some(pr.web_url))
}

fn validate_inputs(
    settings: &GitSettings,
    message: &str,
    file_path: &str,
    branch: &str,
) -> Result<(), CommitFailure> {
    if settings.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(CommitFailure::auth(
            "No access token configured. Please add a token in the settings.",
        ));
    }
    if settings.project_id.trim().is_empty() {
        return Err(CommitFailure::unknown("Project ID must not be empty."));
    }
    for (name, value) in [
        ("commit message", message),
        ("file path", file_path),
        ("branch name", branch),
    ] {
        if value.trim().is_empty() {
            return Err(CommitFailure::unknown(format!(
                "The {name} must not be empty."
            )));
        }
    }
    Ok(())
}

/// Lowercase a display name and collapse anything non-alphanumeric into
/// single hyphens. `"Button / Primary"` becomes `"button-primary"`.
pub fn normalize_component_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}
