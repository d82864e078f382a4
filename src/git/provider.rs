//! Provider-neutral Git API contract.
//!
//! Wire types here are normalized: each provider maps its own response shapes
//! into these before returning, so the workflow layer never sees provider
//! JSON. GitHub file content stays base64-encoded in [`RepoFile::content`]
//! with the blob SHA carried in `last_commit_id`, mirroring GitLab's field.

use crate::config::{GitSettings, ProviderKind};
use crate::git::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A repository as reported by the provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
    pub web_url: String,
}

/// File metadata and content at a ref.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepoFile {
    pub file_name: String,
    pub file_path: String,
    pub size: u64,
    pub encoding: String,
    pub content: String,
    /// GitLab: last commit touching the file. GitHub: the blob SHA, which
    /// the contents API requires for updates.
    pub last_commit_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub title: String,
    pub message: String,
    pub web_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub description: String,
    pub state: PrState,
    pub web_url: String,
    pub source_branch: String,
    pub target_branch: String,
    pub draft: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub is_default: bool,
}

/// One Git hosting backend. All operations take the full settings so a
/// provider instance stays stateless and shareable.
#[async_trait]
pub trait GitProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether the stored credentials can reach the configured project.
    /// Never errors; any failure reads as invalid credentials.
    async fn validate_credentials(&self, settings: &GitSettings) -> bool {
        self.get_project(settings).await.is_ok()
    }

    async fn get_project(&self, settings: &GitSettings) -> Result<Project, ProviderError>;

    /// Repositories visible to the token. Not every provider exposes this.
    async fn list_repositories(&self, settings: &GitSettings)
        -> Result<Vec<Project>, ProviderError>;

    async fn list_branches(&self, settings: &GitSettings)
        -> Result<Vec<BranchInfo>, ProviderError>;

    /// Create `branch` from `base`. Succeeds if the branch already exists.
    async fn create_branch(
        &self,
        settings: &GitSettings,
        branch: &str,
        base: &str,
    ) -> Result<(), ProviderError>;

    /// Fetch a file at a ref. `Ok(None)` when the file does not exist.
    async fn get_file(
        &self,
        settings: &GitSettings,
        path: &str,
        reference: &str,
    ) -> Result<Option<RepoFile>, ProviderError>;

    /// Create or update a file on `branch`. `prior` carries the existing
    /// file when there is one; its presence selects update over create.
    async fn commit_file(
        &self,
        settings: &GitSettings,
        message: &str,
        path: &str,
        content: &str,
        branch: &str,
        prior: Option<&RepoFile>,
    ) -> Result<Commit, ProviderError>;

    async fn create_pull_request(
        &self,
        settings: &GitSettings,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
        draft: bool,
    ) -> Result<PullRequest, ProviderError>;

    /// The open pull request from `source_branch`, if any.
    async fn find_existing_pull_request(
        &self,
        settings: &GitSettings,
        source_branch: &str,
    ) -> Result<Option<PullRequest>, ProviderError>;
}
