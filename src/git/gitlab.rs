//! GitLab REST API v4 provider.

use crate::config::{GitSettings, ProviderKind};
use crate::git::error::ProviderError;
use crate::git::provider::{
    BranchInfo, Commit, GitProvider, Project, PrState, PullRequest, RepoFile,
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};

const PUBLIC_API: &str = "https://gitlab.com/api/v4";

pub struct GitLabProvider {
    client: Client,
}

impl GitLabProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api_base(settings: &GitSettings) -> String {
        match settings.base_url.as_deref() {
            Some(base) => format!("{}/api/v4", base.trim_end_matches('/')),
            None => PUBLIC_API.to_string(),
        }
    }

    fn project_url(settings: &GitSettings, tail: &str) -> String {
        format!(
            "{}/projects/{}{}",
            Self::api_base(settings),
            encode_path(&settings.project_id),
            tail
        )
    }

    fn request(
        &self,
        settings: &GitSettings,
        method: Method,
        url: String,
    ) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &settings.token {
            builder = builder.header("PRIVATE-TOKEN", token);
        }
        builder
    }
}

/// Percent-encode one path segment. GitLab accepts `namespace/project` as a
/// project id only with the slash encoded.
pub(crate) fn encode_path(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

async fn check(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::from_status(status.as_u16(), error_message(&body)))
}

/// Pull a usable message out of a GitLab error body. `message` may be a
/// string, an object of field errors, or absent entirely.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    let message = value.get("message").or_else(|| value.get("error"));
    match message {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

#[derive(Deserialize)]
struct GitLabProject {
    id: u64,
    name: String,
    path_with_namespace: String,
    default_branch: Option<String>,
    web_url: String,
}

impl From<GitLabProject> for Project {
    fn from(p: GitLabProject) -> Self {
        Project {
            id: p.id.to_string(),
            name: p.name,
            full_name: p.path_with_namespace,
            default_branch: p.default_branch.unwrap_or_else(|| "main".to_string()),
            web_url: p.web_url,
        }
    }
}

#[derive(Deserialize)]
struct GitLabFile {
    file_name: String,
    file_path: String,
    size: u64,
    encoding: String,
    content: String,
    last_commit_id: String,
}

#[derive(Deserialize)]
struct GitLabCommit {
    id: String,
    title: String,
    message: String,
    web_url: String,
}

#[derive(Deserialize)]
struct GitLabMergeRequest {
    id: u64,
    iid: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    state: String,
    web_url: String,
    source_branch: String,
    target_branch: String,
    #[serde(default)]
    draft: bool,
}

impl From<GitLabMergeRequest> for PullRequest {
    fn from(mr: GitLabMergeRequest) -> Self {
        PullRequest {
            id: mr.id.to_string(),
            number: mr.iid,
            title: mr.title,
            description: mr.description.unwrap_or_default(),
            state: match mr.state.as_str() {
                "merged" => PrState::Merged,
                "closed" | "locked" => PrState::Closed,
                _ => PrState::Open,
            },
            web_url: mr.web_url,
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            draft: mr.draft,
        }
    }
}

#[async_trait]
impl GitProvider for GitLabProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitlab
    }

    async fn get_project(&self, settings: &GitSettings) -> Result<Project, ProviderError> {
        let url = Self::project_url(settings, "");
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;
        let project: GitLabProject = response.json().await?;
        Ok(project.into())
    }

    async fn list_repositories(
        &self,
        _settings: &GitSettings,
    ) -> Result<Vec<Project>, ProviderError> {
        Err(ProviderError::Unsupported("listing repositories"))
    }

    async fn list_branches(
        &self,
        _settings: &GitSettings,
    ) -> Result<Vec<BranchInfo>, ProviderError> {
        Err(ProviderError::Unsupported("listing branches"))
    }

    async fn create_branch(
        &self,
        settings: &GitSettings,
        branch: &str,
        base: &str,
    ) -> Result<(), ProviderError> {
        let url = Self::project_url(settings, "/repository/branches");
        debug!("POST {url} (branch {branch} from {base})");
        let result = check(
            self.request(settings, Method::POST, url)
                .json(&json!({ "branch": branch, "ref": base }))
                .send()
                .await?,
        )
        .await;

        match result {
            Ok(_) => Ok(()),
            // Idempotent: an existing branch is success.
            Err(ProviderError::Api { message, .. }) if message.contains("already exists") => {
                debug!("branch {branch} already exists");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn get_file(
        &self,
        settings: &GitSettings,
        path: &str,
        reference: &str,
    ) -> Result<Option<RepoFile>, ProviderError> {
        let url = format!(
            "{}?ref={}",
            Self::project_url(settings, &format!("/repository/files/{}", encode_path(path))),
            encode_path(reference)
        );
        debug!("GET {url}");
        let response = self.request(settings, Method::GET, url).send().await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let file: GitLabFile = check(response).await?.json().await?;
        Ok(Some(RepoFile {
            file_name: file.file_name,
            file_path: file.file_path,
            size: file.size,
            encoding: file.encoding,
            content: file.content,
            last_commit_id: file.last_commit_id,
        }))
    }

    async fn commit_file(
        &self,
        settings: &GitSettings,
        message: &str,
        path: &str,
        content: &str,
        branch: &str,
        prior: Option<&RepoFile>,
    ) -> Result<Commit, ProviderError> {
        let mut action = json!({
            "action": if prior.is_some() { "update" } else { "create" },
            "file_path": path,
            "content": content,
        });
        if let Some(existing) = prior {
            action["last_commit_id"] = json!(existing.last_commit_id);
        }

        let url = Self::project_url(settings, "/repository/commits");
        debug!("POST {url} ({} {path} on {branch})", action["action"]);
        let response = check(
            self.request(settings, Method::POST, url)
                .json(&json!({
                    "branch": branch,
                    "commit_message": message,
                    "actions": [action],
                }))
                .send()
                .await?,
        )
        .await?;
        let commit: GitLabCommit = response.json().await?;
        Ok(Commit {
            id: commit.id,
            title: commit.title,
            message: commit.message,
            web_url: commit.web_url,
        })
    }

    async fn create_pull_request(
        &self,
        settings: &GitSettings,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
        draft: bool,
    ) -> Result<PullRequest, ProviderError> {
        let title = if draft {
            format!("Draft: {title}")
        } else {
            title.to_string()
        };
        let url = Self::project_url(settings, "/merge_requests");
        debug!("POST {url} ({source_branch} -> {target_branch})");
        let response = check(
            self.request(settings, Method::POST, url)
                .json(&json!({
                    "source_branch": source_branch,
                    "target_branch": target_branch,
                    "title": title,
                    "description": description,
                    "remove_source_branch": true,
                    "squash": true,
                }))
                .send()
                .await?,
        )
        .await?;
        let mr: GitLabMergeRequest = response.json().await?;
        Ok(mr.into())
    }

    async fn find_existing_pull_request(
        &self,
        settings: &GitSettings,
        source_branch: &str,
    ) -> Result<Option<PullRequest>, ProviderError> {
        let url = format!(
            "{}?source_branch={}&state=opened",
            Self::project_url(settings, "/merge_requests"),
            encode_path(source_branch)
        );
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;
        let mut open: Vec<GitLabMergeRequest> = response.json().await?;
        Ok((!open.is_empty()).then(|| open.remove(0).into()))
    }
}
