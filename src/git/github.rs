//! GitHub REST API v3 provider.
//!
//! File content from the contents API stays base64-encoded in `RepoFile`,
//! with the blob SHA stored as `last_commit_id`; updates send it back as
//! `sha`.

use crate::config::{GitSettings, ProviderKind};
use crate::git::error::ProviderError;
use crate::git::provider::{
    BranchInfo, Commit, GitProvider, Project, PrState, PullRequest, RepoFile,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};

const PUBLIC_API: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";

pub struct GitHubProvider {
    client: Client,
}

impl GitHubProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api_base(settings: &GitSettings) -> String {
        match settings.base_url.as_deref() {
            // Enterprise instances serve the API under /api/v3.
            Some(base) => format!("{}/api/v3", base.trim_end_matches('/')),
            None => PUBLIC_API.to_string(),
        }
    }

    fn repo_url(settings: &GitSettings, tail: &str) -> Result<String, ProviderError> {
        let (owner, repo) = parse_owner_repo(&settings.project_id)?;
        Ok(format!(
            "{}/repos/{owner}/{repo}{tail}",
            Self::api_base(settings)
        ))
    }

    fn request(&self, settings: &GitSettings, method: Method, url: String) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header("Accept", ACCEPT)
            .header("User-Agent", "designsync");
        if let Some(token) = &settings.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

/// Split a `owner/repo` project id.
pub(crate) fn parse_owner_repo(project_id: &str) -> Result<(&str, &str), ProviderError> {
    let mut parts = project_id.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(ProviderError::Unknown(format!(
            "invalid GitHub repository '{project_id}', expected owner/repo"
        ))),
    }
}

async fn check(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or(body);
    Err(ProviderError::from_status(status.as_u16(), message))
}

#[derive(Deserialize)]
struct GitHubRepo {
    id: u64,
    name: String,
    full_name: String,
    default_branch: String,
    html_url: String,
}

impl From<GitHubRepo> for Project {
    fn from(r: GitHubRepo) -> Self {
        Project {
            id: r.id.to_string(),
            name: r.name,
            full_name: r.full_name,
            default_branch: r.default_branch,
            web_url: r.html_url,
        }
    }
}

#[derive(Deserialize)]
struct GitHubContent {
    name: String,
    path: String,
    size: u64,
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Deserialize)]
struct GitHubPull {
    id: u64,
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    html_url: String,
    head: GitHubRef,
    base: GitHubRef,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    merged_at: Option<String>,
}

#[derive(Deserialize)]
struct GitHubRef {
    #[serde(rename = "ref")]
    name: String,
}

impl From<GitHubPull> for PullRequest {
    fn from(pr: GitHubPull) -> Self {
        let state = if pr.merged_at.is_some() {
            PrState::Merged
        } else if pr.state == "closed" {
            PrState::Closed
        } else {
            PrState::Open
        };
        PullRequest {
            id: pr.id.to_string(),
            number: pr.number,
            title: pr.title,
            description: pr.body.unwrap_or_default(),
            state,
            web_url: pr.html_url,
            source_branch: pr.head.name,
            target_branch: pr.base.name,
            draft: pr.draft,
        }
    }
}

#[async_trait]
impl GitProvider for GitHubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn get_project(&self, settings: &GitSettings) -> Result<Project, ProviderError> {
        let url = Self::repo_url(settings, "")?;
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;
        let repo: GitHubRepo = response.json().await?;
        Ok(repo.into())
    }

    async fn list_repositories(
        &self,
        settings: &GitSettings,
    ) -> Result<Vec<Project>, ProviderError> {
        let url = format!(
            "{}/user/repos?per_page=100&sort=updated",
            Self::api_base(settings)
        );
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;
        let repos: Vec<GitHubRepo> = response.json().await?;
        Ok(repos.into_iter().map(Project::from).collect())
    }

    async fn list_branches(
        &self,
        settings: &GitSettings,
    ) -> Result<Vec<BranchInfo>, ProviderError> {
        let default_branch = self.get_project(settings).await?.default_branch;
        let url = Self::repo_url(settings, "/branches?per_page=100")?;
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;

        #[derive(Deserialize)]
        struct Branch {
            name: String,
        }
        let branches: Vec<Branch> = response.json().await?;
        Ok(branches
            .into_iter()
            .map(|b| BranchInfo {
                is_default: b.name == default_branch,
                name: b.name,
            })
            .collect())
    }

    async fn create_branch(
        &self,
        settings: &GitSettings,
        branch: &str,
        base: &str,
    ) -> Result<(), ProviderError> {
        let ref_url = Self::repo_url(settings, &format!("/git/refs/heads/{base}"))?;
        debug!("GET {ref_url}");
        let response = check(self.request(settings, Method::GET, ref_url).send().await?).await?;

        #[derive(Deserialize)]
        struct RefObject {
            object: RefSha,
        }
        #[derive(Deserialize)]
        struct RefSha {
            sha: String,
        }
        let base_ref: RefObject = response.json().await?;

        let url = Self::repo_url(settings, "/git/refs")?;
        debug!("POST {url} (branch {branch} from {base})");
        let result = check(
            self.request(settings, Method::POST, url)
                .json(&json!({
                    "ref": format!("refs/heads/{branch}"),
                    "sha": base_ref.object.sha,
                }))
                .send()
                .await?,
        )
        .await;

        match result {
            Ok(_) => Ok(()),
            // 422 "Reference already exists" means idempotent success.
            Err(ProviderError::Api {
                status: Some(422),
                message,
            }) if message.to_lowercase().contains("already exists") => {
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
            "{}?ref={reference}",
            Self::repo_url(settings, &format!("/contents/{path}"))?
        );
        debug!("GET {url}");
        let response = self.request(settings, Method::GET, url).send().await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let content: GitHubContent = check(response).await?.json().await?;
        Ok(Some(RepoFile {
            file_name: content.name,
            file_path: content.path,
            size: content.size,
            encoding: if content.encoding.is_empty() {
                "base64".to_string()
            } else {
                content.encoding
            },
            content: content.content,
            last_commit_id: content.sha,
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
        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": branch,
        });
        if let Some(existing) = prior {
            body["sha"] = json!(existing.last_commit_id);
        }

        let url = Self::repo_url(settings, &format!("/contents/{path}"))?;
        debug!(
            "PUT {url} ({} on {branch})",
            if prior.is_some() { "update" } else { "create" }
        );
        let response = check(
            self.request(settings, Method::PUT, url)
                .json(&body)
                .send()
                .await?,
        )
        .await?;

        #[derive(Deserialize)]
        struct PutResponse {
            commit: CommitInfo,
        }
        #[derive(Deserialize)]
        struct CommitInfo {
            sha: String,
            message: String,
            html_url: String,
        }
        let put: PutResponse = response.json().await?;
        let title = put
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Commit {
            id: put.commit.sha,
            title,
            message: put.commit.message,
            web_url: put.commit.html_url,
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
        let url = Self::repo_url(settings, "/pulls")?;
        debug!("POST {url} ({source_branch} -> {target_branch})");
        let response = check(
            self.request(settings, Method::POST, url)
                .json(&json!({
                    "title": title,
                    "body": description,
                    "head": source_branch,
                    "base": target_branch,
                    "draft": draft,
                }))
                .send()
                .await?,
        )
        .await?;
        let pr: GitHubPull = response.json().await?;
        Ok(pr.into())
    }

    async fn find_existing_pull_request(
        &self,
        settings: &GitSettings,
        source_branch: &str,
    ) -> Result<Option<PullRequest>, ProviderError> {
        let (owner, _) = parse_owner_repo(&settings.project_id)?;
        let url = format!(
            "{}?state=open&head={owner}:{source_branch}",
            Self::repo_url(settings, "/pulls")?
        );
        debug!("GET {url}");
        let response = check(self.request(settings, Method::GET, url).send().await?).await?;
        let mut open: Vec<GitHubPull> = response.json().await?;
        Ok((!open.is_empty()).then(|| open.remove(0).into()))
    }
}
