//! Shared fixtures: snapshot builders, an in-memory document, and a fake
//! Git provider that records every call it receives.
#![allow(dead_code)]

use async_trait::async_trait;
use designsync::config::{GitSettings, ProviderKind};
use designsync::core::{NodeSnapshot, Paint, Rgb, VariableInfo};
use designsync::document::{DocumentSource, PageInfo};
use designsync::git::{
    BranchInfo, Commit, GitProvider, Project, ProviderError, PrState, PullRequest, RepoFile,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn node(id: &str) -> NodeSnapshot {
    NodeSnapshot {
        id: id.to_string(),
        name: format!("Node {id}"),
        ..Default::default()
    }
}

pub fn solid_fill(r: f64, g: f64, b: f64) -> Paint {
    Paint {
        color: Some(Rgb { r, g, b }),
        ..Default::default()
    }
}

/// In-memory document with fixed pages.
pub struct FakeDocument {
    pub current_page: PageInfo,
    pub pages: Vec<(PageInfo, Vec<NodeSnapshot>)>,
    pub variables: Vec<VariableInfo>,
}

impl FakeDocument {
    pub fn single_page(nodes: Vec<NodeSnapshot>) -> Self {
        let page = PageInfo {
            id: "page:1".into(),
            name: "Page 1".into(),
        };
        Self {
            current_page: page.clone(),
            pages: vec![(page, nodes)],
            variables: Vec::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for FakeDocument {
    async fn pages(&self) -> anyhow::Result<Vec<PageInfo>> {
        Ok(self.pages.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn current_page(&self) -> anyhow::Result<PageInfo> {
        Ok(self.current_page.clone())
    }

    async fn container_nodes(&self, page_id: &str) -> anyhow::Result<Vec<String>> {
        let (_, nodes) = self
            .pages
            .iter()
            .find(|(p, _)| p.id == page_id)
            .ok_or_else(|| anyhow::anyhow!("unknown page {page_id}"))?;
        Ok(nodes.iter().map(|n| n.id.clone()).collect())
    }

    async fn node_snapshot(&self, node_id: &str) -> anyhow::Result<NodeSnapshot> {
        self.pages
            .iter()
            .flat_map(|(_, nodes)| nodes.iter())
            .find(|n| n.id == node_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown node {node_id}"))
    }

    async fn variables(&self) -> anyhow::Result<Vec<VariableInfo>> {
        Ok(self.variables.clone())
    }
}

#[derive(Clone, Debug)]
pub struct RecordedCommit {
    pub action: &'static str,
    pub path: String,
    pub branch: String,
    pub content: String,
}

#[derive(Default)]
pub struct FakeState {
    pub branches: Vec<String>,
    pub branch_create_calls: usize,
    pub files: HashMap<(String, String), RepoFile>,
    pub commits: Vec<RecordedCommit>,
    pub pulls: Vec<PullRequest>,
    pub pr_create_calls: usize,
    pub project_error: Option<ProviderError>,
}

/// Provider backed by in-memory state; every mutation is recorded.
#[derive(Default)]
pub struct FakeProvider {
    pub state: Mutex<FakeState>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_project(error: ProviderError) -> Self {
        let provider = Self::new();
        provider.state.lock().unwrap().project_error = Some(error);
        provider
    }

    /// Seed a file on a branch so the next commit is an update.
    pub fn seed_file(&self, branch: &str, path: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(
            (branch.to_string(), path.to_string()),
            RepoFile {
                file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
                file_path: path.to_string(),
                size: content.len() as u64,
                encoding: "text".into(),
                content: content.to_string(),
                last_commit_id: "seed-commit".into(),
            },
        );
    }

    pub fn seed_open_pull(&self, source_branch: &str, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.pulls.push(PullRequest {
            id: "1".into(),
            number: 1,
            title: "existing".into(),
            description: String::new(),
            state: PrState::Open,
            web_url: url.to_string(),
            source_branch: source_branch.to_string(),
            target_branch: "main".into(),
            draft: false,
        });
    }
}

pub fn fake_settings() -> GitSettings {
    GitSettings {
        provider: ProviderKind::Gitlab,
        project_id: "acme/design".into(),
        token: Some("test-token".into()),
        ..Default::default()
    }
}

#[async_trait]
impl GitProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitlab
    }

    async fn get_project(&self, _settings: &GitSettings) -> Result<Project, ProviderError> {
        if let Some(err) = self.state.lock().unwrap().project_error.take() {
            return Err(err);
        }
        Ok(Project {
            id: "42".into(),
            name: "design".into(),
            full_name: "acme/design".into(),
            default_branch: "main".into(),
            web_url: "https://example.com/acme/design".into(),
        })
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
        let state = self.state.lock().unwrap();
        Ok(state
            .branches
            .iter()
            .map(|name| BranchInfo {
                name: name.clone(),
                is_default: name == "main",
            })
            .collect())
    }

    async fn create_branch(
        &self,
        _settings: &GitSettings,
        branch: &str,
        _base: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.branch_create_calls += 1;
        if !state.branches.iter().any(|b| b == branch) {
            state.branches.push(branch.to_string());
        }
        Ok(())
    }

    async fn get_file(
        &self,
        _settings: &GitSettings,
        path: &str,
        reference: &str,
    ) -> Result<Option<RepoFile>, ProviderError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .files
            .get(&(reference.to_string(), path.to_string()))
            .cloned())
    }

    async fn commit_file(
        &self,
        _settings: &GitSettings,
        _message: &str,
        path: &str,
        content: &str,
        branch: &str,
        prior: Option<&RepoFile>,
    ) -> Result<Commit, ProviderError> {
        let mut state = self.state.lock().unwrap();
        let action = if prior.is_some() { "update" } else { "create" };
        state.commits.push(RecordedCommit {
            action,
            path: path.to_string(),
            branch: branch.to_string(),
            content: content.to_string(),
        });
        let id = format!("commit-{}", state.commits.len());
        state.files.insert(
            (branch.to_string(), path.to_string()),
            RepoFile {
                file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
                file_path: path.to_string(),
                size: content.len() as u64,
                encoding: "text".into(),
                content: content.to_string(),
                last_commit_id: id.clone(),
            },
        );
        Ok(Commit {
            id,
            title: "commit".into(),
            message: "commit".into(),
            web_url: "https://example.com/commit".into(),
        })
    }

    async fn create_pull_request(
        &self,
        _settings: &GitSettings,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: &str,
        draft: bool,
    ) -> Result<PullRequest, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.pr_create_calls += 1;
        let number = state.pulls.len() as u64 + 1;
        let pr = PullRequest {
            id: number.to_string(),
            number,
            title: title.to_string(),
            description: description.to_string(),
            state: PrState::Open,
            web_url: format!("https://example.com/acme/design/pulls/{number}"),
            source_branch: source_branch.to_string(),
            target_branch: target_branch.to_string(),
            draft,
        };
        state.pulls.push(pr.clone());
        Ok(pr)
    }

    async fn find_existing_pull_request(
        &self,
        _settings: &GitSettings,
        source_branch: &str,
    ) -> Result<Option<PullRequest>, ProviderError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pulls
            .iter()
            .find(|pr| pr.source_branch == source_branch && pr.state == PrState::Open)
            .cloned())
    }
}
