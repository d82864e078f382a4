//! Remote Git integration: provider contract, GitLab and GitHub backends,
//! and the commit workflow that drives them.

pub mod error;
pub mod github;
pub mod gitlab;
pub mod provider;
pub mod registry;
pub mod workflow;

pub use error::{classify, CommitFailure, ErrorKind, ProviderError};
pub use provider::{BranchInfo, Commit, GitProvider, Project, PrState, PullRequest, RepoFile};
pub use registry::ProviderRegistry;
pub use workflow::{commit_component_test, commit_workflow, CommitOutcome};
