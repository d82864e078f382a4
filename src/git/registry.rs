//! Provider registry.
//!
//! Providers are constructed once, sharing a single HTTP client, and looked
//! up by kind. Construction is explicit so tests can build registries with
//! their own clients.

use crate::config::ProviderKind;
use crate::git::github::GitHubProvider;
use crate::git::gitlab::GitLabProvider;
use crate::git::provider::GitProvider;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn GitProvider>>,
}

impl ProviderRegistry {
    /// Registry with both built-in providers over a shared client.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn GitProvider>> = HashMap::new();
        providers.insert(
            ProviderKind::Gitlab,
            Arc::new(GitLabProvider::new(client.clone())),
        );
        providers.insert(ProviderKind::Github, Arc::new(GitHubProvider::new(client)));
        Self { providers }
    }

    pub fn get(&self, kind: ProviderKind) -> Arc<dyn GitProvider> {
        // Both kinds are registered in every constructor.
        Arc::clone(&self.providers[&kind])
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
