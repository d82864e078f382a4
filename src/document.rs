//! Document collaborator boundary.
//!
//! The coverage engine never touches the host document directly; it consumes
//! this capability trait, injected at construction. Production hosts adapt
//! their document API behind it, and tests substitute in-memory fakes. The
//! bundled [`JsonDocument`] reads a serialized document snapshot, which is
//! what the CLI feeds the engine.

use crate::core::{NodeSnapshot, VariableInfo};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A page of the document, as enumerated for scope resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub name: String,
}

/// Read access to the visual document. Every method is a suspension point;
/// the engine fetches one snapshot per node it visits.
///
/// No write access is required; the engine only observes.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// All pages, in document order.
    async fn pages(&self) -> Result<Vec<PageInfo>>;

    /// The page currently open in the host tool.
    async fn current_page(&self) -> Result<PageInfo>;

    /// Ids of the container nodes (frames, components, component sets,
    /// instances) on one page.
    async fn container_nodes(&self, page_id: &str) -> Result<Vec<String>>;

    /// Full style/geometry snapshot for one node.
    async fn node_snapshot(&self, node_id: &str) -> Result<NodeSnapshot>;

    /// All local variables with resolved default-mode values.
    async fn variables(&self) -> Result<Vec<VariableInfo>>;
}

/// Serialized document snapshot format accepted by the CLI.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub current_page_id: Option<String>,
    pub pages: Vec<PageSnapshot>,
    pub variables: Vec<VariableInfo>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSnapshot {
    pub id: String,
    pub name: String,
    pub nodes: Vec<NodeSnapshot>,
}

/// In-memory [`DocumentSource`] backed by a [`DocumentSnapshot`].
pub struct JsonDocument {
    pages: Vec<PageInfo>,
    current_page_id: String,
    nodes_by_page: HashMap<String, Vec<String>>,
    nodes: HashMap<String, NodeSnapshot>,
    variables: Vec<VariableInfo>,
}

impl JsonDocument {
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Result<Self> {
        if snapshot.pages.is_empty() {
            return Err(anyhow!("document snapshot contains no pages"));
        }

        let pages: Vec<PageInfo> = snapshot
            .pages
            .iter()
            .map(|p| PageInfo {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();

        let current_page_id = snapshot
            .current_page_id
            .unwrap_or_else(|| pages[0].id.clone());
        if !pages.iter().any(|p| p.id == current_page_id) {
            return Err(anyhow!("current page '{current_page_id}' not found in snapshot"));
        }

        let mut nodes_by_page = HashMap::new();
        let mut nodes = HashMap::new();
        for page in snapshot.pages {
            let ids: Vec<String> = page.nodes.iter().map(|n| n.id.clone()).collect();
            nodes_by_page.insert(page.id.clone(), ids);
            for node in page.nodes {
                nodes.insert(node.id.clone(), node);
            }
        }

        Ok(Self {
            pages,
            current_page_id,
            nodes_by_page,
            nodes,
            variables: snapshot.variables,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document snapshot {}", path.display()))?;
        let snapshot: DocumentSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("invalid document snapshot {}", path.display()))?;
        Self::from_snapshot(snapshot)
    }
}

#[async_trait]
impl DocumentSource for JsonDocument {
    async fn pages(&self) -> Result<Vec<PageInfo>> {
        Ok(self.pages.clone())
    }

    async fn current_page(&self) -> Result<PageInfo> {
        self.pages
            .iter()
            .find(|p| p.id == self.current_page_id)
            .cloned()
            .ok_or_else(|| anyhow!("current page disappeared from snapshot"))
    }

    async fn container_nodes(&self, page_id: &str) -> Result<Vec<String>> {
        self.nodes_by_page
            .get(page_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown page id '{page_id}'"))
    }

    async fn node_snapshot(&self, node_id: &str) -> Result<NodeSnapshot> {
        self.nodes
            .get(node_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown node id '{node_id}'"))
    }

    async fn variables(&self) -> Result<Vec<VariableInfo>> {
        Ok(self.variables.clone())
    }
}
