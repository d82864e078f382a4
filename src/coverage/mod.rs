//! Token coverage rule engine.
//!
//! Walks container nodes in a scope and reports every hard-coded style value
//! that could be a design token, aggregated by `(category, property, value)`
//! and ranked by occurrence count. A scan either completes or fails as a
//! whole; partial results are never returned.

pub mod appearance;
pub mod collector;
pub mod layout;
pub mod matching;
pub mod paint;
pub mod score;
pub mod sizing;

use crate::core::{
    CoverageResult, ExportFormat, NodeKind, NodeSnapshot, ScanScope, SubScores, VariableInfo,
};
use crate::document::{DocumentSource, PageInfo};
use anyhow::Result;
use collector::IssueCollector;
use log::debug;
use score::ContainerStats;
use std::sync::Arc;

/// Coverage analyzer over an injected document capability.
pub struct CoverageEngine {
    source: Arc<dyn DocumentSource>,
    export_format: ExportFormat,
}

impl CoverageEngine {
    pub fn new(source: Arc<dyn DocumentSource>, export_format: ExportFormat) -> Self {
        Self {
            source,
            export_format,
        }
    }

    /// Run a scan over the requested scope.
    pub async fn analyze(&self, scope: ScanScope) -> Result<CoverageResult> {
        match scope {
            ScanScope::CurrentPage => {
                let page = self.source.current_page().await?;
                self.analyze_pages(&[page]).await
            }
            ScanScope::Document => {
                let pages = self.source.pages().await?;
                self.analyze_pages(&pages).await
            }
            ScanScope::Smart => self.analyze_smart().await,
        }
    }

    /// Smart scope: the current page wins if it has issues; otherwise the
    /// first other page with issues; otherwise the clean current-page result.
    async fn analyze_smart(&self) -> Result<CoverageResult> {
        let current = self.source.current_page().await?;
        let current_result = self.analyze_pages(&[current.clone()]).await?;
        if current_result.total_issues > 0 {
            return Ok(current_result);
        }

        for page in self.source.pages().await? {
            if page.id == current.id {
                continue;
            }
            let result = self.analyze_pages(std::slice::from_ref(&page)).await?;
            if result.total_issues > 0 {
                debug!("smart scan fell through to page '{}'", page.name);
                return Ok(result);
            }
        }

        Ok(current_result)
    }

    async fn analyze_pages(&self, pages: &[PageInfo]) -> Result<CoverageResult> {
        let variables = self.source.variables().await?;
        debug!("analyzing {} page(s), {} variables", pages.len(), variables.len());

        let mut collector = IssueCollector::new();
        let mut stats = ContainerStats::default();
        let mut total_nodes = 0usize;

        for page in pages {
            for node_id in self.source.container_nodes(&page.id).await? {
                let node = self.source.node_snapshot(&node_id).await?;
                total_nodes += 1;
                tally_container(&node, &mut stats);
                analyze_node(&node, &mut collector);
            }
        }

        for issue in collector.issues_mut() {
            issue.matching_variables =
                matching::find_matching_variables(&issue.value, issue.category, &variables);
        }

        Ok(assemble_result(
            collector,
            total_nodes,
            stats,
            &variables,
            self.export_format,
        ))
    }
}

/// Run all four detector passes over one node. Nodes nested inside instances
/// are skipped; only the instance itself is analyzed.
pub fn analyze_node(node: &NodeSnapshot, collector: &mut IssueCollector) {
    if node.is_inside_instance() {
        return;
    }
    layout::check_layout(node, collector);
    paint::check_fills(node, collector);
    paint::check_strokes(node, collector);
    appearance::check_appearance(node, collector);
}

fn tally_container(node: &NodeSnapshot, stats: &mut ContainerStats) {
    match node.kind {
        NodeKind::Instance => stats.instance_count += 1,
        NodeKind::Frame | NodeKind::Component | NodeKind::ComponentSet => stats.frame_count += 1,
        _ => return,
    }
    if node.layout_mode.is_auto_layout() {
        stats.auto_layout_count += 1;
    }
}

fn assemble_result(
    collector: IssueCollector,
    total_nodes: usize,
    stats: ContainerStats,
    variables: &[VariableInfo],
    export_format: ExportFormat,
) -> CoverageResult {
    let total_issues = collector.len();
    let total_occurrences = collector.total_occurrences();

    let sub_scores = SubScores {
        token_coverage: score::token_coverage_score(total_nodes, total_occurrences),
        tailwind_readiness: score::tailwind_readiness_score(variables),
        component_hygiene: score::component_hygiene_score(stats),
        variable_hygiene: score::variable_hygiene_score(variables),
        layout_hygiene: score::layout_hygiene_score(stats),
    };
    let (quality_score, weights) = score::weighted_score(sub_scores, export_format);

    CoverageResult {
        total_nodes,
        total_issues,
        issues_by_category: collector.into_categorized(),
        quality_score,
        sub_scores,
        weights,
    }
}
