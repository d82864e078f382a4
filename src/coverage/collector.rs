//! Issue aggregation for coverage scans.
//!
//! Issues are keyed by `(category, property, value)` and merged
//! commutatively: visiting nodes in any order yields the same counts and
//! membership, only the append-ordered occurrence lists differ.

use crate::core::{Category, CoverageIssue, NodeSnapshot};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct IssueKey {
    category: Category,
    property: String,
    value: String,
}

/// Accumulates issues during one scan; discarded at scan end.
#[derive(Default)]
pub struct IssueCollector {
    issues: BTreeMap<IssueKey, CoverageIssue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of a hard-coded value on `node`.
    pub fn record(
        &mut self,
        node: &NodeSnapshot,
        category: Category,
        property: &str,
        value: String,
    ) {
        let key = IssueKey {
            category,
            property: property.to_string(),
            value: value.clone(),
        };
        let frame = node.frame_name();

        let issue = self.issues.entry(key).or_insert_with(|| CoverageIssue {
            property: property.to_string(),
            value,
            count: 0,
            node_ids: Vec::new(),
            node_names: Vec::new(),
            node_frames: Vec::new(),
            category,
            matching_variables: Vec::new(),
        });
        issue.count += 1;
        issue.node_ids.push(node.id.clone());
        issue.node_names.push(node.name.clone());
        issue.node_frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Total occurrences across all issues (sum of counts).
    pub fn total_occurrences(&self) -> usize {
        self.issues.values().map(|i| i.count).sum()
    }

    /// Drain into per-category lists sorted by count descending. The sort is
    /// stable, so ties keep key order.
    pub fn into_categorized(self) -> BTreeMap<Category, Vec<CoverageIssue>> {
        let mut by_category: BTreeMap<Category, Vec<CoverageIssue>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        for (_, issue) in self.issues {
            by_category
                .entry(issue.category)
                .or_default()
                .push(issue);
        }
        for issues in by_category.values_mut() {
            issues.sort_by(|a, b| b.count.cmp(&a.count));
        }
        by_category
    }

    pub fn issues_mut(&mut self) -> impl Iterator<Item = &mut CoverageIssue> {
        self.issues.values_mut()
    }
}
