//! Layout detector pass: sizing constraints, auto-layout gap, and padding.

use super::collector::IssueCollector;
use super::sizing::{is_height_dynamic, is_width_dynamic};
use crate::core::{format_px, BoundProperty, Category, NodeSnapshot};

/// Numeric property that is present, non-zero, and not token-bound.
fn reportable(node: &NodeSnapshot, value: Option<f64>, bound_as: BoundProperty) -> Option<f64> {
    let value = value?;
    if value == 0.0 || node.is_bound(bound_as) {
        return None;
    }
    Some(value)
}

pub fn check_layout(node: &NodeSnapshot, collector: &mut IssueCollector) {
    let record = |collector: &mut IssueCollector, property: &str, value: f64| {
        collector.record(node, Category::Layout, property, format_px(value));
    };

    if let Some(v) = reportable(node, node.min_width, BoundProperty::MinWidth) {
        record(collector, "Min Width", v);
    }
    if let Some(v) = reportable(node, node.max_width, BoundProperty::MaxWidth) {
        record(collector, "Max Width", v);
    }
    if let Some(v) = reportable(node, node.width, BoundProperty::Width) {
        if !is_width_dynamic(node) {
            record(collector, "Width", v);
        }
    }
    if let Some(v) = reportable(node, node.height, BoundProperty::Height) {
        if !is_height_dynamic(node) {
            record(collector, "Height", v);
        }
    }
    if let Some(v) = reportable(node, node.min_height, BoundProperty::MinHeight) {
        record(collector, "Min Height", v);
    }
    if let Some(v) = reportable(node, node.max_height, BoundProperty::MaxHeight) {
        record(collector, "Max Height", v);
    }

    // Gap and padding only apply to auto-layout containers.
    if !node.layout_mode.is_auto_layout() {
        return;
    }

    if let Some(v) = reportable(node, node.item_spacing, BoundProperty::ItemSpacing) {
        record(collector, "Gap", v);
    }

    if let Some(padding) = node.padding {
        let sides = [
            (padding.left, BoundProperty::PaddingLeft, "Padding Left"),
            (padding.top, BoundProperty::PaddingTop, "Padding Top"),
            (padding.right, BoundProperty::PaddingRight, "Padding Right"),
            (padding.bottom, BoundProperty::PaddingBottom, "Padding Bottom"),
        ];
        let any_bound = sides.iter().any(|(_, prop, _)| node.is_bound(*prop));

        // Uniform unbound padding collapses into a single issue; mixed
        // values report each non-zero unbound side separately.
        if padding.all_equal() && !any_bound && padding.left != 0.0 {
            record(collector, "Padding", padding.left);
        } else {
            for (value, prop, property) in sides {
                if value != 0.0 && !node.is_bound(prop) {
                    record(collector, property, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, LayoutMode, Sides};

    fn auto_layout_node(padding: Sides) -> NodeSnapshot {
        NodeSnapshot {
            id: "1:1".into(),
            name: "Card".into(),
            layout_mode: LayoutMode::Vertical,
            padding: Some(padding),
            ..Default::default()
        }
    }

    fn issues_for(node: &NodeSnapshot) -> Vec<(String, String)> {
        let mut collector = IssueCollector::new();
        check_layout(node, &mut collector);
        collector.into_categorized()[&Category::Layout]
            .iter()
            .map(|i| (i.property.clone(), i.value.clone()))
            .collect()
    }

    #[test]
    fn uniform_padding_collapses_to_one_issue() {
        let node = auto_layout_node(Sides {
            left: 16.0,
            top: 16.0,
            right: 16.0,
            bottom: 16.0,
        });
        let issues = issues_for(&node);
        assert_eq!(issues, vec![("Padding".to_string(), "16px".to_string())]);
    }

    #[test]
    fn mixed_padding_reports_nonzero_sides() {
        let node = auto_layout_node(Sides {
            left: 16.0,
            top: 8.0,
            right: 16.0,
            bottom: 0.0,
        });
        let mut properties: Vec<String> = issues_for(&node).into_iter().map(|(p, _)| p).collect();
        properties.sort();
        assert_eq!(properties, vec!["Padding Left", "Padding Right", "Padding Top"]);
    }

    #[test]
    fn bound_side_breaks_consolidation_and_is_suppressed() {
        let mut node = auto_layout_node(Sides {
            left: 16.0,
            top: 16.0,
            right: 16.0,
            bottom: 16.0,
        });
        node.bound.insert(BoundProperty::PaddingLeft);
        let mut properties: Vec<String> = issues_for(&node).into_iter().map(|(p, _)| p).collect();
        properties.sort();
        assert_eq!(
            properties,
            vec!["Padding Bottom", "Padding Right", "Padding Top"]
        );
    }

    #[test]
    fn zero_uniform_padding_reports_nothing() {
        let node = auto_layout_node(Sides::default());
        assert!(issues_for(&node).is_empty());
    }

    #[test]
    fn gap_requires_auto_layout() {
        let node = NodeSnapshot {
            item_spacing: Some(8.0),
            ..Default::default()
        };
        assert!(issues_for(&node).is_empty());

        let auto = NodeSnapshot {
            layout_mode: LayoutMode::Horizontal,
            item_spacing: Some(8.0),
            ..Default::default()
        };
        assert_eq!(issues_for(&auto), vec![("Gap".to_string(), "8px".to_string())]);
    }

    #[test]
    fn width_skipped_when_dynamic_but_min_width_still_reported() {
        let node = NodeSnapshot {
            layout_mode: LayoutMode::Horizontal,
            width: Some(320.0),
            min_width: Some(120.0),
            ..Default::default()
        };
        let properties: Vec<String> = issues_for(&node).into_iter().map(|(p, _)| p).collect();
        assert!(properties.contains(&"Min Width".to_string()));
        assert!(!properties.contains(&"Width".to_string()));
    }

    #[test]
    fn bound_width_is_suppressed() {
        let mut node = NodeSnapshot {
            width: Some(100.0),
            ..Default::default()
        };
        node.bound.insert(BoundProperty::Width);
        assert!(issues_for(&node).is_empty());
    }
}
