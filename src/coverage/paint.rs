//! Fill and stroke detector passes.

use super::collector::IssueCollector;
use crate::core::{format_px, BoundProperty, Category, NodeSnapshot, Paint};

/// Whether any visible solid paint in the list carries a paint-level color
/// token binding. One bound paint marks the whole list as tokenized.
fn any_solid_color_bound(paints: &[Paint]) -> bool {
    paints
        .iter()
        .any(|p| p.is_visible_solid() && p.bound_color)
}

/// The color to report for an unbound paint list: the first visible solid.
fn first_visible_solid_color(paints: &[Paint]) -> Option<String> {
    paints
        .iter()
        .find(|p| p.is_visible_solid())
        .and_then(|p| p.color)
        .map(|c| c.to_css())
}

pub fn check_fills(node: &NodeSnapshot, collector: &mut IssueCollector) {
    if node.fills.is_empty() || any_solid_color_bound(&node.fills) {
        return;
    }
    if let Some(color) = first_visible_solid_color(&node.fills) {
        collector.record(node, Category::Fill, "Fill Color", color);
    }
}

pub fn check_strokes(node: &NodeSnapshot, collector: &mut IssueCollector) {
    if !node.strokes.is_empty() && !any_solid_color_bound(&node.strokes) {
        if let Some(color) = first_visible_solid_color(&node.strokes) {
            collector.record(node, Category::Stroke, "Stroke Color", color);
        }
    }

    // A binding on any individual side weight counts for the consolidated
    // weight as well.
    let weight_bound = [
        BoundProperty::StrokeWeight,
        BoundProperty::StrokeTopWeight,
        BoundProperty::StrokeRightWeight,
        BoundProperty::StrokeBottomWeight,
        BoundProperty::StrokeLeftWeight,
    ]
    .iter()
    .any(|p| node.is_bound(*p));

    if let Some(weight) = node.stroke_weight {
        if weight != 0.0 && !weight_bound {
            collector.record(node, Category::Stroke, "Stroke Weight", format_px(weight));
        }
    }
}
