//! Appearance detector pass: opacity and corner radius.

use super::collector::IssueCollector;
use crate::core::{format_number, format_px, BoundProperty, Category, NodeSnapshot};

pub fn check_appearance(node: &NodeSnapshot, collector: &mut IssueCollector) {
    // Opacity 1 is the default and 0 is intentional invisibility; neither
    // needs a token.
    if let Some(opacity) = node.opacity {
        if opacity != 1.0 && opacity != 0.0 && !node.is_bound(BoundProperty::Opacity) {
            collector.record(node, Category::Appearance, "Opacity", format_number(opacity));
        }
    }

    let Some(corners) = node.corner_radii else {
        return;
    };

    let individual = [
        (corners.top_left, BoundProperty::TopLeftRadius, "Corner Radius (Top Left)"),
        (corners.top_right, BoundProperty::TopRightRadius, "Corner Radius (Top Right)"),
        (corners.bottom_left, BoundProperty::BottomLeftRadius, "Corner Radius (Bottom Left)"),
        (corners.bottom_right, BoundProperty::BottomRightRadius, "Corner Radius (Bottom Right)"),
    ];
    let any_bound = individual.iter().any(|(_, prop, _)| node.is_bound(*prop));

    // Same consolidation rule as padding: uniform unbound radii collapse
    // into one issue.
    if corners.all_equal() && !any_bound && corners.top_left > 0.0 {
        collector.record(
            node,
            Category::Appearance,
            "Corner Radius",
            format_px(corners.top_left),
        );
    } else {
        for (value, prop, property) in individual {
            if value > 0.0 && !node.is_bound(prop) {
                collector.record(node, Category::Appearance, property, format_px(value));
            }
        }
    }
}
