//! Dynamic-sizing exclusion heuristics.
//!
//! A fixed numeric width/height on an element that hugs its content or
//! stretches to fill its parent is not a tokenization target; reporting it
//! would flood results with false positives on responsive layouts. The two
//! checks mirror each other across axes.

use crate::core::{AxisSizing, LayoutAlign, LayoutMode, NodeKind, NodeSnapshot, TextAutoResize};

/// Whether the node's width is governed by layout rather than a fixed value.
pub fn is_width_dynamic(node: &NodeSnapshot) -> bool {
    // Auto-layout containers size themselves; only fixed frames without
    // auto-layout are width-tokenization candidates.
    if node.layout_mode.is_auto_layout() {
        return true;
    }

    // Hug / fill along the horizontal axis.
    if matches!(
        node.layout_sizing_horizontal,
        Some(AxisSizing::Hug) | Some(AxisSizing::Fill)
    ) {
        return true;
    }

    // Fill-container via the parent's auto-layout settings: grow along a
    // horizontal parent's main axis, stretch across a vertical parent's
    // counter axis.
    match node.parent_layout_mode {
        LayoutMode::Horizontal => {
            if node.layout_grow == Some(1.0) {
                return true;
            }
        }
        LayoutMode::Vertical => {
            if node.layout_align == LayoutAlign::Stretch {
                return true;
            }
        }
        LayoutMode::None => {}
    }

    // Text that auto-resizes in both dimensions has no fixed width.
    node.kind == NodeKind::Text && node.text_auto_resize == TextAutoResize::WidthAndHeight
}

/// Mirror of [`is_width_dynamic`] for the vertical axis.
pub fn is_height_dynamic(node: &NodeSnapshot) -> bool {
    if node.layout_mode.is_auto_layout() {
        return true;
    }

    if matches!(
        node.layout_sizing_vertical,
        Some(AxisSizing::Hug) | Some(AxisSizing::Fill)
    ) {
        return true;
    }

    match node.parent_layout_mode {
        LayoutMode::Horizontal => {
            if node.layout_align == LayoutAlign::Stretch {
                return true;
            }
        }
        LayoutMode::Vertical => {
            if node.layout_grow == Some(1.0) {
                return true;
            }
        }
        LayoutMode::None => {}
    }

    node.kind == NodeKind::Text
        && matches!(
            node.text_auto_resize,
            TextAutoResize::WidthAndHeight | TextAutoResize::Height
        )
}
