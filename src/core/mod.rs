//! Core data model: node snapshots coming in from the document, and the
//! coverage issues/results going out of the rule engine.
//!
//! Snapshots are read-only inputs created fresh per scan. Missing or
//! malformed properties deserialize to their absent defaults so detector
//! passes can treat them as "skip" rather than an error.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which nodes a coverage scan visits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScanScope {
    /// Container nodes on the current page only.
    CurrentPage,
    /// Container nodes on every page of the document.
    Document,
    /// Current page first, falling through to the first other page with
    /// issues when the current page is clean.
    Smart,
}

/// Export format configured for generated artifacts. Only the Tailwind v4
/// format changes scoring behavior; the engine never renders CSS itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    #[default]
    Css,
    Scss,
    TailwindV4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Layout,
    Fill,
    Stroke,
    Appearance,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Layout,
        Category::Fill,
        Category::Stroke,
        Category::Appearance,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Layout => "Layout",
            Category::Fill => "Fill",
            Category::Stroke => "Stroke",
            Category::Appearance => "Appearance",
        };
        write!(f, "{s}")
    }
}

/// Node types as reported by the host document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Page,
    #[default]
    Frame,
    Section,
    Component,
    ComponentSet,
    Instance,
    Group,
    Rectangle,
    Text,
    Vector,
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Container kinds that frame attribution resolves to.
    pub fn is_frame_like(self) -> bool {
        matches!(
            self,
            NodeKind::Frame | NodeKind::Section | NodeKind::Component | NodeKind::ComponentSet
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn is_auto_layout(self) -> bool {
        self != LayoutMode::None
    }
}

/// Sizing behavior along one axis (`layoutSizingHorizontal` / `...Vertical`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisSizing {
    Fixed,
    Hug,
    Fill,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAlign {
    #[default]
    Inherit,
    Min,
    Center,
    Max,
    Stretch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    #[default]
    None,
    Height,
    WidthAndHeight,
    Truncate,
}

/// Style/geometry properties that can be bound to a design token. Keys match
/// the host document's `boundVariables` map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundProperty {
    MinWidth,
    MaxWidth,
    Width,
    Height,
    MinHeight,
    MaxHeight,
    ItemSpacing,
    PaddingLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    StrokeWeight,
    StrokeTopWeight,
    StrokeRightWeight,
    StrokeBottomWeight,
    StrokeLeftWeight,
    Opacity,
    TopLeftRadius,
    TopRightRadius,
    BottomLeftRadius,
    BottomRightRadius,
}

/// Color with 0.0–1.0 channels, as the document reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// `rgb(r, g, b)` with rounded 0–255 channels, the display form issues use.
    pub fn to_css(self) -> String {
        format!(
            "rgb({}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// One fill or stroke paint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintKind,
    pub color: Option<Rgb>,
    pub visible: bool,
    /// Paint-level color token binding.
    pub bound_color: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            kind: PaintKind::Solid,
            color: None,
            visible: true,
            bound_color: false,
        }
    }
}

impl Paint {
    pub fn is_visible_solid(&self) -> bool {
        self.kind == PaintKind::Solid && self.visible
    }
}

/// Four side values (padding).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Sides {
    pub fn all_equal(&self) -> bool {
        self.left == self.top && self.top == self.right && self.right == self.bottom
    }
}

/// Four corner radii.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl Corners {
    pub fn all_equal(&self) -> bool {
        self.top_left == self.top_right
            && self.top_right == self.bottom_left
            && self.bottom_left == self.bottom_right
    }
}

/// One entry of a node's ancestor chain, nearest ancestor first, ending at
/// the page or document root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ancestor {
    pub name: String,
    pub kind: NodeKind,
}

/// Read-only snapshot of one visual element. Created fresh per scan and
/// discarded after analysis.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,

    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,

    pub layout_mode: LayoutMode,
    pub item_spacing: Option<f64>,
    pub padding: Option<Sides>,
    pub layout_sizing_horizontal: Option<AxisSizing>,
    pub layout_sizing_vertical: Option<AxisSizing>,
    pub layout_grow: Option<f64>,
    pub layout_align: LayoutAlign,
    pub text_auto_resize: TextAutoResize,
    /// Auto-layout mode of the direct parent, for fill-container detection.
    pub parent_layout_mode: LayoutMode,

    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub opacity: Option<f64>,
    pub corner_radii: Option<Corners>,

    /// Node-level token bindings (`boundVariables` keys).
    pub bound: BTreeSet<BoundProperty>,
    pub ancestors: Vec<Ancestor>,
}

impl NodeSnapshot {
    pub fn is_bound(&self, property: BoundProperty) -> bool {
        self.bound.contains(&property)
    }

    /// Whether any ancestor below the page level is an instance. Nodes inside
    /// instances are skipped; only the instance itself is analyzed.
    pub fn is_inside_instance(&self) -> bool {
        for ancestor in &self.ancestors {
            match ancestor.kind {
                NodeKind::Page | NodeKind::Document => return false,
                NodeKind::Instance => return true,
                _ => {}
            }
        }
        false
    }

    /// Name of the nearest frame-like ancestor, falling back to
    /// `"Page: <name>"` and finally `"Unknown Frame"`.
    pub fn frame_name(&self) -> String {
        for ancestor in &self.ancestors {
            if ancestor.kind.is_frame_like() {
                return ancestor.name.clone();
            }
            if matches!(ancestor.kind, NodeKind::Page | NodeKind::Document) {
                return format!("Page: {}", ancestor.name);
            }
        }
        "Unknown Frame".to_string()
    }
}

/// Resolved value of a local design variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "resolvedType", content = "value")]
pub enum VariableValue {
    Color(Rgb),
    Float(f64),
    String(String),
    Boolean(bool),
}

/// One local design variable with its collection and resolved default-mode
/// value, used for match suggestions and scoring.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInfo {
    pub id: String,
    pub name: String,
    pub collection: String,
    #[serde(flatten)]
    pub value: VariableValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    Exact,
    Near,
}

/// A local variable whose value matches a hard-coded issue value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMatch {
    pub id: String,
    pub name: String,
    pub collection: String,
    pub resolved_value: String,
    pub match_kind: MatchKind,
}

/// One detected hard-coded value, aggregated over every node that uses it.
///
/// Uniquely keyed by `(category, property, value)`. The `node_ids`,
/// `node_names` and `node_frames` lists are parallel (index i refers to one
/// occurrence) and append-ordered, so their order follows visitation order;
/// `count` and membership do not depend on it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageIssue {
    pub property: String,
    pub value: String,
    pub count: usize,
    pub node_ids: Vec<String>,
    pub node_names: Vec<String>,
    pub node_frames: Vec<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matching_variables: Vec<VariableMatch>,
}

/// Sub-scores feeding the weighted quality score, each 0–100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub token_coverage: u32,
    pub tailwind_readiness: u32,
    pub component_hygiene: u32,
    pub variable_hygiene: u32,
    pub layout_hygiene: u32,
}

/// Display weights for the active scoring scenario, as percent strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub token_coverage: String,
    pub tailwind_readiness: String,
    pub component_hygiene: String,
    pub variable_hygiene: String,
}

/// Result of one coverage scan. Immutable once returned; per-category issue
/// lists are sorted by `count` descending.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    pub total_nodes: usize,
    pub total_issues: usize,
    pub issues_by_category: BTreeMap<Category, Vec<CoverageIssue>>,
    pub quality_score: u32,
    pub sub_scores: SubScores,
    pub weights: ScoreWeights,
}

impl CoverageResult {
    pub fn issues(&self) -> impl Iterator<Item = &CoverageIssue> {
        self.issues_by_category.values().flatten()
    }
}

/// `8` -> `"8px"`, `8.254` -> `"8.25px"`. Two decimal places, trailing zeros
/// dropped, matching how the design tool displays raw values.
pub fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Numeric display form rounded to two decimals.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_px_drops_trailing_zeros() {
        assert_eq!(format_px(8.0), "8px");
        assert_eq!(format_px(8.25), "8.25px");
        assert_eq!(format_px(8.254), "8.25px");
        assert_eq!(format_px(0.5), "0.5px");
    }

    #[test]
    fn rgb_to_css_rounds_channels() {
        let white = Rgb { r: 1.0, g: 1.0, b: 1.0 };
        assert_eq!(white.to_css(), "rgb(255, 255, 255)");
        let mid = Rgb { r: 0.5, g: 0.25, b: 0.0 };
        assert_eq!(mid.to_css(), "rgb(128, 64, 0)");
    }

    #[test]
    fn frame_name_prefers_nearest_frame_like_ancestor() {
        let node = NodeSnapshot {
            ancestors: vec![
                Ancestor {
                    name: "Group 3".into(),
                    kind: NodeKind::Group,
                },
                Ancestor {
                    name: "Card".into(),
                    kind: NodeKind::Frame,
                },
                Ancestor {
                    name: "Page 1".into(),
                    kind: NodeKind::Page,
                },
            ],
            ..Default::default()
        };
        assert_eq!(node.frame_name(), "Card");
    }

    #[test]
    fn frame_name_falls_back_to_page_then_unknown() {
        let node = NodeSnapshot {
            ancestors: vec![Ancestor {
                name: "Page 1".into(),
                kind: NodeKind::Page,
            }],
            ..Default::default()
        };
        assert_eq!(node.frame_name(), "Page: Page 1");

        let orphan = NodeSnapshot::default();
        assert_eq!(orphan.frame_name(), "Unknown Frame");
    }

    #[test]
    fn inside_instance_stops_at_page_boundary() {
        let node = NodeSnapshot {
            ancestors: vec![
                Ancestor {
                    name: "Page 1".into(),
                    kind: NodeKind::Page,
                },
                Ancestor {
                    name: "Button".into(),
                    kind: NodeKind::Instance,
                },
            ],
            ..Default::default()
        };
        assert!(!node.is_inside_instance());

        let nested = NodeSnapshot {
            ancestors: vec![
                Ancestor {
                    name: "Button".into(),
                    kind: NodeKind::Instance,
                },
                Ancestor {
                    name: "Page 1".into(),
                    kind: NodeKind::Page,
                },
            ],
            ..Default::default()
        };
        assert!(nested.is_inside_instance());
    }
}
