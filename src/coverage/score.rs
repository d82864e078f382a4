//! Design-system quality scoring.
//!
//! Five sub-scores (0–100) combine into a weighted total. The weighting has
//! two scenarios: with the Tailwind v4 export format the readiness sub-score
//! participates, otherwise it is dropped and its weight redistributed.

use crate::core::{ExportFormat, ScoreWeights, SubScores, VariableInfo};

/// Variable name prefixes recognized by the Tailwind v4 theme namespace.
/// Grouped names (`color/primary`) are normalized to hyphens first.
const TAILWIND_PREFIXES: &[&str] = &[
    "color",
    "font",
    "text",
    "font-weight",
    "tracking",
    "leading",
    "breakpoint",
    "container",
    "spacing",
    "radius",
    "shadow",
    "inset-shadow",
    "drop-shadow",
    "blur",
    "perspective",
    "aspect",
    "ease",
    "animate",
];

/// Node-population counters gathered while scanning containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContainerStats {
    pub frame_count: usize,
    pub instance_count: usize,
    pub auto_layout_count: usize,
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        // Nothing to measure is treated as nothing wrong.
        return 100;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// 100 minus a penalty proportional to issue density, assuming roughly three
/// checkable properties per node.
pub fn token_coverage_score(total_nodes: usize, total_occurrences: usize) -> u32 {
    if total_nodes == 0 {
        return 100;
    }
    let density = total_occurrences as f64 / (total_nodes as f64 * 3.0);
    let penalty = (density * 100.0).round() as i64;
    (100 - penalty).clamp(0, 100) as u32
}

fn is_tailwind_compatible(name: &str) -> bool {
    let normalized = name.replace('/', "-");
    TAILWIND_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(&format!("{prefix}-")))
}

/// Share of variables whose names fit Tailwind v4 theme conventions.
pub fn tailwind_readiness_score(variables: &[VariableInfo]) -> u32 {
    let compatible = variables
        .iter()
        .filter(|v| is_tailwind_compatible(&v.name))
        .count();
    percent(compatible, variables.len())
}

/// Share of variables using grouped names (containing `/`).
pub fn variable_hygiene_score(variables: &[VariableInfo]) -> u32 {
    let grouped = variables.iter().filter(|v| v.name.contains('/')).count();
    percent(grouped, variables.len())
}

/// Share of containers that are instances rather than raw frames/components.
pub fn component_hygiene_score(stats: ContainerStats) -> u32 {
    percent(
        stats.instance_count,
        stats.instance_count + stats.frame_count,
    )
}

/// Share of containers using auto-layout.
pub fn layout_hygiene_score(stats: ContainerStats) -> u32 {
    percent(
        stats.auto_layout_count,
        stats.instance_count + stats.frame_count,
    )
}

/// Weighted total plus the display weights of the active scenario.
pub fn weighted_score(sub_scores: SubScores, format: ExportFormat) -> (u32, ScoreWeights) {
    let SubScores {
        token_coverage,
        tailwind_readiness,
        component_hygiene,
        variable_hygiene,
        ..
    } = sub_scores;

    if format == ExportFormat::TailwindV4 {
        let total = (token_coverage as f64 * 0.4
            + tailwind_readiness as f64 * 0.2
            + component_hygiene as f64 * 0.2
            + variable_hygiene as f64 * 0.2)
            .round() as u32;
        let weights = ScoreWeights {
            token_coverage: "40%".into(),
            tailwind_readiness: "20%".into(),
            component_hygiene: "20%".into(),
            variable_hygiene: "20%".into(),
        };
        (total, weights)
    } else {
        let total = (token_coverage as f64 * 0.5
            + component_hygiene as f64 * 0.25
            + variable_hygiene as f64 * 0.25)
            .round() as u32;
        let weights = ScoreWeights {
            token_coverage: "50%".into(),
            tailwind_readiness: "0%".into(),
            component_hygiene: "25%".into(),
            variable_hygiene: "25%".into(),
        };
        (total, weights)
    }
}
