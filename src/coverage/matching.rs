//! Matching-variable suggestions: for each hard-coded value, the local
//! variables whose resolved value already matches it.

use crate::core::{Category, MatchKind, Rgb, VariableInfo, VariableMatch, VariableValue};

/// Tolerance for float comparison. For colors this allows ~2.5 difference in
/// 0–255 channel terms, imperceptible in practice.
const VALUE_MATCH_TOLERANCE: f64 = 0.01;

/// Distance within which a numeric value still counts as a near match.
const NEAR_MATCH_DISTANCE: f64 = 2.0;

/// Whether a variable's resolved type can satisfy issues in a category.
/// Stroke accepts both colors (stroke color) and floats (stroke weight).
fn type_matches(value: &VariableValue, category: Category) -> bool {
    match category {
        Category::Fill => matches!(value, VariableValue::Color(_)),
        Category::Stroke => matches!(value, VariableValue::Color(_) | VariableValue::Float(_)),
        Category::Layout | Category::Appearance => matches!(value, VariableValue::Float(_)),
    }
}

/// Parse the `rgb(r, g, b)` display form back into 0.0–1.0 channels.
fn parse_rgb(value: &str) -> Option<Rgb> {
    let inner = value.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<f64>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb {
        r: r / 255.0,
        g: g / 255.0,
        b: b / 255.0,
    })
}

/// Parse the leading number out of display forms like `"18px"` or `"0.5"`.
fn parse_leading_number(value: &str) -> Option<f64> {
    let end = value
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(value.len());
    if end == 0 {
        return None;
    }
    value[..end].parse().ok()
}

fn value_match(value: &VariableValue, hard_value: &str) -> Option<MatchKind> {
    match value {
        VariableValue::Color(var_color) => {
            let hard = parse_rgb(hard_value)?;
            let close = (var_color.r - hard.r).abs() < VALUE_MATCH_TOLERANCE
                && (var_color.g - hard.g).abs() < VALUE_MATCH_TOLERANCE
                && (var_color.b - hard.b).abs() < VALUE_MATCH_TOLERANCE;
            close.then_some(MatchKind::Exact)
        }
        VariableValue::Float(var_value) => {
            let hard = parse_leading_number(hard_value)?;
            let diff = (var_value - hard).abs();
            if diff < VALUE_MATCH_TOLERANCE {
                Some(MatchKind::Exact)
            } else if diff <= NEAR_MATCH_DISTANCE {
                Some(MatchKind::Near)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn display_value(value: &VariableValue) -> String {
    match value {
        VariableValue::Color(c) => c.to_css(),
        VariableValue::Float(f) => crate::core::format_number(*f),
        VariableValue::String(s) => s.clone(),
        VariableValue::Boolean(b) => b.to_string(),
    }
}

/// Variables matching `hard_value` for an issue in `category`, exact matches
/// first, then by name.
pub fn find_matching_variables(
    hard_value: &str,
    category: Category,
    variables: &[VariableInfo],
) -> Vec<VariableMatch> {
    let mut matches: Vec<VariableMatch> = variables
        .iter()
        .filter(|v| type_matches(&v.value, category))
        .filter_map(|v| {
            value_match(&v.value, hard_value).map(|kind| VariableMatch {
                id: v.id.clone(),
                name: v.name.clone(),
                collection: v.collection.clone(),
                resolved_value: display_value(&v.value),
                match_kind: kind,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.match_kind
            .cmp(&b.match_kind)
            .then_with(|| a.name.cmp(&b.name))
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_var(name: &str, value: f64) -> VariableInfo {
        VariableInfo {
            id: format!("var:{name}"),
            name: name.into(),
            collection: "primitives".into(),
            value: VariableValue::Float(value),
        }
    }

    fn color_var(name: &str, r: f64, g: f64, b: f64) -> VariableInfo {
        VariableInfo {
            id: format!("var:{name}"),
            name: name.into(),
            collection: "colors".into(),
            value: VariableValue::Color(Rgb { r, g, b }),
        }
    }

    #[test]
    fn exact_float_match_within_tolerance() {
        let vars = vec![float_var("spacing/md", 16.0)];
        let matches = find_matching_variables("16px", Category::Layout, &vars);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_kind, MatchKind::Exact);
    }

    #[test]
    fn near_float_match_within_two() {
        let vars = vec![float_var("spacing/md", 16.0)];
        let matches = find_matching_variables("18px", Category::Layout, &vars);
        assert_eq!(matches[0].match_kind, MatchKind::Near);
        assert!(find_matching_variables("18.5px", Category::Layout, &vars).is_empty());
    }

    #[test]
    fn exact_matches_sort_before_near() {
        let vars = vec![float_var("spacing/lg", 17.0), float_var("spacing/md", 16.0)];
        let matches = find_matching_variables("16px", Category::Layout, &vars);
        assert_eq!(matches[0].name, "spacing/md");
        assert_eq!(matches[0].match_kind, MatchKind::Exact);
        assert_eq!(matches[1].match_kind, MatchKind::Near);
    }

    #[test]
    fn color_matches_only_fill_and_stroke() {
        let vars = vec![color_var("color/white", 1.0, 1.0, 1.0)];
        assert_eq!(
            find_matching_variables("rgb(255, 255, 255)", Category::Fill, &vars).len(),
            1
        );
        assert_eq!(
            find_matching_variables("rgb(255, 255, 255)", Category::Stroke, &vars).len(),
            1
        );
        assert!(find_matching_variables("rgb(255, 255, 255)", Category::Layout, &vars).is_empty());
    }

    #[test]
    fn color_mismatch_is_rejected() {
        let vars = vec![color_var("color/white", 1.0, 1.0, 1.0)];
        assert!(find_matching_variables("rgb(250, 255, 255)", Category::Fill, &vars).is_empty());
    }

    #[test]
    fn malformed_hard_values_match_nothing() {
        let vars = vec![float_var("spacing/md", 16.0), color_var("c", 0.0, 0.0, 0.0)];
        assert!(find_matching_variables("auto", Category::Layout, &vars).is_empty());
        assert!(find_matching_variables("rgb(1, 2)", Category::Fill, &vars).is_empty());
    }
}
