//! Categorical color schemes
//!
//! Named palette definitions and the categorical scale that assigns palette
//! colors to series names. Assignment is first-request ordered: the first
//! category asked about gets the first palette color, and repeated lookups
//! for the same category always return the same color within one scale.

use crate::{Result, ScattervizError};
use std::collections::HashMap;

// =============================================================================
// Named categorical palettes
// =============================================================================

/// ECharts 5 default categorical palette (the fallback scheme).
pub const ECHARTS5: &[&str] = &[
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de",
    "#3ba272", "#fc8452", "#9a60b4", "#ea7ccc",
];

/// Superset dashboard palette
pub const SUPERSET: &[&str] = &[
    "#1FA8C9", "#454E7C", "#5AC189", "#FF7F44", "#666666",
    "#E04355", "#FCC700", "#A868B7", "#3CCCCB", "#A38F79",
    "#8FD3E4", "#A1A6BD", "#ACE1C4", "#FEC0A1", "#B2B2B2",
    "#EFA1AA", "#FDE380", "#D3B3DA", "#9EE5E5", "#D1C6BC",
];

/// Tableau 10
pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// D3 Category 10
pub const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// ColorBrewer Set1
pub const SET1: &[&str] = &[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00",
    "#ffff33", "#a65628", "#f781bf", "#999999",
];

/// ColorBrewer Dark2
pub const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e",
    "#e6ab02", "#a6761d", "#666666",
];

/// Look up a palette by scheme name. Unknown or absent names resolve to the
/// ECharts 5 default so color assignment always has a palette to draw from.
pub fn scheme_colors(name: Option<&str>) -> &'static [&'static str] {
    match name {
        Some("echarts5Colors") | Some("echartsColors") => ECHARTS5,
        Some("supersetColors") => SUPERSET,
        Some("tableau10") => TABLEAU10,
        Some("d3Category10") | Some("category10") => CATEGORY10,
        Some("colorBrewerSet1") | Some("set1") => SET1,
        Some("colorBrewerDark2") | Some("dark2") => DARK2,
        _ => ECHARTS5,
    }
}

/// Convert a CSS color name/value to hex format.
/// Supports named colors (e.g., "red"), hex (#FF0000), rgb(), hsl(), etc.
pub fn color_to_hex(value: &str) -> Result<String> {
    csscolorparser::parse(value)
        .map(|c| c.to_css_hex())
        .map_err(|e| ScattervizError::ConfigError(format!("Invalid color '{}': {}", value, e)))
}

// =============================================================================
// Categorical scale
// =============================================================================

/// Deterministic category → color assignment over one palette.
///
/// Categories receive palette colors in the order they are first requested,
/// wrapping modulo palette length. Callers that need stability across
/// repeated transform invocations keep one scale alive and pass it to each
/// invocation; a fresh scale is deterministic within a single invocation.
#[derive(Debug, Clone)]
pub struct CategoricalColorScale {
    colors: Vec<String>,
    assigned: HashMap<String, usize>,
}

impl CategoricalColorScale {
    /// Scale over a named scheme (unknown names fall back to the default
    /// palette).
    pub fn from_scheme(name: Option<&str>) -> Self {
        let colors = scheme_colors(name)
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        Self {
            colors,
            assigned: HashMap::new(),
        }
    }

    /// Scale over caller-supplied colors; each entry may be any CSS color
    /// and is normalized to hex.
    pub fn from_colors<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors: Vec<String> = colors
            .into_iter()
            .map(|c| color_to_hex(c.as_ref()))
            .collect::<Result<_>>()?;
        if colors.is_empty() {
            return Err(ScattervizError::ConfigError(
                "Custom color palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self {
            colors,
            assigned: HashMap::new(),
        })
    }

    /// Color for a category label, assigning the next palette slot on first
    /// sight.
    pub fn color_of(&mut self, category: &str) -> String {
        let next = self.assigned.len();
        let index = *self
            .assigned
            .entry(category.to_string())
            .or_insert(next);
        self.colors[index % self.colors.len()].clone()
    }

    /// Color for a numeric slot (cluster indices), independent of label
    /// assignment.
    pub fn color_of_index(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].clone()
    }
}
