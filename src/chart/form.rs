//! Chart configuration types
//!
//! The configuration object authored by the chart control surface, modeled as
//! a strongly typed serde record with explicit optional fields and documented
//! defaults. Numeric controls that arrive as free-form strings (bubble sizes,
//! regression order, cluster count) keep their string form here and are
//! parsed on demand with the base-10 leading-integer policy; a non-numeric
//! string becomes NaN and flows into the output rather than failing the
//! transform.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enumerated controls
// =============================================================================

/// Which query shape produced the rows: aggregated metrics or raw columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Aggregate,
    Raw,
}

/// Regression curve families understood by the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionMethod {
    Linear,
    Exponential,
    Logarithmic,
    Polynomial,
}

impl RegressionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegressionMethod::Linear => "linear",
            RegressionMethod::Exponential => "exponential",
            RegressionMethod::Logarithmic => "logarithmic",
            RegressionMethod::Polynomial => "polynomial",
        }
    }
}

/// How rows are partitioned when clustering is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterType {
    /// Partition by an explicit categorical column chosen by the user.
    ClusterByEntity,
    /// Partition by k-means into a fixed cluster count (renderer-evaluated).
    HierarchicalKmeans,
}

/// Legend widget flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendType {
    #[default]
    Scroll,
    Plain,
}

/// Which chart edge the legend docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendOrientation {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

// =============================================================================
// Metric selectors
// =============================================================================

/// A metric selector: either a saved-metric name or an ad-hoc definition.
///
/// Raw-column selectors reuse the same shape (the plain string form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Saved(String),
    Adhoc(AdhocMetric),
}

/// Ad-hoc metric definition as produced by the configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhocMetric {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub aggregate: Option<String>,
    #[serde(default)]
    pub column: Option<AdhocColumn>,
    #[serde(default, rename = "sqlExpression")]
    pub sql_expression: Option<String>,
}

/// Column reference inside an ad-hoc metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhocColumn {
    pub column_name: String,
}

impl Metric {
    /// Display label of the metric: the saved name, the explicit label, the
    /// SQL expression, or `aggregate(column)` for simple ad-hoc metrics.
    pub fn label(&self) -> String {
        match self {
            Metric::Saved(name) => name.clone(),
            Metric::Adhoc(m) => m
                .label
                .clone()
                .or_else(|| m.sql_expression.clone())
                .or_else(|| match (&m.aggregate, &m.column) {
                    (Some(aggregate), Some(column)) => {
                        Some(format!("{}({})", aggregate, column.column_name))
                    }
                    _ => None,
                })
                .unwrap_or_default(),
        }
    }
}

// =============================================================================
// Form data
// =============================================================================

/// The full chart configuration record.
///
/// Every field has a documented default so partially populated payloads from
/// older configuration surfaces deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterFormData {
    /// Query shape; when absent it is inferred from the raw-column selectors
    /// (see [`ScatterFormData::resolved_query_mode`]).
    #[serde(default)]
    pub query_mode: Option<QueryMode>,

    /// X metric (aggregate mode).
    #[serde(default)]
    pub x: Option<Metric>,
    /// Y metric (aggregate mode).
    #[serde(default)]
    pub y: Option<Metric>,
    /// Bubble-size metric (aggregate mode).
    #[serde(default)]
    pub size: Option<Metric>,
    /// X column (raw mode).
    #[serde(default)]
    pub x_raw: Option<Metric>,
    /// Y column (raw mode).
    #[serde(default)]
    pub y_raw: Option<Metric>,
    /// Bubble-size column (raw mode).
    #[serde(default)]
    pub size_raw: Option<Metric>,

    /// Grouping columns (aggregate mode); empty list falls back to a single
    /// synthetic series.
    #[serde(default)]
    pub groupby: Vec<String>,

    /// Flat bubble size (pixels) used when the size metric is not applied.
    #[serde(default = "default_bubble_size")]
    pub bubble_size: String,
    /// Lower bound of the scaled bubble-size range.
    #[serde(default = "default_min_bubble_size")]
    pub min_bubble_size: String,
    /// Upper bound of the scaled bubble-size range.
    #[serde(default = "default_max_bubble_size")]
    pub max_bubble_size: String,
    /// Scale symbol sizes from the size field instead of the flat size.
    #[serde(default)]
    pub use_metric_for_bubble_size: bool,

    /// Append the regression line series and transform.
    #[serde(default)]
    pub show_regression: bool,
    /// Show the fitted-expression label on the regression line.
    #[serde(default)]
    pub show_regression_label: bool,
    /// Regression curve family.
    #[serde(default = "default_regression")]
    pub regression: RegressionMethod,
    /// Polynomial order (free-form numeric string).
    #[serde(default = "default_regression_order")]
    pub regression_order: String,

    /// Master switch for the clustering controls.
    #[serde(default)]
    pub enable_clustering: bool,
    /// Clustering flavor; only meaningful when clustering is enabled.
    #[serde(default)]
    pub cluster_type: Option<ClusterType>,
    /// Entity column for entity-based clustering.
    #[serde(default)]
    pub cluster_entity: Option<Metric>,
    /// k-means cluster count (free-form numeric string).
    #[serde(default = "default_kmeans_clusters")]
    pub amount_of_kmeans_cluster: String,

    /// Show per-point series-name labels.
    #[serde(default)]
    pub show_labels: bool,
    /// Emphasize the hovered series.
    #[serde(default)]
    pub show_highlighting: bool,

    /// Named categorical color scheme.
    #[serde(default)]
    pub color_scheme: Option<String>,

    /// Legend visibility (may be overridden by the clustering visual map).
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default)]
    pub legend_type: LegendType,
    #[serde(default)]
    pub legend_orientation: LegendOrientation,
    #[serde(default)]
    pub legend_margin: Option<f64>,

    #[serde(default)]
    pub x_axis_title: String,
    /// Axis-label number format descriptor (D3 syntax or `SMART_NUMBER`).
    #[serde(default = "default_number_format")]
    pub x_axis_format: String,
    #[serde(default)]
    pub y_axis_title: String,
    #[serde(default = "default_number_format")]
    pub y_axis_format: String,
}

fn default_bubble_size() -> String {
    "25".to_string()
}

fn default_min_bubble_size() -> String {
    "5".to_string()
}

fn default_max_bubble_size() -> String {
    "25".to_string()
}

fn default_regression() -> RegressionMethod {
    RegressionMethod::Linear
}

fn default_regression_order() -> String {
    "2".to_string()
}

fn default_kmeans_clusters() -> String {
    "4".to_string()
}

fn default_number_format() -> String {
    "SMART_NUMBER".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ScatterFormData {
    fn default() -> Self {
        serde_json::from_value(serde_json::Value::Object(Default::default()))
            .expect("empty form data deserializes")
    }
}

impl ScatterFormData {
    /// Parse a JSON configuration payload.
    pub fn from_json(payload: &str) -> crate::Result<Self> {
        serde_json::from_str(payload).map_err(|e| {
            crate::ScattervizError::ConfigError(format!("Invalid configuration payload: {}", e))
        })
    }

    /// Effective query mode: the explicit setting, or `Raw` when any
    /// raw-column selector is populated, else `Aggregate`.
    pub fn resolved_query_mode(&self) -> QueryMode {
        match self.query_mode {
            Some(mode) => mode,
            None => {
                if self.x_raw.is_some() || self.y_raw.is_some() || self.size_raw.is_some() {
                    QueryMode::Raw
                } else {
                    QueryMode::Aggregate
                }
            }
        }
    }

    /// Flat bubble size in pixels (NaN for a non-numeric control value).
    pub fn bubble_size_px(&self) -> f64 {
        parse_int10(&self.bubble_size)
    }

    /// Lower bound of the scaled bubble-size range.
    pub fn min_bubble_size_px(&self) -> f64 {
        parse_int10(&self.min_bubble_size)
    }

    /// Upper bound of the scaled bubble-size range.
    pub fn max_bubble_size_px(&self) -> f64 {
        parse_int10(&self.max_bubble_size)
    }

    /// Regression order as a number (NaN for a non-numeric control value).
    pub fn regression_order_value(&self) -> f64 {
        parse_int10(&self.regression_order)
    }

    /// k-means cluster count as a number (NaN for a non-numeric value).
    pub fn cluster_count(&self) -> f64 {
        parse_int10(&self.amount_of_kmeans_cluster)
    }

    /// True when the k-means clustering pipeline variant is active: raw mode,
    /// clustering enabled, hierarchical algorithm selected.
    pub fn hierarchical_clustering_active(&self) -> bool {
        self.enable_clustering
            && self.cluster_type == Some(ClusterType::HierarchicalKmeans)
            && self.resolved_query_mode() == QueryMode::Raw
    }

    /// True when rows are partitioned by the chosen entity column: raw mode,
    /// clustering enabled, entity algorithm selected, entity column chosen.
    pub fn entity_clustering_active(&self) -> bool {
        self.enable_clustering
            && self.cluster_type == Some(ClusterType::ClusterByEntity)
            && self.cluster_entity.is_some()
            && self.resolved_query_mode() == QueryMode::Raw
    }
}

/// Base-10 leading-integer parse, matching the configuration surface's
/// legacy numeric-string handling: leading whitespace and sign are accepted,
/// digits are consumed until the first non-digit, and an input with no
/// leading digits yields NaN. `"3.9"` parses to 3, `"12px"` to 12.
pub fn parse_int10(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    let end = rest
        .as_bytes()
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return f64::NAN;
    }
    match rest[..end].parse::<f64>() {
        Ok(value) => sign * value,
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_payload() {
        let form: ScatterFormData = serde_json::from_value(json!({})).unwrap();
        assert_eq!(form.bubble_size, "25");
        assert_eq!(form.min_bubble_size, "5");
        assert_eq!(form.max_bubble_size, "25");
        assert_eq!(form.regression, RegressionMethod::Linear);
        assert_eq!(form.regression_order, "2");
        assert_eq!(form.amount_of_kmeans_cluster, "4");
        assert!(form.show_legend);
        assert!(!form.show_labels);
        assert!(!form.show_highlighting);
        assert_eq!(form.legend_type, LegendType::Scroll);
        assert_eq!(form.legend_orientation, LegendOrientation::Top);
        assert_eq!(form.x_axis_format, "SMART_NUMBER");
        assert_eq!(form.resolved_query_mode(), QueryMode::Aggregate);
    }

    #[test]
    fn test_mode_inference_from_raw_columns() {
        let form: ScatterFormData = serde_json::from_value(json!({
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
        }))
        .unwrap();
        assert_eq!(form.resolved_query_mode(), QueryMode::Raw);

        let explicit: ScatterFormData = serde_json::from_value(json!({
            "query_mode": "aggregate",
            "x_raw": "DISTANCE",
        }))
        .unwrap();
        assert_eq!(explicit.resolved_query_mode(), QueryMode::Aggregate);
    }

    #[test]
    fn test_metric_label_projection() {
        let saved = Metric::Saved("sum__SP_POP_TOTL".to_string());
        assert_eq!(saved.label(), "sum__SP_POP_TOTL");

        let adhoc: Metric = serde_json::from_value(json!({
            "label": "Population",
            "aggregate": "SUM",
            "column": {"column_name": "population"},
        }))
        .unwrap();
        assert_eq!(adhoc.label(), "Population");

        let unlabeled: Metric = serde_json::from_value(json!({
            "aggregate": "AVG",
            "column": {"column_name": "delay"},
        }))
        .unwrap();
        assert_eq!(unlabeled.label(), "AVG(delay)");

        let sql: Metric = serde_json::from_value(json!({
            "sqlExpression": "COUNT(*)",
        }))
        .unwrap();
        assert_eq!(sql.label(), "COUNT(*)");
    }

    #[test]
    fn test_parse_int10_policy() {
        assert_eq!(parse_int10("25"), 25.0);
        assert_eq!(parse_int10("  15"), 15.0);
        assert_eq!(parse_int10("-3"), -3.0);
        assert_eq!(parse_int10("3.9"), 3.0);
        assert_eq!(parse_int10("12px"), 12.0);
        assert!(parse_int10("").is_nan());
        assert!(parse_int10("big").is_nan());
        assert!(parse_int10(".5").is_nan());
    }

    #[test]
    fn test_clustering_predicates() {
        let hierarchical: ScatterFormData = serde_json::from_value(json!({
            "query_mode": "raw",
            "enable_clustering": true,
            "cluster_type": "hierarchical_kmeans",
        }))
        .unwrap();
        assert!(hierarchical.hierarchical_clustering_active());
        assert!(!hierarchical.entity_clustering_active());

        let entity: ScatterFormData = serde_json::from_value(json!({
            "query_mode": "raw",
            "enable_clustering": true,
            "cluster_type": "cluster_by_entity",
            "cluster_entity": "AIRLINE",
        }))
        .unwrap();
        assert!(entity.entity_clustering_active());
        assert!(!entity.hierarchical_clustering_active());

        // Aggregate mode disables both variants regardless of the switches.
        let aggregate: ScatterFormData = serde_json::from_value(json!({
            "query_mode": "aggregate",
            "enable_clustering": true,
            "cluster_type": "hierarchical_kmeans",
        }))
        .unwrap();
        assert!(!aggregate.hierarchical_clustering_active());
    }

    #[test]
    fn test_nan_controls_survive_parsing() {
        let form: ScatterFormData = serde_json::from_value(json!({
            "bubble_size": "huge",
            "amount_of_kmeans_cluster": "many",
        }))
        .unwrap();
        assert!(form.bubble_size_px().is_nan());
        assert!(form.cluster_count().is_nan());
    }
}
