//! Field resolution
//!
//! Decides which configured field supplies each visual dimension (X, Y,
//! bubble size, grouping/name) for the active query mode, and which
//! clustering variant drives projection and group discovery. Resolution
//! never fails: absent optional fields degrade to documented fallbacks.

use crate::chart::form::{Metric, QueryMode, ScatterFormData};
use crate::data::DataValue;

/// Series name used when no grouping value is available.
pub const FALLBACK_SERIES_NAME: &str = "Data";

/// Series name used on the k-means clustering path.
pub const CLUSTER_SERIES_NAME: &str = "Cluster";

/// The clustering variant in effect for one transform invocation.
///
/// Derived once from the configuration and consumed uniformly by the row
/// projector, group discovery and the transform chain, so the three stages
/// can never disagree about which partitioning is active.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusteringPolicy {
    /// Plain grouping by the configured group fields.
    None,
    /// Partition raw rows by an explicit categorical column.
    ByEntity { entity_field: String },
    /// Partition via a renderer-evaluated k-means transform.
    Hierarchical { cluster_count: f64 },
}

impl ClusteringPolicy {
    pub fn from_form(form: &ScatterFormData) -> Self {
        if form.hierarchical_clustering_active() {
            return ClusteringPolicy::Hierarchical {
                cluster_count: form.cluster_count(),
            };
        }
        if form.entity_clustering_active() {
            if let Some(entity) = &form.cluster_entity {
                return ClusteringPolicy::ByEntity {
                    entity_field: entity.label(),
                };
            }
        }
        ClusteringPolicy::None
    }

    /// Fallback series name for rows whose grouping value is absent:
    /// `"Cluster"` on the k-means path, `"Data"` everywhere else.
    pub fn fallback_series_name(&self) -> &'static str {
        match self {
            ClusteringPolicy::Hierarchical { .. } => CLUSTER_SERIES_NAME,
            _ => FALLBACK_SERIES_NAME,
        }
    }
}

/// Resolved field references for one transform invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Row key supplying the X dimension.
    pub x_field: String,
    /// Row key supplying the Y dimension.
    pub y_field: String,
    /// Row key supplying the bubble-size dimension, when configured.
    pub size_field: Option<String>,
    /// Ordered grouping keys; never empty (a synthetic fallback label is
    /// substituted when no grouping is configured).
    pub group_fields: Vec<String>,
    /// Entity column for entity-based clustering, when that variant is
    /// active.
    pub cluster_entity_field: Option<String>,
}

impl FieldSpec {
    /// Resolve field references from the configuration for the effective
    /// query mode.
    pub fn resolve(form: &ScatterFormData, policy: &ClusteringPolicy) -> Self {
        let is_agg = form.resolved_query_mode() == QueryMode::Aggregate;

        let metric_label = |metric: &Option<Metric>| -> String {
            metric.as_ref().map(Metric::label).unwrap_or_default()
        };

        let x_field = if is_agg {
            metric_label(&form.x)
        } else {
            metric_label(&form.x_raw)
        };
        let y_field = if is_agg {
            metric_label(&form.y)
        } else {
            metric_label(&form.y_raw)
        };
        let size_source = if is_agg { &form.size } else { &form.size_raw };
        let size_field = size_source
            .as_ref()
            .map(Metric::label)
            .filter(|label| !label.is_empty());

        let group_fields = if is_agg && !form.groupby.is_empty() {
            form.groupby.clone()
        } else {
            vec![policy.fallback_series_name().to_string()]
        };

        let cluster_entity_field = match policy {
            ClusteringPolicy::ByEntity { entity_field } => Some(entity_field.clone()),
            _ => None,
        };

        FieldSpec {
            x_field,
            y_field,
            size_field,
            group_fields,
            cluster_entity_field,
        }
    }
}

/// Coerce one grouping value to its series name: numbers render in decimal,
/// strings pass through, everything else (null, booleans, absent) falls back
/// to the supplied label.
pub fn series_name(value: Option<&DataValue>, fallback: &str) -> String {
    match value {
        Some(DataValue::Number(n)) => DataValue::Number(*n).to_string(),
        Some(DataValue::String(s)) => s.clone(),
        _ => fallback.to_string(),
    }
}
