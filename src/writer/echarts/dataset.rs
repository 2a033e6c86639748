//! Row projection, group discovery and the dataset transform chain
//!
//! Rows are projected into fixed-width positional tuples (`[x, y, size|null,
//! name...]`) forming dataset layer 0; the transform chain then describes how
//! the rendering engine derives per-group and statistical layers from it.
//! Group discovery is first-occurrence ordered; the order feeds color
//! assignment and series ordering, so it must be reproducible from the same
//! input and is never sorted.

use crate::chart::fields::{series_name, ClusteringPolicy, FieldSpec};
use crate::chart::form::RegressionMethod;
use crate::data::{DataRecord, DataValue};
use crate::option::{
    ClusteringConfig, DatasetLayer, FilterConfig, PositionalTuple, RegressionConfig, Transform,
    NAME_DIMENSION, X_DIMENSION, Y_DIMENSION,
};
use std::collections::HashSet;

/// Project each row into a positional tuple.
///
/// The trailing name dimensions come from the entity column when entity
/// clustering is active, otherwise one per configured group field; every
/// tuple of one invocation therefore has the same width.
pub fn project_rows(
    rows: &[DataRecord],
    fields: &FieldSpec,
    policy: &ClusteringPolicy,
) -> Vec<PositionalTuple> {
    let fallback = policy.fallback_series_name();
    rows.iter()
        .map(|row| {
            let mut tuple = Vec::with_capacity(NAME_DIMENSION + fields.group_fields.len());
            tuple.push(cell(row, &fields.x_field));
            tuple.push(cell(row, &fields.y_field));
            tuple.push(size_cell(row, fields.size_field.as_deref()));
            match &fields.cluster_entity_field {
                Some(entity) => {
                    tuple.push(DataValue::String(series_name(row.get(entity), fallback)));
                }
                None => {
                    for group in &fields.group_fields {
                        tuple.push(DataValue::String(series_name(row.get(group), fallback)));
                    }
                }
            }
            tuple
        })
        .collect()
}

fn cell(row: &DataRecord, field: &str) -> DataValue {
    row.get(field).cloned().unwrap_or(DataValue::Null)
}

/// Size dimension: the row value when present and non-empty, else the null
/// sentinel.
fn size_cell(row: &DataRecord, size_field: Option<&str>) -> DataValue {
    size_field
        .and_then(|field| row.get(field))
        .filter(|value| value.is_truthy())
        .cloned()
        .unwrap_or(DataValue::Null)
}

/// Collect unique series names in first-occurrence order.
///
/// On the entity-clustering path groups are read from the raw rows' entity
/// column (preserving unresolved entity identity); otherwise from the first
/// name dimension of the projected tuples.
pub fn discover_groups(
    rows: &[DataRecord],
    tuples: &[PositionalTuple],
    policy: &ClusteringPolicy,
) -> Vec<String> {
    let fallback = policy.fallback_series_name();
    let mut seen = HashSet::new();
    let mut groups = Vec::new();

    match policy {
        ClusteringPolicy::ByEntity { entity_field } => {
            for row in rows {
                push_unique(
                    series_name(row.get(entity_field), fallback),
                    &mut seen,
                    &mut groups,
                );
            }
        }
        _ => {
            for tuple in tuples {
                push_unique(
                    series_name(tuple.get(NAME_DIMENSION), fallback),
                    &mut seen,
                    &mut groups,
                );
            }
        }
    }
    groups
}

fn push_unique(name: String, seen: &mut HashSet<String>, groups: &mut Vec<String>) {
    if seen.insert(name.clone()) {
        groups.push(name);
    }
}

/// One filter layer per group, in group order: the layer at index `i + 1`
/// selects the layer-0 rows whose name dimension equals `groups[i]`.
pub fn filter_layers(groups: &[String], dimension: usize) -> Vec<DatasetLayer> {
    groups
        .iter()
        .map(|group| DatasetLayer::Transform {
            transform: Transform::Filter(FilterConfig {
                dimension,
                eq: group.clone(),
            }),
        })
        .collect()
}

/// The single k-means layer replacing per-group filters on the hierarchical
/// path. The engine appends the cluster index at `output_cluster_index_dimension`
/// (the source tuple width).
pub fn clustering_layer(cluster_count: f64, output_cluster_index_dimension: usize) -> DatasetLayer {
    DatasetLayer::Transform {
        transform: Transform::Clustering(ClusteringConfig {
            cluster_count,
            output_type: "single".to_string(),
            dimensions: vec![X_DIMENSION, Y_DIMENSION],
            output_cluster_index_dimension,
        }),
    }
}

/// The regression layer appended after all other layers when regression
/// display is enabled.
pub fn regression_layer(method: RegressionMethod, order: f64) -> DatasetLayer {
    DatasetLayer::Transform {
        transform: Transform::Regression(RegressionConfig { method, order }),
    }
}
