/*!
# scatterviz - Scatter Chart Option Compiler

Compiles a declarative scatter-chart configuration plus a tabular query
result into a renderer-ready ECharts option object: positional datasets, a
declarative transform chain, per-group series, legend, axes, tooltip and
visual-map descriptors.

## Example

```rust
use scatterviz::{EChartsScatterWriter, ScatterFormData, Writer};

let form: ScatterFormData = serde_json::from_value(serde_json::json!({
    "query_mode": "raw",
    "x_raw": "DISTANCE",
    "y_raw": "DEPARTURE_DELAY",
    "size_raw": "AIR_TIME",
    "use_metric_for_bubble_size": true,
}))?;
let rows = scatterviz::parse_records(r#"[
    {"DISTANCE": 1448, "DEPARTURE_DELAY": -11, "AIR_TIME": 169},
    {"DISTANCE": 2330, "DEPARTURE_DELAY": -8, "AIR_TIME": 263}
]"#)?;

let writer = EChartsScatterWriter::new();
let option = writer.write(&form, &rows)?;
assert_eq!(option.series.len(), 1);
# Ok::<(), Box<dyn std::error::Error>>(())
```

## Architecture

The transform is a single synchronous pass:

1. **Field resolution** ([`chart`]) - decide which row keys supply X, Y,
   size and the group names for the active query mode.
2. **Projection** ([`writer::echarts`]) - rows become fixed-width positional
   tuples, dataset layer 0.
3. **Group discovery** - unique series names in first-occurrence order
   (order drives colors and series order, so it is never sorted).
4. **Transform chain** - per-group filter descriptors, or a single k-means
   descriptor on the clustering path, plus the optional regression
   descriptor; all evaluated by the rendering engine, never here.
5. **Assembly** - series, legend, axes, tooltip and visual map compose the
   final [`option::ScatterOption`].

## Core Components

- [`chart`] - typed configuration record and field resolution
- [`data`] - query-result row model
- [`option`] - the serializable option IR
- [`writer`] - the option writers (ECharts)
- [`color`] - categorical color schemes
- [`format`] - axis-label number formatting
*/

pub mod chart;
pub mod color;
pub mod data;
pub mod format;
pub mod option;
pub mod writer;

// Re-export key types for convenience
pub use chart::{
    ClusterType, ClusteringPolicy, FieldSpec, LegendOrientation, LegendType, Metric, QueryMode,
    RegressionMethod, ScatterFormData,
};
pub use color::CategoricalColorScale;
pub use data::{parse_records, DataRecord, DataValue};
pub use format::NumberFormatter;
pub use option::ScatterOption;
pub use writer::{EChartsScatterWriter, Writer};

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum ScattervizError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, ScattervizError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::option::{DatasetLayer, SeriesKind, Transform, TooltipItem, TooltipParams};
    use serde_json::json;

    fn form(value: serde_json::Value) -> ScatterFormData {
        serde_json::from_value(value).unwrap()
    }

    fn flights() -> Vec<DataRecord> {
        parse_records(
            r#"[
                {"DISTANCE": 1448, "DEPARTURE_DELAY": -11, "AIR_TIME": 169},
                {"DISTANCE": 2330, "DEPARTURE_DELAY": -8, "AIR_TIME": 263}
            ]"#,
        )
        .unwrap()
    }

    fn raw_flights_form() -> ScatterFormData {
        form(json!({
            "query_mode": "raw",
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
            "size_raw": "AIR_TIME",
            "use_metric_for_bubble_size": true,
        }))
    }

    #[test]
    fn test_raw_mode_flights_scenario() {
        let writer = EChartsScatterWriter::new();
        let option = writer.write(&raw_flights_form(), &flights()).unwrap();

        // Source layer: [x, y, size, name] per row.
        let source = serde_json::to_value(&option.dataset[0]).unwrap();
        assert_eq!(
            source,
            json!({"source": [
                [1448.0, -11.0, 169.0, "Data"],
                [2330.0, -8.0, 263.0, "Data"],
            ]})
        );

        // Exactly one series named "Data" reading layer 1.
        assert_eq!(option.series.len(), 1);
        assert_eq!(option.series[0].name(), "Data");
        assert_eq!(option.series[0].dataset_index(), 1);

        // Exactly one filter layer selecting that group.
        assert_eq!(option.dataset.len(), 2);
        let transform = serde_json::to_value(&option.dataset[1]).unwrap();
        assert_eq!(
            transform,
            json!({"transform": {"type": "filter", "config": {"dimension": 3, "eq": "Data"}}})
        );
    }

    #[test]
    fn test_entity_clustering_scenario() {
        let writer = EChartsScatterWriter::new();
        let form = form(json!({
            "query_mode": "raw",
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
            "enable_clustering": true,
            "cluster_type": "cluster_by_entity",
            "cluster_entity": "AIRLINE",
        }));
        let rows = parse_records(
            r#"[
                {"DISTANCE": 1, "DEPARTURE_DELAY": 1, "AIRLINE": "LH"},
                {"DISTANCE": 2, "DEPARTURE_DELAY": 2, "AIRLINE": "LH"},
                {"DISTANCE": 3, "DEPARTURE_DELAY": 3, "AIRLINE": "Air"}
            ]"#,
        )
        .unwrap();
        let option = writer.write(&form, &rows).unwrap();

        // First-seen order: LH before Air, ordinals 1 and 2.
        assert_eq!(option.series.len(), 2);
        assert_eq!(option.series[0].name(), "LH");
        assert_eq!(option.series[0].dataset_index(), 1);
        assert_eq!(option.series[1].name(), "Air");
        assert_eq!(option.series[1].dataset_index(), 2);

        // Two filter layers in the same order.
        assert_eq!(option.dataset.len(), 3);
        match option.dataset[1].transform() {
            Some(Transform::Filter(config)) => assert_eq!(config.eq, "LH"),
            other => panic!("expected filter layer, got {:?}", other),
        }
        match option.dataset[2].transform() {
            Some(Transform::Filter(config)) => assert_eq!(config.eq, "Air"),
            other => panic!("expected filter layer, got {:?}", other),
        }
    }

    fn seven_points() -> Vec<DataRecord> {
        parse_records(
            r#"[
                {"DISTANCE": 1, "DEPARTURE_DELAY": 2, "AIR_TIME": 3},
                {"DISTANCE": 2, "DEPARTURE_DELAY": 3, "AIR_TIME": 4},
                {"DISTANCE": 3, "DEPARTURE_DELAY": 4, "AIR_TIME": 5},
                {"DISTANCE": 10, "DEPARTURE_DELAY": 12, "AIR_TIME": 6},
                {"DISTANCE": 11, "DEPARTURE_DELAY": 13, "AIR_TIME": 7},
                {"DISTANCE": 12, "DEPARTURE_DELAY": 14, "AIR_TIME": 8},
                {"DISTANCE": 13, "DEPARTURE_DELAY": 15, "AIR_TIME": 9}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_hierarchical_clustering_scenario() {
        let writer = EChartsScatterWriter::new();
        let form = form(json!({
            "query_mode": "raw",
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
            "size_raw": "AIR_TIME",
            "enable_clustering": true,
            "cluster_type": "hierarchical_kmeans",
            "amount_of_kmeans_cluster": "2",
        }));
        let option = writer.write(&form, &seven_points()).unwrap();

        // Single series on the clustering path, named by the fallback rule.
        assert_eq!(option.series.len(), 1);
        assert_eq!(option.series[0].name(), "Cluster");
        assert_eq!(option.series[0].dataset_index(), 1);

        // One clustering layer replaces the per-group filters; the cluster
        // index lands one past the 4-wide source tuples.
        assert_eq!(option.dataset.len(), 2);
        let transform = serde_json::to_value(&option.dataset[1]).unwrap();
        assert_eq!(transform["transform"]["type"], "ecStat:clustering");
        assert_eq!(
            transform["transform"]["config"]["outputClusterIndexDimension"],
            4
        );
        assert_eq!(transform["transform"]["config"]["clusterCount"], 2.0);

        // Legend is suppressed; the visual map takes its place.
        assert!(!option.legend.show);
        assert_eq!(option.visual_map.len(), 1);
        assert_eq!(option.visual_map[0].pieces.len(), 2);
        assert_eq!(option.visual_map[0].dimension, 4);
        assert_eq!(option.visual_map[0].pieces[0].label, "Cluster - 1");
    }

    #[test]
    fn test_clustering_switches_inert_in_aggregate_mode() {
        // Same switches, aggregate mode: the plain pipeline runs and the
        // fallback series keeps its "Data" name.
        let writer = EChartsScatterWriter::new();
        let form = form(json!({
            "query_mode": "aggregate",
            "x": "sum__DISTANCE",
            "y": "sum__DEPARTURE_DELAY",
            "enable_clustering": true,
            "cluster_type": "hierarchical_kmeans",
            "amount_of_kmeans_cluster": "2",
        }));
        let rows = parse_records(
            r#"[{"sum__DISTANCE": 1, "sum__DEPARTURE_DELAY": 2}]"#,
        )
        .unwrap();
        let option = writer.write(&form, &rows).unwrap();

        assert_eq!(option.series.len(), 1);
        assert_eq!(option.series[0].name(), "Data");
        assert!(option.visual_map.is_empty());
        assert!(option.legend.show);
        match option.dataset[1].transform() {
            Some(Transform::Filter(config)) => assert_eq!(config.eq, "Data"),
            other => panic!("expected filter layer, got {:?}", other),
        }
    }

    #[test]
    fn test_regression_augmentation() {
        let writer = EChartsScatterWriter::new();
        let form = form(json!({
            "query_mode": "aggregate",
            "x": "x",
            "y": "y",
            "groupby": ["region"],
            "show_regression": true,
            "regression": "polynomial",
            "regression_order": "3",
        }));
        let rows = parse_records(
            r#"[
                {"x": 1, "y": 2, "region": "Europe"},
                {"x": 3, "y": 4, "region": "Asia"}
            ]"#,
        )
        .unwrap();
        let option = writer.write(&form, &rows).unwrap();

        // Two group series plus the regression line at groupCount + 1.
        assert_eq!(option.series.len(), 3);
        let regression = &option.series[2];
        assert_eq!(regression.name(), "Regression");
        assert_eq!(regression.kind(), SeriesKind::Line);
        assert_eq!(regression.dataset_index(), 3);

        // The regression layer is last, after both filters.
        assert_eq!(option.dataset.len(), 4);
        let last = serde_json::to_value(&option.dataset[3]).unwrap();
        assert_eq!(
            last,
            json!({"transform": {
                "type": "ecStat:regression",
                "config": {"method": "polynomial", "order": 3.0},
            }})
        );
    }

    #[test]
    fn test_series_layer_index_alignment() {
        // Every series' datasetIndex equals the 1-based position of the
        // layer it reads, across all three chain shapes.
        let writer = EChartsScatterWriter::new();

        let plain = form(json!({
            "query_mode": "raw",
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
            "show_regression": true,
        }));
        let option = writer.write(&plain, &flights()).unwrap();
        assert_eq!(option.dataset.len(), option.series.len() + 1);
        for series in &option.series {
            let layer = &option.dataset[series.dataset_index()];
            assert!(!layer.is_source());
        }
    }

    #[test]
    fn test_group_order_and_colors_deterministic() {
        let writer = EChartsScatterWriter::new();
        let form = form(json!({
            "query_mode": "raw",
            "x_raw": "DISTANCE",
            "y_raw": "DEPARTURE_DELAY",
            "enable_clustering": true,
            "cluster_type": "cluster_by_entity",
            "cluster_entity": "AIRLINE",
        }));
        let rows = parse_records(
            r#"[
                {"DISTANCE": 1, "DEPARTURE_DELAY": 1, "AIRLINE": "UA"},
                {"DISTANCE": 2, "DEPARTURE_DELAY": 2, "AIRLINE": "LH"},
                {"DISTANCE": 3, "DEPARTURE_DELAY": 3, "AIRLINE": "UA"}
            ]"#,
        )
        .unwrap();

        let first = writer.write(&form, &rows).unwrap();
        let second = writer.write(&form, &rows).unwrap();
        assert_eq!(first.series, second.series);
        assert_eq!(first.series[0].name(), "UA");
        assert_eq!(first.series[1].name(), "LH");
    }

    #[test]
    fn test_session_scale_keeps_colors_across_invocations() {
        let writer = EChartsScatterWriter::new();
        let mut scale = CategoricalColorScale::from_scheme(None);
        let form = form(json!({
            "query_mode": "raw",
            "x_raw": "x",
            "y_raw": "y",
            "enable_clustering": true,
            "cluster_type": "cluster_by_entity",
            "cluster_entity": "carrier",
        }));

        let first_rows = parse_records(r#"[{"x": 1, "y": 1, "carrier": "LH"}]"#).unwrap();
        let first = writer
            .write_with_scale(&form, &first_rows, &mut scale)
            .unwrap();

        // A later invocation seeing new categories first must not steal LH's
        // color.
        let second_rows = parse_records(
            r#"[
                {"x": 1, "y": 1, "carrier": "Air"},
                {"x": 2, "y": 2, "carrier": "LH"}
            ]"#,
        )
        .unwrap();
        let second = writer
            .write_with_scale(&form, &second_rows, &mut scale)
            .unwrap();

        let color_of = |option: &ScatterOption, name: &str| match option
            .series
            .iter()
            .find(|s| s.name() == name)
        {
            Some(crate::option::SeriesDescriptor::Scatter(s)) => s.color.clone(),
            _ => panic!("missing series {}", name),
        };
        assert_eq!(color_of(&first, "LH"), color_of(&second, "LH"));
    }

    #[test]
    fn test_bubble_policy_through_full_write() {
        let writer = EChartsScatterWriter::new();
        let option = writer.write(&raw_flights_form(), &flights()).unwrap();
        match &option.series[0] {
            crate::option::SeriesDescriptor::Scatter(s) => {
                // Observed range is seeded at 0, so the minimum stays 0 even
                // though the smallest AIR_TIME is 169.
                assert_eq!(
                    s.symbol_size,
                    crate::option::BubbleSizePolicy::Scaled {
                        in_min: 0.0,
                        in_max: 263.0,
                        out_min: 5.0,
                        out_max: 25.0,
                    }
                );
                let tuple = vec![
                    DataValue::Number(2330.0),
                    DataValue::Number(-8.0),
                    DataValue::Number(263.0),
                    DataValue::String("Data".to_string()),
                ];
                assert_eq!(s.symbol_size.symbol_size(&tuple), 25.0);
            }
            _ => panic!("expected scatter series"),
        }
    }

    #[test]
    fn test_tooltip_contract_through_full_write() {
        let writer = EChartsScatterWriter::new();
        let option = writer.write(&raw_flights_form(), &flights()).unwrap();
        let params = TooltipParams::Item(TooltipItem {
            value: vec![
                DataValue::Number(1448.0),
                DataValue::Number(-11.0),
                DataValue::Number(169.0),
                DataValue::String("Data".to_string()),
            ],
        });
        assert_eq!(
            option.tooltip.formatter.format(&params),
            "Data<br>DISTANCE：1448<br>DEPARTURE_DELAY：-11<br>AIR_TIME：169<br>"
        );
        assert_eq!(option.tooltip.formatter.format(&TooltipParams::Batch(vec![])), "");
        assert_eq!(option.tooltip.trigger, "item");
    }

    #[test]
    fn test_empty_row_set_degrades_gracefully() {
        let writer = EChartsScatterWriter::new();
        let option = writer.write(&raw_flights_form(), &[]).unwrap();
        assert!(option.series.is_empty());
        assert_eq!(option.dataset.len(), 1);
        match &option.dataset[0] {
            DatasetLayer::Source { source } => assert!(source.is_empty()),
            DatasetLayer::Transform { .. } => panic!("expected source layer"),
        }
    }

    #[test]
    fn test_option_json_shape() {
        let writer = EChartsScatterWriter::new();
        let json_str = writer.write_json(&raw_flights_form(), &flights()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_str).unwrap();

        assert_eq!(value["grid"]["containLabel"], true);
        assert_eq!(value["legend"]["orient"], "horizontal");
        assert_eq!(value["legend"]["type"], "scroll");
        assert_eq!(value["xAxis"]["axisLabel"]["formatter"], "SMART_NUMBER");
        assert_eq!(value["tooltip"]["trigger"], "item");
        assert_eq!(value["tooltip"]["showDelay"], 0);
        assert_eq!(value["visualMap"], json!([]));
        assert_eq!(value["series"][0]["type"], "scatter");
        assert_eq!(value["dataset"][0]["source"][0][3], "Data");
    }
}
