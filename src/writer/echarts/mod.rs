//! ECharts option writer
//!
//! Assembles the full option object from a chart configuration and the query
//! rows: resolve fields, project rows into the positional source layer,
//! discover groups, build the series list and transform chain, then attach
//! legend, axes, tooltip and (on the k-means path) the piecewise visual map.
//!
//! The pipeline is a single synchronous pass; every invocation builds its
//! output from scratch and leaves the inputs untouched.

mod bubble;
mod dataset;
mod series;

pub use bubble::{observed_size_range, scale_to_bubble_size, size_policy};
pub use dataset::{
    clustering_layer, discover_groups, filter_layers, project_rows, regression_layer,
};
pub use series::{regression_series, scatter_series, REGRESSION_SERIES_NAME};

use crate::chart::fields::{ClusteringPolicy, FieldSpec};
use crate::chart::form::{LegendOrientation, LegendType, QueryMode, ScatterFormData};
use crate::color::CategoricalColorScale;
use crate::data::DataRecord;
use crate::format::NumberFormatter;
use crate::option::{
    Axis, AxisLabel, DatasetLayer, Grid, Legend, Orient, PiecewiseVisualMap, ScatterOption,
    SeriesDescriptor, Tooltip, TooltipFormatter, VisualMapPiece, NAME_DIMENSION,
};
use crate::writer::Writer;
use crate::{Result, ScattervizError};
use tracing::debug;

/// Legend top offset when docked right on a zoomable chart.
const LEGEND_RIGHT_TOP_OFFSET: f64 = 30.0;
/// Legend right offset when docked top on a zoomable chart.
const LEGEND_TOP_RIGHT_OFFSET: f64 = 55.0;

/// Writer producing [`ScatterOption`] objects for the ECharts renderer.
pub struct EChartsScatterWriter {
    /// Caller-supplied palette overriding the configured scheme.
    custom_colors: Option<Vec<String>>,
}

impl EChartsScatterWriter {
    /// Create a writer using the configuration's named color scheme.
    pub fn new() -> Self {
        Self {
            custom_colors: None,
        }
    }

    /// Create a writer with an explicit palette (any CSS color syntax).
    pub fn with_colors<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            custom_colors: Some(colors.into_iter().map(Into::into).collect()),
        }
    }

    fn color_scale(&self, form: &ScatterFormData) -> Result<CategoricalColorScale> {
        match &self.custom_colors {
            Some(colors) => CategoricalColorScale::from_colors(colors),
            None => Ok(CategoricalColorScale::from_scheme(
                form.color_scheme.as_deref(),
            )),
        }
    }

    /// Like [`Writer::write`], but drawing colors from a caller-owned scale
    /// so category colors stay stable across repeated invocations within a
    /// session.
    pub fn write_with_scale(
        &self,
        form: &ScatterFormData,
        data: &[DataRecord],
        scale: &mut CategoricalColorScale,
    ) -> Result<ScatterOption> {
        self.validate(form)?;
        Ok(assemble(form, data, scale))
    }

    /// Convenience wrapper serializing the option object to pretty JSON.
    pub fn write_json(&self, form: &ScatterFormData, data: &[DataRecord]) -> Result<String> {
        let option = self.write(form, data)?;
        serde_json::to_string_pretty(&option).map_err(|e| {
            ScattervizError::WriterError(format!("Failed to serialize option JSON: {}", e))
        })
    }
}

impl Default for EChartsScatterWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for EChartsScatterWriter {
    type Output = ScatterOption;

    fn write(&self, form: &ScatterFormData, data: &[DataRecord]) -> Result<ScatterOption> {
        let mut scale = self.color_scale(form)?;
        self.write_with_scale(form, data, &mut scale)
    }

    fn validate(&self, form: &ScatterFormData) -> Result<()> {
        let (x, y, label) = match form.resolved_query_mode() {
            QueryMode::Aggregate => (&form.x, &form.y, "metric"),
            QueryMode::Raw => (&form.x_raw, &form.y_raw, "column"),
        };
        if x.is_none() {
            return Err(ScattervizError::ConfigError(format!(
                "Scatter chart requires an X {}",
                label
            )));
        }
        if y.is_none() {
            return Err(ScattervizError::ConfigError(format!(
                "Scatter chart requires a Y {}",
                label
            )));
        }
        Ok(())
    }
}

/// One full pipeline pass. Never fails: every data-shape edge case
/// resolves to a documented fallback.
fn assemble(
    form: &ScatterFormData,
    data: &[DataRecord],
    scale: &mut CategoricalColorScale,
) -> ScatterOption {
    let policy = ClusteringPolicy::from_form(form);
    let fields = FieldSpec::resolve(form, &policy);
    debug!(
        x = %fields.x_field,
        y = %fields.y_field,
        mode = ?form.resolved_query_mode(),
        "resolved fields"
    );

    let tuples = project_rows(data, &fields, &policy);
    let source_width = tuples.first().map(Vec::len).unwrap_or(0);
    let groups = discover_groups(data, &tuples, &policy);
    let symbol_size = size_policy(form, &fields, data);

    let hierarchical = matches!(policy, ClusteringPolicy::Hierarchical { .. });
    let show_legend = if hierarchical { false } else { form.show_legend };

    // Group series first: their ordinals must line up 1:1 with the filter
    // layers, and they claim palette slots before the visual-map pieces.
    let mut series: Vec<SeriesDescriptor> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            scatter_series(
                group,
                index + 1,
                scale.color_of(group),
                form.show_highlighting,
                form.show_labels,
                symbol_size.clone(),
            )
        })
        .collect();

    let mut dataset = vec![DatasetLayer::Source { source: tuples }];
    match &policy {
        ClusteringPolicy::Hierarchical { cluster_count } => {
            dataset.push(clustering_layer(*cluster_count, source_width));
        }
        _ => dataset.extend(filter_layers(&groups, NAME_DIMENSION)),
    }

    if form.show_regression {
        let group_series = series.len();
        series.push(regression_series(
            group_series + 1,
            form.show_regression_label,
        ));
        dataset.push(regression_layer(
            form.regression,
            form.regression_order_value(),
        ));
    }

    let visual_map = match &policy {
        ClusteringPolicy::Hierarchical { cluster_count } => {
            vec![build_visual_map(*cluster_count, source_width, scale)]
        }
        _ => Vec::new(),
    };

    debug!(
        rows = data.len(),
        groups = groups.len(),
        layers = dataset.len(),
        "assembled dataset layers"
    );

    ScatterOption {
        grid: Grid::default(),
        legend: legend_props(form.legend_type, form.legend_orientation, show_legend, false),
        x_axis: axis(&form.x_axis_title, &form.x_axis_format),
        y_axis: axis(&form.y_axis_title, &form.y_axis_format),
        visual_map,
        series,
        tooltip: Tooltip {
            trigger: "item".to_string(),
            show_delay: 0,
            formatter: TooltipFormatter {
                x_field: fields.x_field,
                y_field: fields.y_field,
                size_field: fields.size_field,
                include_size: form.use_metric_for_bubble_size,
            },
        },
        dataset,
    }
}

/// Legend descriptor with orientation-dependent docking offsets.
pub fn legend_props(
    kind: LegendType,
    orientation: LegendOrientation,
    show: bool,
    zoomable: bool,
) -> Legend {
    let orient = match orientation {
        LegendOrientation::Top | LegendOrientation::Bottom => Orient::Horizontal,
        LegendOrientation::Left | LegendOrientation::Right => Orient::Vertical,
    };
    let mut legend = Legend {
        orient,
        show,
        kind,
        left: None,
        right: None,
        top: None,
        bottom: None,
    };
    match orientation {
        LegendOrientation::Left => legend.left = Some(0.0),
        LegendOrientation::Right => {
            legend.right = Some(0.0);
            legend.top = Some(if zoomable { LEGEND_RIGHT_TOP_OFFSET } else { 0.0 });
        }
        LegendOrientation::Bottom => legend.bottom = Some(0.0),
        LegendOrientation::Top => {
            legend.top = Some(0.0);
            legend.right = Some(if zoomable { LEGEND_TOP_RIGHT_OFFSET } else { 0.0 });
        }
    }
    legend
}

fn axis(title: &str, format: &str) -> Axis {
    Axis {
        name: title.to_string(),
        axis_label: AxisLabel {
            formatter: normalized_format(format),
        },
    }
}

/// Normalize a format descriptor for the IR: patterns the formatter cannot
/// parse degrade to the adaptive format rather than reaching the renderer
/// broken.
fn normalized_format(pattern: &str) -> String {
    match NumberFormatter::resolve(pattern) {
        NumberFormatter::Smart => "SMART_NUMBER".to_string(),
        NumberFormatter::D3(_) => pattern.trim().to_string(),
    }
}

/// The piecewise visual map for the k-means path: one discrete color piece
/// per cluster index, bound to the engine-written cluster dimension and
/// targeting the single cluster series.
fn build_visual_map(
    cluster_count: f64,
    dimension: usize,
    scale: &mut CategoricalColorScale,
) -> PiecewiseVisualMap {
    // NaN or negative counts produce no pieces, mirroring a loop bounded by
    // an unparseable control value.
    let count = if cluster_count.is_finite() && cluster_count > 0.0 {
        cluster_count as usize
    } else {
        0
    };
    let pieces = (0..count)
        .map(|index| VisualMapPiece {
            value: index,
            label: format!("Cluster - {}", index + 1),
            color: scale.color_of(&index.to_string()),
        })
        .collect();
    PiecewiseVisualMap {
        kind: "piecewise".to_string(),
        top: "top".to_string(),
        right: 0.0,
        orient: "horizontal".to_string(),
        min: 0.0,
        max: cluster_count,
        dimension,
        pieces,
        split_number: cluster_count,
        series_index: 0,
    }
}
