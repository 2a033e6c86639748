//! The plotting-option intermediate representation
//!
//! Typed, serde-serializable descriptors for everything the rendering engine
//! consumes: the layered dataset (positional source rows plus declarative
//! transform descriptors), per-group series, legend, axes, tooltip and the
//! piecewise visual map. The crate never evaluates filters or statistics;
//! layers ≥ 1 are instructions for the engine's transform runtime.
//!
//! # Dimension contract
//!
//! Every source-row tuple is positional: dimension 0 is X, 1 is Y, 2 is the
//! bubble size (null sentinel when unused) and dimensions from 3 upward hold
//! the group-name components. Filter descriptors and the tooltip formatter
//! index into tuples with these constants, so all tuples of one source layer
//! must share the same width.

pub mod tooltip;

pub use tooltip::{TooltipFormatter, TooltipItem, TooltipParams};

use crate::chart::form::{LegendType, RegressionMethod};
use crate::data::DataValue;
use serde::{Deserialize, Serialize};

/// Tuple dimension holding the X value.
pub const X_DIMENSION: usize = 0;
/// Tuple dimension holding the Y value.
pub const Y_DIMENSION: usize = 1;
/// Tuple dimension holding the bubble-size value (null sentinel when unused).
pub const BUBBLE_SIZE_DIMENSION: usize = 2;
/// First tuple dimension holding a group-name component.
pub const NAME_DIMENSION: usize = 3;

/// One positional dataset row.
pub type PositionalTuple = Vec<DataValue>;

// =============================================================================
// Top-level option
// =============================================================================

/// The assembled option object handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterOption {
    pub grid: Grid,
    pub legend: Legend,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Populated only on the k-means clustering path; empty otherwise.
    pub visual_map: Vec<PiecewiseVisualMap>,
    pub series: Vec<SeriesDescriptor>,
    pub tooltip: Tooltip,
    /// Layer 0 is the positional source; layers ≥ 1 are transform
    /// descriptors evaluated lazily by the engine.
    pub dataset: Vec<DatasetLayer>,
}

/// Plot-area insets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub contain_label: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 20.0,
            left: 20.0,
            right: 40.0,
            contain_label: true,
        }
    }
}

/// Legend layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    Horizontal,
    Vertical,
}

/// Legend descriptor with orientation-dependent docking offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub orient: Orient,
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: LegendType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

/// Axis descriptor: title plus label-format descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub name: String,
    pub axis_label: AxisLabel,
}

/// Axis label settings. `formatter` carries the normalized number-format
/// descriptor; the rendering host resolves it through
/// [`crate::format::NumberFormatter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLabel {
    pub formatter: String,
}

/// Tooltip descriptor. The formatter itself is not serialized; the
/// rendering host binds [`TooltipFormatter::format`] as the item callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: String,
    pub show_delay: u64,
    #[serde(skip)]
    pub formatter: TooltipFormatter,
}

// =============================================================================
// Series descriptors
// =============================================================================

/// Renderable series kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Scatter,
    Line,
}

/// One renderable series: a per-group scatter cloud or the synthetic
/// regression line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesDescriptor {
    Scatter(ScatterSeries),
    Line(LineSeries),
}

impl SeriesDescriptor {
    pub fn name(&self) -> &str {
        match self {
            SeriesDescriptor::Scatter(s) => &s.name,
            SeriesDescriptor::Line(s) => &s.name,
        }
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            SeriesDescriptor::Scatter(_) => SeriesKind::Scatter,
            SeriesDescriptor::Line(_) => SeriesKind::Line,
        }
    }

    /// 1-based index of the dataset layer this series reads.
    pub fn dataset_index(&self) -> usize {
        match self {
            SeriesDescriptor::Scatter(s) => s.dataset_index,
            SeriesDescriptor::Line(s) => s.dataset_index,
        }
    }
}

/// Per-group scatter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub dataset_index: usize,
    pub animation: bool,
    /// Present only when highlighting is enabled; absence means no emphasis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
    pub color: String,
    pub label: SeriesLabel,
    pub symbol_size: BubbleSizePolicy,
}

/// The synthetic regression line series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub dataset_index: usize,
    pub symbol_size: f64,
    pub symbol: String,
    pub smooth: bool,
    pub label: LineLabel,
    pub label_layout: LabelLayout,
    pub encode: LineEncode,
}

/// Hover emphasis behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Emphasis {
    pub focus: String,
}

/// Point-label settings on scatter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLabel {
    pub show: bool,
    pub formatter: String,
    pub min_margin: f64,
    pub position: String,
}

/// Label visibility on the regression line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLabel {
    pub show: bool,
}

/// Label placement nudge on the regression line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub dx: f64,
}

/// Dimension bindings for the regression line's label and tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEncode {
    pub label: usize,
    pub tooltip: usize,
}

/// How the renderer sizes each symbol: a flat pixel size, or a linear
/// rescale of the bubble-size dimension from the observed value range to the
/// configured pixel range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum BubbleSizePolicy {
    #[serde(rename_all = "camelCase")]
    Fixed { size: f64 },
    #[serde(rename_all = "camelCase")]
    Scaled {
        in_min: f64,
        in_max: f64,
        out_min: f64,
        out_max: f64,
    },
}

// =============================================================================
// Visual map
// =============================================================================

/// Piecewise visual map binding cluster indices to discrete colors.
/// Replaces the legend on the k-means clustering path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecewiseVisualMap {
    #[serde(rename = "type")]
    pub kind: String,
    pub top: String,
    pub right: f64,
    pub orient: String,
    pub min: f64,
    pub max: f64,
    /// Tuple dimension carrying the engine-computed cluster index.
    pub dimension: usize,
    pub pieces: Vec<VisualMapPiece>,
    pub split_number: f64,
    pub series_index: usize,
}

/// One discrete color piece of the visual map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMapPiece {
    pub value: usize,
    pub label: String,
    pub color: String,
}

// =============================================================================
// Dataset layers
// =============================================================================

/// One stage of the layered dataset: the positional source (layer 0) or a
/// declarative transform over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetLayer {
    Source { source: Vec<PositionalTuple> },
    Transform { transform: Transform },
}

impl DatasetLayer {
    pub fn is_source(&self) -> bool {
        matches!(self, DatasetLayer::Source { .. })
    }

    pub fn transform(&self) -> Option<&Transform> {
        match self {
            DatasetLayer::Transform { transform } => Some(transform),
            DatasetLayer::Source { .. } => None,
        }
    }
}

/// The transform-descriptor algebra evaluated by the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config")]
pub enum Transform {
    /// Subset of the upstream rows whose value at `dimension` equals `eq`.
    #[serde(rename = "filter")]
    Filter(FilterConfig),
    /// Statistics-engine regression over the upstream rows.
    #[serde(rename = "ecStat:regression")]
    Regression(RegressionConfig),
    /// Statistics-engine k-means over the upstream rows.
    #[serde(rename = "ecStat:clustering")]
    Clustering(ClusteringConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub dimension: usize,
    pub eq: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionConfig {
    pub method: RegressionMethod,
    /// Polynomial order; carried verbatim for every method (NaN serializes
    /// as null).
    pub order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteringConfig {
    pub cluster_count: f64,
    pub output_type: String,
    pub dimensions: Vec<usize>,
    /// Dimension index where the engine writes the cluster index; equals the
    /// source tuple width, extending each row by one trailing dimension.
    pub output_cluster_index_dimension: usize,
}
