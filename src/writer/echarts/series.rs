//! Series construction
//!
//! One scatter series per discovered group, reading the filter layer at the
//! matching 1-based dataset index, plus the optional synthetic regression
//! line reading the statistical layer appended last.

use crate::option::{
    BubbleSizePolicy, Emphasis, LabelLayout, LineEncode, LineLabel, LineSeries, ScatterSeries,
    SeriesDescriptor, SeriesKind, SeriesLabel,
};

/// Name of the synthetic regression series.
pub const REGRESSION_SERIES_NAME: &str = "Regression";

/// Build the scatter series for one group.
///
/// `dataset_index` is the group's 1-based ordinal (layer 0 is the source).
/// Emphasis is attached only when highlighting is enabled; the renderer
/// treats absence as "no emphasis".
pub fn scatter_series(
    name: &str,
    dataset_index: usize,
    color: String,
    show_highlighting: bool,
    show_labels: bool,
    symbol_size: BubbleSizePolicy,
) -> SeriesDescriptor {
    SeriesDescriptor::Scatter(ScatterSeries {
        name: name.to_string(),
        kind: SeriesKind::Scatter,
        dataset_index,
        animation: false,
        emphasis: show_highlighting.then(|| Emphasis {
            focus: "series".to_string(),
        }),
        color,
        label: SeriesLabel {
            show: show_labels,
            formatter: "{a}".to_string(),
            min_margin: 10.0,
            position: "top".to_string(),
        },
        symbol_size,
    })
}

/// Build the regression line series reading the last dataset layer.
pub fn regression_series(dataset_index: usize, show_label: bool) -> SeriesDescriptor {
    SeriesDescriptor::Line(LineSeries {
        name: REGRESSION_SERIES_NAME.to_string(),
        kind: SeriesKind::Line,
        dataset_index,
        symbol_size: 0.1,
        symbol: "circle".to_string(),
        smooth: true,
        label: LineLabel { show: show_label },
        label_layout: LabelLayout { dx: -20.0 },
        encode: LineEncode {
            label: 2,
            tooltip: 1,
        },
    })
}
