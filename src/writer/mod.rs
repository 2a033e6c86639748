//! Output writer abstraction
//!
//! Writers turn a chart configuration plus a query result into a
//! renderer-ready output. The single built-in writer targets the ECharts
//! option format; the trait keeps the seam open for other option dialects.

use crate::chart::form::ScatterFormData;
use crate::data::DataRecord;
use crate::Result;

pub mod echarts;

pub use echarts::EChartsScatterWriter;

/// Trait for chart-option writers.
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Generate output from a chart configuration and the query rows.
    ///
    /// # Errors
    ///
    /// Returns `ScattervizError::ConfigError` when the configuration fails
    /// [`validate`](Writer::validate), `ScattervizError::WriterError` when
    /// output generation fails. Data-shape edge cases (missing size field,
    /// empty grouping, empty row set) are resolved by fallback policy and
    /// never error.
    fn write(&self, form: &ScatterFormData, data: &[DataRecord]) -> Result<Self::Output>;

    /// Validate that a configuration can be rendered by this writer without
    /// generating output.
    fn validate(&self, form: &ScatterFormData) -> Result<()>;
}
