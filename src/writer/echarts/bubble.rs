//! Bubble sizing
//!
//! Symbol sizes either stay flat (the configured bubble size) or rescale the
//! size dimension linearly from the observed value range to the configured
//! pixel range. The observed range is reduced with a seed of `0`, which
//! biases the range whenever every size value shares a sign; kept verbatim
//! for output compatibility with existing dashboards.

use crate::chart::fields::FieldSpec;
use crate::chart::form::ScatterFormData;
use crate::data::{DataRecord, DataValue};
use crate::option::{BubbleSizePolicy, BUBBLE_SIZE_DIMENSION};

/// Linear rescale of `value` from `[in_min, in_max]` to
/// `[out_min, out_max]`. A degenerate input range clamps to `out_min`
/// instead of dividing by zero.
pub fn scale_to_bubble_size(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> f64 {
    if in_min == in_max {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Observed `(min, max)` of the size field across all rows, reduced with
/// seed `0`. Non-numeric cells are skipped.
pub fn observed_size_range(rows: &[DataRecord], size_field: Option<&str>) -> (f64, f64) {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    if let Some(field) = size_field {
        for row in rows {
            if let Some(value) = row.get(field).and_then(DataValue::as_f64) {
                min = min.min(value);
                max = max.max(value);
            }
        }
    }
    (min, max)
}

/// Derive the symbol-size policy for this invocation.
pub fn size_policy(
    form: &ScatterFormData,
    fields: &FieldSpec,
    rows: &[DataRecord],
) -> BubbleSizePolicy {
    if !form.use_metric_for_bubble_size {
        return BubbleSizePolicy::Fixed {
            size: form.bubble_size_px(),
        };
    }
    let (in_min, in_max) = observed_size_range(rows, fields.size_field.as_deref());
    BubbleSizePolicy::Scaled {
        in_min,
        in_max,
        out_min: form.min_bubble_size_px(),
        out_max: form.max_bubble_size_px(),
    }
}

impl BubbleSizePolicy {
    /// Symbol size for one positional tuple.
    pub fn symbol_size(&self, tuple: &[DataValue]) -> f64 {
        match self {
            BubbleSizePolicy::Fixed { size } => *size,
            BubbleSizePolicy::Scaled {
                in_min,
                in_max,
                out_min,
                out_max,
            } => {
                let value = tuple
                    .get(BUBBLE_SIZE_DIMENSION)
                    .and_then(DataValue::as_f64)
                    .unwrap_or(f64::NAN);
                scale_to_bubble_size(value, *in_min, *in_max, *out_min, *out_max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_scaling_law_endpoints() {
        assert_eq!(scale_to_bubble_size(0.0, 0.0, 263.0, 5.0, 25.0), 5.0);
        assert_eq!(scale_to_bubble_size(263.0, 0.0, 263.0, 5.0, 25.0), 25.0);
    }

    #[test]
    fn test_degenerate_range_clamps_to_out_min() {
        assert_eq!(scale_to_bubble_size(10.0, 10.0, 10.0, 5.0, 25.0), 5.0);
    }

    #[test]
    fn test_observed_range_seeded_at_zero() {
        let rows: Vec<DataRecord> = serde_json::from_value(json!([
            {"AIR_TIME": 169},
            {"AIR_TIME": 263},
        ]))
        .unwrap();
        // All-positive values: the zero seed pins the minimum at 0.
        assert_eq!(observed_size_range(&rows, Some("AIR_TIME")), (0.0, 263.0));

        let negative: Vec<DataRecord> = serde_json::from_value(json!([
            {"delay": -5},
            {"delay": -30},
        ]))
        .unwrap();
        // All-negative values: the zero seed pins the maximum at 0.
        assert_eq!(observed_size_range(&negative, Some("delay")), (-30.0, 0.0));

        assert_eq!(observed_size_range(&rows, None), (0.0, 0.0));
    }

    #[test]
    fn test_fixed_policy_ignores_tuple_value() {
        let policy = BubbleSizePolicy::Fixed { size: 25.0 };
        let tuple = vec![
            DataValue::Number(1.0),
            DataValue::Number(2.0),
            DataValue::Number(999.0),
        ];
        assert_eq!(policy.symbol_size(&tuple), 25.0);
    }

    #[test]
    fn test_scaled_policy_reads_size_dimension() {
        let policy = BubbleSizePolicy::Scaled {
            in_min: 0.0,
            in_max: 100.0,
            out_min: 5.0,
            out_max: 25.0,
        };
        let tuple = vec![
            DataValue::Number(1.0),
            DataValue::Number(2.0),
            DataValue::Number(50.0),
        ];
        assert_eq!(policy.symbol_size(&tuple), 15.0);
    }

    proptest! {
        /// `scale(in_min) == out_min` and `scale(in_max) == out_max` for any
        /// non-degenerate input range.
        #[test]
        fn prop_scaling_law(
            in_min in -1e6f64..1e6,
            in_max in -1e6f64..1e6,
            out_min in 0.0f64..100.0,
            out_max in 0.0f64..100.0,
        ) {
            prop_assume!(in_min != in_max);
            let at_min = scale_to_bubble_size(in_min, in_min, in_max, out_min, out_max);
            let at_max = scale_to_bubble_size(in_max, in_min, in_max, out_min, out_max);
            prop_assert!((at_min - out_min).abs() < 1e-9);
            prop_assert!((at_max - out_max).abs() < 1e-9);
        }
    }
}
