//! Tooltip formatting contract
//!
//! The rendering host binds [`TooltipFormatter::format`] as the item-hover
//! callback. Only single-point hover is supported: an array-shaped payload
//! (multi-series trigger) formats to the empty string rather than failing;
//! some historical renderers delivered batched payloads even with item
//! trigger configured.

use super::{BUBBLE_SIZE_DIMENSION, NAME_DIMENSION, X_DIMENSION, Y_DIMENSION};
use crate::data::DataValue;
use serde::{Deserialize, Serialize};

/// Hover payload delivered by the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TooltipParams {
    /// Single hovered point.
    Item(TooltipItem),
    /// Batched multi-series payload (unsupported; formats to "").
    Batch(Vec<TooltipItem>),
}

/// One hovered point: its positional tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub value: Vec<DataValue>,
}

/// Renders group name(s) plus the X/Y (and size, when used) values of the
/// hovered point.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipFormatter {
    pub x_field: String,
    pub y_field: String,
    pub size_field: Option<String>,
    /// Include the size line only when bubble sizing reads the size metric.
    pub include_size: bool,
}

impl TooltipFormatter {
    pub fn format(&self, params: &TooltipParams) -> String {
        let item = match params {
            TooltipParams::Item(item) => item,
            TooltipParams::Batch(_) => return String::new(),
        };

        let names: Vec<String> = item
            .value
            .iter()
            .skip(NAME_DIMENSION)
            .map(DataValue::to_string)
            .collect();

        let mut out = format!(
            "{}<br>{}：{}<br>{}：{}<br>",
            names.join(" - "),
            self.x_field,
            dimension(item, X_DIMENSION),
            self.y_field,
            dimension(item, Y_DIMENSION),
        );
        if self.include_size {
            out.push_str(&format!(
                "{}：{}<br>",
                self.size_field.as_deref().unwrap_or(""),
                dimension(item, BUBBLE_SIZE_DIMENSION),
            ));
        }
        out
    }
}

fn dimension(item: &TooltipItem, index: usize) -> String {
    item.value
        .get(index)
        .map(DataValue::to_string)
        .unwrap_or_else(|| "null".to_string())
}
