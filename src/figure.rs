//! Plotly figure JSON, the hand-off format for the browser charting library.

use serde::Serialize;
use serde_json::{Value, json};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const TEMPLATE: &str = "plotly_dark";

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn new(data: Vec<Value>, layout: Value) -> Self {
        Self { data, layout }
    }

    pub fn trace_count(&self) -> usize {
        self.data.len()
    }
}

/// X axis with calendar-ordered month abbreviations at ticks 1..=12.
pub fn month_axis() -> Value {
    json!({
        "title": { "text": "Month" },
        "tickmode": "array",
        "tickvals": (1..=12).collect::<Vec<u32>>(),
        "ticktext": MONTH_ABBREVIATIONS,
    })
}

/// Plotly axis id suffix: the first subplot uses `x`/`y`, later ones `x2`, `x3`, ...
pub fn axis_suffix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        (index + 1).to_string()
    }
}
