//! Radar-chart domain module.
//!
//! # Module Structure
//!
//! - `axis`: The seven self dimensions and value clamping
//! - `layout`: Screen placement, angles and pointer-to-value mapping
//! - `widget`: The `current → ideal → complete` state machine
//! - `render`: Per-frame render model

mod axis;
mod layout;
mod render;
mod widget;

use chrono::NaiveDate;

pub use axis::{
    ChartAxis, INITIAL_VALUE, MAX_VALUE, MIN_VALUE, Overlay, SELF_DIMENSIONS, clamp_value,
    default_axes, score,
};
pub use layout::{ChartLayout, LayoutKind, axis_angle};
pub use render::{
    AxisLabel, CURRENT_FILL, CURRENT_STROKE, ChartFrame, GRID_STROKE, IDEAL_FILL, IDEAL_STROKE,
    NODE_RADIUS, NodeMarker, PolygonLayer, SPOKE_STROKE,
};
pub use widget::{ChartAdvance, ChartMode, ChartSnapshot, DEFAULT_HIT_RADIUS, RadarChart};

/// Long-form date shown above the chart, e.g. "Monday, October 19, 2026".
pub fn entry_date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// One row of the reflection sidebar's metric list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricListItem {
    pub label: String,
    pub current_score: u8,
    pub ideal_score: u8,
    pub description: String,
}

impl MetricListItem {
    pub fn meta(&self) -> String {
        format!(
            "Current: {} / Ideal: {}",
            self.current_score, self.ideal_score
        )
    }
}

impl ChartSnapshot {
    pub fn metric_list(&self) -> Vec<MetricListItem> {
        self.axes
            .iter()
            .map(|axis| MetricListItem {
                label: axis.label.clone(),
                current_score: axis.current_score(),
                ideal_score: axis.ideal_score(),
                description: axis.description.clone(),
            })
            .collect()
    }
}
