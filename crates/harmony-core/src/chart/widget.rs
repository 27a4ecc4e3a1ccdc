//! The radar-chart widget: two overlays plotted in sequence.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::axis::{ChartAxis, Overlay, default_axes};
use super::layout::ChartLayout;
use crate::error::{HarmonyError, Result};
use crate::geometry::Point;
use crate::prompt::AxisReading;

/// Default pixel radius around a node that starts a drag.
pub const DEFAULT_HIT_RADIUS: f64 = 30.0;

/// Which overlay the user is plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartMode {
    /// Plotting the current self.
    Current,
    /// Plotting the ideal self.
    Ideal,
    /// Both overlays are final; the chart is read-only.
    Complete,
}

/// Result of pressing the chart's action button.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartAdvance {
    /// Ideal plotting began; ideal values were seeded from current values.
    EnteredIdeal,
    /// Both overlays are final.
    Completed(ChartSnapshot),
}

/// Final values of both overlays, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub axes: Vec<ChartAxis>,
}

impl ChartSnapshot {
    /// Axis readings on the 1–10 display scale.
    pub fn readings(&self) -> Vec<AxisReading> {
        self.axes
            .iter()
            .map(|axis| AxisReading::new(&axis.label, axis.current_score(), axis.ideal_score()))
            .collect()
    }
}

/// Radar chart state: axes plus the plotting mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarChart {
    axes: Vec<ChartAxis>,
    mode: ChartMode,
    hit_radius: f64,
}

impl Default for RadarChart {
    fn default() -> Self {
        Self::new(default_axes(), DEFAULT_HIT_RADIUS)
    }
}

impl RadarChart {
    pub fn new(axes: Vec<ChartAxis>, hit_radius: f64) -> Self {
        Self {
            axes,
            mode: ChartMode::Current,
            hit_radius,
        }
    }

    pub fn axes(&self) -> &[ChartAxis] {
        &self.axes
    }

    pub fn mode(&self) -> ChartMode {
        self.mode
    }

    /// Label of the action button, if the chart still accepts one.
    pub fn action_label(&self) -> Option<&'static str> {
        match self.mode {
            ChartMode::Current => Some("Next"),
            ChartMode::Ideal => Some("Complete Today's Entry"),
            ChartMode::Complete => None,
        }
    }

    pub fn header(&self) -> &'static str {
        match self.mode {
            ChartMode::Current => "The Architecture of Self",
            ChartMode::Ideal | ChartMode::Complete => "Plot your Ideal Self",
        }
    }

    /// The overlay that drags modify, if any.
    pub fn editable_overlay(&self) -> Option<Overlay> {
        match self.mode {
            ChartMode::Current => Some(Overlay::Current),
            ChartMode::Ideal => Some(Overlay::Ideal),
            ChartMode::Complete => None,
        }
    }

    /// Whether the ideal polygon is drawn.
    pub fn shows_ideal(&self) -> bool {
        self.mode != ChartMode::Current
    }

    /// Finds the node of the editable overlay within the hit radius of `pointer`.
    ///
    /// When several nodes qualify the last one in display order wins.
    pub fn hit_test(&self, pointer: Point, layout: &ChartLayout) -> Option<usize> {
        let overlay = self.editable_overlay()?;
        let count = self.axes.len();
        self.axes
            .iter()
            .enumerate()
            .filter(|(i, axis)| {
                layout
                    .point_at(*i, count, axis.value(overlay))
                    .distance_to(pointer)
                    < self.hit_radius
            })
            .map(|(i, _)| i)
            .last()
    }

    /// Sets the dragged axis from the pointer's distance to the center.
    ///
    /// Returns the new value, or `None` when nothing is editable.
    pub fn drag_to(&mut self, index: usize, pointer: Point, layout: &ChartLayout) -> Option<f64> {
        let overlay = self.editable_overlay()?;
        let value = layout.value_at(pointer);
        let axis = self.axes.get_mut(index)?;
        axis.set_value(overlay, value);
        Some(axis.value(overlay))
    }

    /// Sets a value directly on the editable overlay.
    pub fn set_value(&mut self, index: usize, value: f64) -> Option<f64> {
        let overlay = self.editable_overlay()?;
        let axis = self.axes.get_mut(index)?;
        axis.set_value(overlay, value);
        Some(axis.value(overlay))
    }

    /// Advances `current → ideal → complete`.
    pub fn advance(&mut self) -> Result<ChartAdvance> {
        match self.mode {
            ChartMode::Current => {
                for axis in &mut self.axes {
                    axis.ideal = axis.current;
                }
                self.mode = ChartMode::Ideal;
                Ok(ChartAdvance::EnteredIdeal)
            }
            ChartMode::Ideal => {
                self.mode = ChartMode::Complete;
                Ok(ChartAdvance::Completed(self.snapshot()))
            }
            ChartMode::Complete => Err(HarmonyError::invalid_transition(
                "advance the chart",
                "a completed chart",
            )),
        }
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            axes: self.axes.clone(),
        }
    }
}
