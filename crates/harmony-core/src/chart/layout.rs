//! Placement of the radar chart on screen.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::axis::clamp_value;
use crate::geometry::{Point, Viewport};

/// Distance from the outer ring to the axis labels.
pub const LABEL_GAP: f64 = 40.0;

/// Height used for the sidebar when its container reports none.
pub const SIDEBAR_FALLBACK_HEIGHT: f64 = 300.0;

/// Where the chart is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// The chart fills the viewport while the user plots values.
    FullScreen,
    /// The chart sits in the reflection sidebar.
    Sidebar,
}

/// Center and radius of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub kind: LayoutKind,
    pub center: Point,
    pub radius: f64,
}

impl ChartLayout {
    pub fn full_screen(viewport: Viewport) -> Self {
        let center = viewport.center();
        Self {
            kind: LayoutKind::FullScreen,
            center,
            radius: center.x.min(center.y) * 0.6,
        }
    }

    pub fn sidebar(width: f64, height: f64) -> Self {
        let height = if height > 0.0 {
            height
        } else {
            SIDEBAR_FALLBACK_HEIGHT
        };
        let center = Point::new(width / 2.0, height / 2.0);
        Self {
            kind: LayoutKind::Sidebar,
            center,
            radius: center.x.min(center.y) * 0.7,
        }
    }

    /// Point at `value` along axis `index` of `count`.
    pub fn point_at(&self, index: usize, count: usize, value: f64) -> Point {
        let angle = axis_angle(index, count);
        Point::new(
            self.center.x + angle.cos() * value * self.radius,
            self.center.y + angle.sin() * value * self.radius,
        )
    }

    /// Value represented by a pointer's distance from the center.
    pub fn value_at(&self, pointer: Point) -> f64 {
        if self.radius <= 0.0 {
            return clamp_value(f64::NAN);
        }
        clamp_value(self.center.distance_to(pointer) / self.radius)
    }

    /// Anchor point for the label of axis `index`.
    pub fn label_anchor(&self, index: usize, count: usize) -> Point {
        let angle = axis_angle(index, count);
        let label_radius = self.radius + LABEL_GAP;
        let x = self.center.x + angle.cos() * label_radius;
        let y = self.center.y + angle.sin() * label_radius;
        match self.kind {
            LayoutKind::FullScreen => Point::new(x - 100.0, y - 20.0),
            LayoutKind::Sidebar => Point::new(x - 50.0, y - 10.0),
        }
    }
}

/// Angle of axis `index` of `count`, starting straight up and turning clockwise.
pub fn axis_angle(index: usize, count: usize) -> f64 {
    if count == 0 {
        return -PI / 2.0;
    }
    index as f64 * (2.0 * PI / count as f64) - PI / 2.0
}
