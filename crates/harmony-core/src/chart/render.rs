//! Render model for one chart frame.
//!
//! The front-end draws whatever `ChartFrame` describes; nothing here touches a
//! drawing surface.

use serde::{Deserialize, Serialize};

use super::axis::{Overlay, score};
use super::layout::{ChartLayout, LayoutKind, axis_angle};
use super::widget::RadarChart;
use crate::geometry::Point;

pub const GRID_STROKE: &str = "#e0e0e0";
pub const SPOKE_STROKE: &str = "#eee";
pub const CURRENT_FILL: &str = "rgba(100, 180, 255, 0.3)";
pub const CURRENT_STROKE: &str = "#64b4ff";
pub const IDEAL_FILL: &str = "rgba(255, 100, 180, 0.3)";
pub const IDEAL_STROKE: &str = "#ff64b4";

pub const NODE_RADIUS: f64 = 4.0;
/// Distance from a node to its score label, along the axis.
pub const SCORE_LABEL_OFFSET: f64 = 15.0;
const GRID_LEVELS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLayer {
    pub overlay: Overlay,
    pub points: Vec<Point>,
    pub fill: &'static str,
    pub stroke: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMarker {
    pub overlay: Overlay,
    pub axis: usize,
    pub position: Point,
    pub score: u8,
    pub score_position: Point,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub anchor: Point,
    pub label: String,
    /// Only present in the full-screen layout.
    pub description: Option<String>,
}

/// Everything needed to draw the chart once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub rings: Vec<Vec<Point>>,
    pub spokes: Vec<(Point, Point)>,
    pub polygons: Vec<PolygonLayer>,
    pub nodes: Vec<NodeMarker>,
    pub labels: Vec<AxisLabel>,
}

impl RadarChart {
    /// Builds the frame for `layout`: grid, spokes, polygons, nodes and labels.
    ///
    /// The current polygon is always drawn, the ideal one once ideal plotting
    /// has begun.
    pub fn render(&self, layout: &ChartLayout) -> ChartFrame {
        let count = self.axes().len();

        let rings = (1..=GRID_LEVELS)
            .map(|level| {
                let value = level as f64 / GRID_LEVELS as f64;
                (0..count)
                    .map(|i| layout.point_at(i, count, value))
                    .collect()
            })
            .collect();

        let spokes = (0..count)
            .map(|i| (layout.center, layout.point_at(i, count, 1.0)))
            .collect();

        let mut overlays = vec![(Overlay::Current, CURRENT_FILL, CURRENT_STROKE)];
        if self.shows_ideal() {
            overlays.push((Overlay::Ideal, IDEAL_FILL, IDEAL_STROKE));
        }

        let mut polygons = Vec::with_capacity(overlays.len());
        let mut nodes = Vec::with_capacity(overlays.len() * count);
        for (overlay, fill, stroke) in overlays {
            let points: Vec<Point> = self
                .axes()
                .iter()
                .enumerate()
                .map(|(i, axis)| layout.point_at(i, count, axis.value(overlay)))
                .collect();

            for (i, position) in points.iter().enumerate() {
                let angle = axis_angle(i, count);
                nodes.push(NodeMarker {
                    overlay,
                    axis: i,
                    position: *position,
                    score: score(self.axes()[i].value(overlay)),
                    score_position: position.offset(
                        angle.cos() * SCORE_LABEL_OFFSET,
                        angle.sin() * SCORE_LABEL_OFFSET + 3.0,
                    ),
                    color: stroke,
                });
            }

            polygons.push(PolygonLayer {
                overlay,
                points,
                fill,
                stroke,
            });
        }

        let labels = self
            .axes()
            .iter()
            .enumerate()
            .map(|(i, axis)| AxisLabel {
                anchor: layout.label_anchor(i, count),
                label: axis.label.clone(),
                description: match layout.kind {
                    LayoutKind::FullScreen => Some(axis.description.clone()),
                    LayoutKind::Sidebar => None,
                },
            })
            .collect();

        ChartFrame {
            rings,
            spokes,
            polygons,
            nodes,
            labels,
        }
    }
}
