//! Pointer input: one state machine for both draggable scenes.

use serde::{Deserialize, Serialize};

use crate::blobs::ShapeId;
use crate::geometry::Point;

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } => Some(Point::new(x, y)),
            Self::Up => None,
        }
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    /// A shape follows the pointer by the delta from `pointer_start`.
    DraggingShape {
        id: ShapeId,
        pointer_start: Point,
        origin: Point,
    },
    /// A chart node follows the pointer's distance from the center.
    DraggingChartNode { index: usize },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// New shape center for a pointer at `pointer`, if a shape is being dragged.
    pub fn shape_target(&self, pointer: Point) -> Option<(ShapeId, Point)> {
        match *self {
            Self::DraggingShape {
                id,
                pointer_start,
                origin,
            } => Some((
                id,
                origin.offset(pointer.x - pointer_start.x, pointer.y - pointer_start.y),
            )),
            _ => None,
        }
    }
}

/// Observable effect of one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PointerOutcome {
    /// Nothing was under the pointer, no drag was active, or the scene does
    /// not take pointer input.
    Ignored,
    ShapePressed {
        id: ShapeId,
        next_revealed: bool,
    },
    ShapeMoved {
        id: ShapeId,
        intensity: f64,
    },
    NodeGrabbed {
        index: usize,
    },
    NodeMoved {
        index: usize,
        value: f64,
    },
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_target_applies_delta() {
        let state = InteractionState::DraggingShape {
            id: ShapeId::Presented,
            pointer_start: Point::new(100.0, 100.0),
            origin: Point::new(300.0, 200.0),
        };
        let (id, center) = state.shape_target(Point::new(130.0, 90.0)).unwrap();
        assert_eq!(id, ShapeId::Presented);
        assert_eq!(center, Point::new(330.0, 190.0));
    }

    #[test]
    fn test_idle_has_no_target() {
        assert!(InteractionState::Idle.is_idle());
        assert!(
            InteractionState::Idle
                .shape_target(Point::new(1.0, 1.0))
                .is_none()
        );
        assert!(
            InteractionState::DraggingChartNode { index: 2 }
                .shape_target(Point::new(1.0, 1.0))
                .is_none()
        );
    }

    #[test]
    fn test_up_has_no_position() {
        assert!(PointerEvent::Up.position().is_none());
        assert_eq!(
            PointerEvent::Move { x: 2.0, y: 3.0 }.position(),
            Some(Point::new(2.0, 3.0))
        );
    }
}
