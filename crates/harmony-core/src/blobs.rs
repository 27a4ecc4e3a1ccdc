//! The two draggable self-representations and their overlap.
//!
//! The blob field is the first scene: the user drags two circles toward or away
//! from each other, and the overlap between them becomes the session's
//! congruence score.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::geometry::{Point, Viewport};

/// Number of presses after which the "next" affordance is revealed.
pub const INTERACTIONS_BEFORE_NEXT: u32 = 3;

/// Intensity above which the touch note becomes visible.
pub const TOUCH_NOTE_THRESHOLD: f64 = 0.3;

/// Identifies one of the two shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ShapeId {
    /// The shape representing how the user sees themselves.
    SelfConcept,
    /// The shape representing who the user feels they are for others.
    Presented,
}

/// A draggable circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub center: Point,
    pub radius: f64,
    /// Whether the idle floating animation is still running.
    pub animating: bool,
}

impl Shape {
    pub fn new(id: ShapeId, center: Point, radius: f64) -> Self {
        Self {
            id,
            center,
            radius,
            animating: true,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

/// Computes overlap intensity between two circles.
///
/// `clamp(1 - distance / (r1 + r2), 0, 1)`: 0 once the circles no longer
/// intersect, 1 when they are concentric.
pub fn overlap_intensity(a: &Shape, b: &Shape) -> f64 {
    let radius_sum = a.radius + b.radius;
    if radius_sum <= 0.0 {
        return 0.0;
    }
    let raw = 1.0 - a.center.distance_to(b.center) / radius_sum;
    raw.clamp(0.0, 1.0)
}

/// Converts an intensity in [0,1] to the persisted congruence percentage.
pub fn congruence_percent(intensity: f64) -> u8 {
    (intensity.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Label shown between the shapes when they overlap strongly enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchNote {
    pub position: Point,
    pub opacity: f64,
}

/// The blob scene: two shapes, the current overlap, and the press counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobField {
    shapes: [Shape; 2],
    intensity: f64,
    interaction_count: u32,
}

impl BlobField {
    /// Places both shapes on the horizontal midline, far enough apart not to touch.
    pub fn new(viewport: Viewport, radius: f64) -> Self {
        let y = viewport.height / 2.0;
        let shapes = [
            Shape::new(
                ShapeId::SelfConcept,
                Point::new(viewport.width * 0.3, y),
                radius,
            ),
            Shape::new(ShapeId::Presented, Point::new(viewport.width * 0.7, y), radius),
        ];
        let mut field = Self {
            shapes,
            intensity: 0.0,
            interaction_count: 0,
        };
        field.recompute();
        field
    }

    pub fn with_shapes(a: Shape, b: Shape) -> Self {
        let mut field = Self {
            shapes: [a, b],
            intensity: 0.0,
            interaction_count: 0,
        };
        field.recompute();
        field
    }

    pub fn shapes(&self) -> &[Shape; 2] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> &Shape {
        match id {
            ShapeId::SelfConcept => &self.shapes[0],
            ShapeId::Presented => &self.shapes[1],
        }
    }

    fn shape_mut(&mut self, id: ShapeId) -> &mut Shape {
        match id {
            ShapeId::SelfConcept => &mut self.shapes[0],
            ShapeId::Presented => &mut self.shapes[1],
        }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn congruence(&self) -> u8 {
        congruence_percent(self.intensity)
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    /// Whether the user has interacted enough to move on.
    pub fn next_revealed(&self) -> bool {
        self.interaction_count >= INTERACTIONS_BEFORE_NEXT
    }

    /// Returns the topmost shape under `point`.
    ///
    /// The second shape is drawn above the first, so it is tested first.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.contains(point))
            .map(|shape| shape.id)
    }

    /// Starts a drag: stops the idle animation and counts the interaction.
    ///
    /// Returns the shape's center at the moment of the press.
    pub fn press(&mut self, id: ShapeId) -> Point {
        self.interaction_count += 1;
        let shape = self.shape_mut(id);
        shape.animating = false;
        shape.center
    }

    /// Moves a shape to `center` and recomputes the overlap.
    pub fn move_shape(&mut self, id: ShapeId, center: Point) -> f64 {
        self.shape_mut(id).center = center;
        self.recompute()
    }

    fn recompute(&mut self) -> f64 {
        self.intensity = overlap_intensity(&self.shapes[0], &self.shapes[1]);
        self.intensity
    }

    /// The touch note, present only while intensity exceeds the threshold.
    pub fn touch_note(&self) -> Option<TouchNote> {
        if self.intensity > TOUCH_NOTE_THRESHOLD {
            Some(TouchNote {
                position: self.shapes[0].center.midpoint(self.shapes[1].center),
                opacity: self.intensity,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(id: ShapeId, x: f64, y: f64, r: f64) -> Shape {
        Shape::new(id, Point::new(x, y), r)
    }

    #[test]
    fn test_overlap_zero_when_apart() {
        let a = circle(ShapeId::SelfConcept, 0.0, 0.0, 50.0);
        let b = circle(ShapeId::Presented, 100.0, 0.0, 50.0);
        assert_eq!(overlap_intensity(&a, &b), 0.0);

        let far = circle(ShapeId::Presented, 1000.0, 1000.0, 50.0);
        assert_eq!(overlap_intensity(&a, &far), 0.0);
    }

    #[test]
    fn test_overlap_one_when_concentric() {
        let a = circle(ShapeId::SelfConcept, 200.0, 200.0, 80.0);
        let b = circle(ShapeId::Presented, 200.0, 200.0, 40.0);
        assert_eq!(overlap_intensity(&a, &b), 1.0);
    }

    #[test]
    fn test_overlap_is_linear_in_between() {
        let a = circle(ShapeId::SelfConcept, 0.0, 0.0, 50.0);
        let b = circle(ShapeId::Presented, 50.0, 0.0, 50.0);
        assert!((overlap_intensity(&a, &b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_always_in_unit_range() {
        let a = circle(ShapeId::SelfConcept, 0.0, 0.0, 30.0);
        for step in 0..200 {
            let x = step as f64 * 3.7 - 300.0;
            let b = circle(ShapeId::Presented, x, x / 2.0, 45.0);
            let value = overlap_intensity(&a, &b);
            assert!((0.0..=1.0).contains(&value), "out of range at {x}: {value}");
        }
    }

    #[test]
    fn test_congruence_rounds() {
        assert_eq!(congruence_percent(0.0), 0);
        assert_eq!(congruence_percent(0.394), 39);
        assert_eq!(congruence_percent(0.396), 40);
        assert_eq!(congruence_percent(1.0), 100);
    }

    #[test]
    fn test_new_field_starts_apart() {
        let field = BlobField::new(Viewport::new(1280.0, 800.0), 110.0);
        assert_eq!(field.intensity(), 0.0);
        assert!(field.touch_note().is_none());
        assert!(!field.next_revealed());
    }

    #[test]
    fn test_hit_test_prefers_top_shape() {
        let field = BlobField::with_shapes(
            circle(ShapeId::SelfConcept, 100.0, 100.0, 60.0),
            circle(ShapeId::Presented, 140.0, 100.0, 60.0),
        );
        assert_eq!(field.hit_test(Point::new(120.0, 100.0)), Some(ShapeId::Presented));
        assert_eq!(field.hit_test(Point::new(50.0, 100.0)), Some(ShapeId::SelfConcept));
        assert_eq!(field.hit_test(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_touch_note_follows_midpoint() {
        let mut field = BlobField::with_shapes(
            circle(ShapeId::SelfConcept, 0.0, 0.0, 50.0),
            circle(ShapeId::Presented, 300.0, 0.0, 50.0),
        );
        field.move_shape(ShapeId::Presented, Point::new(20.0, 0.0));
        let note = field.touch_note().expect("note should be visible");
        assert_eq!(note.position, Point::new(10.0, 0.0));
        assert!((note.opacity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_press_stops_animation_and_counts() {
        let mut field = BlobField::new(Viewport::new(800.0, 600.0), 80.0);
        assert!(field.shape(ShapeId::SelfConcept).animating);
        field.press(ShapeId::SelfConcept);
        field.press(ShapeId::Presented);
        assert!(!field.shape(ShapeId::SelfConcept).animating);
        assert!(!field.next_revealed());
        field.press(ShapeId::SelfConcept);
        assert!(field.next_revealed());
    }
}
