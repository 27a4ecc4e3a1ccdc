//! The explicit per-session state object.

use serde::{Deserialize, Serialize};

use super::scene::Scene;
use crate::blobs::BlobField;
use crate::chart::{ChartAdvance, ChartLayout, ChartSnapshot, RadarChart};
use crate::config::{ChartConfig, SceneConfig};
use crate::error::{HarmonyError, Result};
use crate::geometry::Viewport;
use crate::interaction::{InteractionState, PointerEvent, PointerOutcome};

/// Width of the reflection sidebar the chart moves into.
pub const SIDEBAR_WIDTH: f64 = 300.0;

/// Everything one session knows, mutated only through its methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    scene: Scene,
    user_name: Option<String>,
    viewport: Viewport,
    blobs: BlobField,
    chart: RadarChart,
    layout: ChartLayout,
    interaction: InteractionState,
}

impl SessionState {
    pub fn new(scene: &SceneConfig, chart: &ChartConfig) -> Self {
        let viewport = Viewport::new(scene.width, scene.height);
        Self {
            scene: Scene::Start,
            user_name: None,
            viewport,
            blobs: BlobField::new(viewport, scene.shape_radius),
            chart: RadarChart::new(crate::chart::default_axes(), chart.hit_radius),
            layout: ChartLayout::full_screen(viewport),
            interaction: InteractionState::Idle,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn blobs(&self) -> &BlobField {
        &self.blobs
    }

    pub fn chart(&self) -> &RadarChart {
        &self.chart
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Leaves the start screen.
    ///
    /// Returns `Ok(false)` when the session had already started; the name is
    /// not replaced.
    pub fn begin(&mut self, name: &str) -> Result<bool> {
        if self.scene != Scene::Start {
            return Ok(false);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(HarmonyError::MissingIdentity);
        }
        self.user_name = Some(name.to_string());
        self.scene = Scene::Blobs;
        Ok(true)
    }

    /// Routes a pointer event to the active scene's drag target.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        if !self.scene.takes_pointer_input() {
            return PointerOutcome::Ignored;
        }

        match event {
            PointerEvent::Down { .. } => self.pointer_down(event),
            PointerEvent::Move { .. } => self.pointer_move(event),
            PointerEvent::Up => {
                if self.interaction.is_idle() {
                    PointerOutcome::Ignored
                } else {
                    self.interaction = InteractionState::Idle;
                    PointerOutcome::Released
                }
            }
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) -> PointerOutcome {
        let Some(pointer) = event.position() else {
            return PointerOutcome::Ignored;
        };

        match self.scene {
            Scene::Blobs => {
                let Some(id) = self.blobs.hit_test(pointer) else {
                    return PointerOutcome::Ignored;
                };
                let origin = self.blobs.press(id);
                self.interaction = InteractionState::DraggingShape {
                    id,
                    pointer_start: pointer,
                    origin,
                };
                PointerOutcome::ShapePressed {
                    id,
                    next_revealed: self.blobs.next_revealed(),
                }
            }
            Scene::Chart => match self.chart.hit_test(pointer, &self.layout) {
                Some(index) => {
                    self.interaction = InteractionState::DraggingChartNode { index };
                    PointerOutcome::NodeGrabbed { index }
                }
                None => PointerOutcome::Ignored,
            },
            _ => PointerOutcome::Ignored,
        }
    }

    fn pointer_move(&mut self, event: PointerEvent) -> PointerOutcome {
        let Some(pointer) = event.position() else {
            return PointerOutcome::Ignored;
        };

        match self.interaction {
            InteractionState::Idle => PointerOutcome::Ignored,
            InteractionState::DraggingShape { .. } => {
                match self.interaction.shape_target(pointer) {
                    Some((id, center)) => PointerOutcome::ShapeMoved {
                        id,
                        intensity: self.blobs.move_shape(id, center),
                    },
                    None => PointerOutcome::Ignored,
                }
            }
            InteractionState::DraggingChartNode { index } => {
                match self.chart.drag_to(index, pointer, &self.layout) {
                    Some(value) => PointerOutcome::NodeMoved { index, value },
                    None => PointerOutcome::Ignored,
                }
            }
        }
    }

    /// Leaves the blob scene and returns the congruence percentage.
    pub fn finish_blobs(&mut self) -> Result<u8> {
        if self.scene != Scene::Blobs {
            return Err(HarmonyError::invalid_transition(
                "finish the blob exercise",
                self.scene,
            ));
        }
        if !self.blobs.next_revealed() {
            return Err(HarmonyError::invalid_transition(
                "move on before three shape presses",
                self.scene,
            ));
        }
        self.interaction = InteractionState::Idle;
        self.scene = Scene::Chart;
        Ok(self.blobs.congruence())
    }

    /// Sets an axis of the overlay being plotted, on the 0.1–1.0 scale.
    pub fn set_chart_value(&mut self, index: usize, value: f64) -> Result<f64> {
        if self.scene != Scene::Chart {
            return Err(HarmonyError::invalid_transition("edit the chart", self.scene));
        }
        self.chart
            .set_value(index, value)
            .ok_or_else(|| HarmonyError::invalid_transition("edit this axis", self.chart.mode()))
    }

    /// Presses the chart's action button.
    ///
    /// Completion moves the chart into the sidebar and enters the reflection
    /// scene.
    pub fn advance_chart(&mut self) -> Result<ChartAdvance> {
        if self.scene != Scene::Chart {
            return Err(HarmonyError::invalid_transition("advance the chart", self.scene));
        }
        let advance = self.chart.advance()?;
        self.interaction = InteractionState::Idle;
        if matches!(advance, ChartAdvance::Completed(_)) {
            self.scene = Scene::Reflection;
            self.layout = ChartLayout::sidebar(SIDEBAR_WIDTH, 0.0);
        }
        Ok(advance)
    }

    pub fn chart_snapshot(&self) -> ChartSnapshot {
        self.chart.snapshot()
    }

    /// Congruence as recorded when the blob scene ended.
    pub fn congruence(&self) -> u8 {
        self.blobs.congruence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobs::ShapeId;
    use crate::chart::ChartMode;
    use crate::geometry::Point;

    fn state() -> SessionState {
        SessionState::new(&SceneConfig::default(), &ChartConfig::default())
    }

    fn started() -> SessionState {
        let mut state = state();
        state.begin("Ada").unwrap();
        state
    }

    fn press_shape(state: &mut SessionState, id: ShapeId) -> PointerOutcome {
        let center = state.blobs().shape(id).center;
        state.handle_pointer(PointerEvent::Down {
            x: center.x,
            y: center.y,
        })
    }

    #[test]
    fn test_begin_requires_name() {
        let mut state = state();
        assert!(matches!(
            state.begin("   "),
            Err(HarmonyError::MissingIdentity)
        ));
        assert_eq!(state.scene(), Scene::Start);

        assert!(state.begin("  Ada ").unwrap());
        assert_eq!(state.user_name(), Some("Ada"));
        assert_eq!(state.scene(), Scene::Blobs);

        assert!(!state.begin("Grace").unwrap());
        assert_eq!(state.user_name(), Some("Ada"));
    }

    #[test]
    fn test_pointer_ignored_before_start() {
        let mut state = state();
        let center = state.blobs().shape(ShapeId::SelfConcept).center;
        assert_eq!(
            state.handle_pointer(PointerEvent::Down {
                x: center.x,
                y: center.y
            }),
            PointerOutcome::Ignored
        );
        assert_eq!(state.blobs().interaction_count(), 0);
    }

    #[test]
    fn test_move_without_drag_changes_nothing() {
        let mut state = started();
        let before = state.blobs().clone();
        assert_eq!(
            state.handle_pointer(PointerEvent::Move { x: 10.0, y: 10.0 }),
            PointerOutcome::Ignored
        );
        assert_eq!(state.blobs(), &before);
        assert_eq!(state.handle_pointer(PointerEvent::Up), PointerOutcome::Ignored);
    }

    #[test]
    fn test_drag_moves_shape_by_delta() {
        let mut state = started();
        let start = state.blobs().shape(ShapeId::Presented).center;
        press_shape(&mut state, ShapeId::Presented);
        assert!(!state.blobs().shape(ShapeId::Presented).animating);

        let outcome = state.handle_pointer(PointerEvent::Move {
            x: start.x - 100.0,
            y: start.y + 5.0,
        });
        assert!(matches!(outcome, PointerOutcome::ShapeMoved { id: ShapeId::Presented, .. }));
        assert_eq!(
            state.blobs().shape(ShapeId::Presented).center,
            Point::new(start.x - 100.0, start.y + 5.0)
        );

        assert_eq!(state.handle_pointer(PointerEvent::Up), PointerOutcome::Released);
        assert!(state.interaction().is_idle());
    }

    #[test]
    fn test_next_revealed_on_third_press() {
        let mut state = started();
        for expected in [false, false, true] {
            match press_shape(&mut state, ShapeId::SelfConcept) {
                PointerOutcome::ShapePressed { next_revealed, .. } => {
                    assert_eq!(next_revealed, expected)
                }
                other => panic!("unexpected outcome {other:?}"),
            }
            state.handle_pointer(PointerEvent::Up);
        }
    }

    #[test]
    fn test_down_on_empty_space_is_ignored() {
        let mut state = started();
        assert_eq!(
            state.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 }),
            PointerOutcome::Ignored
        );
        assert_eq!(state.blobs().interaction_count(), 0);
    }

    #[test]
    fn test_finish_blobs_needs_three_presses() {
        let mut state = started();
        assert!(state.finish_blobs().is_err());
        for _ in 0..3 {
            press_shape(&mut state, ShapeId::SelfConcept);
            state.handle_pointer(PointerEvent::Up);
        }
        let congruence = state.finish_blobs().unwrap();
        assert_eq!(congruence, state.congruence());
        assert_eq!(state.scene(), Scene::Chart);
    }

    #[test]
    fn test_chart_drag_and_completion() {
        let mut state = started();
        for _ in 0..3 {
            press_shape(&mut state, ShapeId::SelfConcept);
            state.handle_pointer(PointerEvent::Up);
        }
        state.finish_blobs().unwrap();

        let node = state.layout().point_at(0, 7, 0.5);
        assert_eq!(
            state.handle_pointer(PointerEvent::Down { x: node.x, y: node.y }),
            PointerOutcome::NodeGrabbed { index: 0 }
        );
        let center = state.layout().center;
        match state.handle_pointer(PointerEvent::Move {
            x: center.x,
            y: center.y,
        }) {
            PointerOutcome::NodeMoved { index, value } => {
                assert_eq!(index, 0);
                assert_eq!(value, 0.1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        state.handle_pointer(PointerEvent::Up);

        assert_eq!(state.advance_chart().unwrap(), ChartAdvance::EnteredIdeal);
        assert_eq!(state.chart().axes()[0].ideal, 0.1);
        assert!(matches!(
            state.advance_chart().unwrap(),
            ChartAdvance::Completed(_)
        ));
        assert_eq!(state.scene(), Scene::Reflection);
        assert_eq!(state.chart().mode(), ChartMode::Complete);
        assert!(state.advance_chart().is_err());
        assert_eq!(
            state.handle_pointer(PointerEvent::Down { x: node.x, y: node.y }),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn test_set_chart_value_outside_chart_scene() {
        let mut state = started();
        assert!(state.set_chart_value(0, 0.7).is_err());
    }
}
