//! Radar-chart axes: the seven dimensions of the self.

use serde::{Deserialize, Serialize};

/// Lowest value an axis can hold (1 on the display scale).
pub const MIN_VALUE: f64 = 0.1;
/// Highest value an axis can hold (10 on the display scale).
pub const MAX_VALUE: f64 = 1.0;
/// Value both overlays start at.
pub const INITIAL_VALUE: f64 = 0.5;

/// The fixed axes, in display (angular) order: label and description.
pub const SELF_DIMENSIONS: [(&str, &str); 7] = [
    ("Bodily Self", "Knowing one's body and its limits"),
    ("Self-identity", "Awareness of inner sameness and continuity"),
    ("Self-esteem", "Pride in the ability to do things"),
    ("Self-extension", "Sense of possession and valuing of others"),
    ("Self-image", "Sense of measuring up to expectations of others"),
    (
        "Self-as-rational-coper",
        "Sense of self as active problem-solving agent",
    ),
    (
        "Propriate striving",
        "Development of long-term purposes and goals",
    ),
];

/// Which of the two overlays a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    Current,
    Ideal,
}

/// One labeled axis with its current and ideal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAxis {
    pub label: String,
    pub description: String,
    pub current: f64,
    pub ideal: f64,
}

impl ChartAxis {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            current: INITIAL_VALUE,
            ideal: INITIAL_VALUE,
        }
    }

    pub fn value(&self, overlay: Overlay) -> f64 {
        match overlay {
            Overlay::Current => self.current,
            Overlay::Ideal => self.ideal,
        }
    }

    /// Sets a value, clamped to `[MIN_VALUE, MAX_VALUE]`.
    pub fn set_value(&mut self, overlay: Overlay, value: f64) {
        let value = clamp_value(value);
        match overlay {
            Overlay::Current => self.current = value,
            Overlay::Ideal => self.ideal = value,
        }
    }

    pub fn current_score(&self) -> u8 {
        score(self.current)
    }

    pub fn ideal_score(&self) -> u8 {
        score(self.ideal)
    }
}

/// The seven axes with both overlays at their initial value.
pub fn default_axes() -> Vec<ChartAxis> {
    SELF_DIMENSIONS
        .iter()
        .map(|(label, description)| ChartAxis::new(*label, *description))
        .collect()
}

pub fn clamp_value(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_VALUE;
    }
    value.clamp(MIN_VALUE, MAX_VALUE)
}

/// Converts an internal value to the 1–10 display scale.
pub fn score(value: f64) -> u8 {
    (value * 10.0).round() as u8
}
