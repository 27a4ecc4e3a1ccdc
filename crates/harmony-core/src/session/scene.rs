use serde::{Deserialize, Serialize};
use strum::Display;

/// The four screens of a session, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Scene {
    /// Waiting for the user's name.
    #[default]
    Start,
    /// Dragging the two shapes.
    Blobs,
    /// Plotting the radar chart.
    Chart,
    /// Talking with the reflection coach.
    Reflection,
}

impl Scene {
    pub fn takes_pointer_input(&self) -> bool {
        matches!(self, Self::Blobs | Self::Chart)
    }
}
