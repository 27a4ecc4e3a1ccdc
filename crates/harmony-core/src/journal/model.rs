//! Records written to the user's journal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::ChartSnapshot;

pub const CONGRUENCE_DESCRIPTION: &str = "Overlap percentage between self-concepts";
pub const ARCHITECTURE_DESCRIPTION: &str =
    "User's self-assessed psychological architecture (Current vs Ideal)";

/// One journal entry. The serde tag becomes the entry's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalRecord {
    /// The name entered on the start screen.
    UserIdentity { name: String },

    /// Overlap of the two shapes, in whole percent.
    Congruence { congruence: u8, description: String },

    /// Both chart overlays, keyed by axis label, on the 0.1–1.0 scale.
    SelfArchitecture {
        metrics: BTreeMap<String, f64>,
        #[serde(rename = "idealMetrics")]
        ideal_metrics: BTreeMap<String, f64>,
        description: String,
    },
}

impl JournalRecord {
    pub fn user_identity(name: impl Into<String>) -> Self {
        Self::UserIdentity { name: name.into() }
    }

    pub fn congruence(congruence: u8) -> Self {
        Self::Congruence {
            congruence,
            description: CONGRUENCE_DESCRIPTION.to_string(),
        }
    }

    pub fn self_architecture(snapshot: &ChartSnapshot) -> Self {
        let metrics = snapshot
            .axes
            .iter()
            .map(|axis| (axis.label.clone(), axis.current))
            .collect();
        let ideal_metrics = snapshot
            .axes
            .iter()
            .map(|axis| (axis.label.clone(), axis.ideal))
            .collect();
        Self::SelfArchitecture {
            metrics,
            ideal_metrics,
            description: ARCHITECTURE_DESCRIPTION.to_string(),
        }
    }

    /// The `type` tag, for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserIdentity { .. } => "user_identity",
            Self::Congruence { .. } => "congruence",
            Self::SelfArchitecture { .. } => "self_architecture",
        }
    }
}
