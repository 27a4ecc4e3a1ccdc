//! Gap detection: which conversation opener fits today's entry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Congruence below this percentage overrides every per-axis gap.
pub const LOW_CONGRUENCE_THRESHOLD: u8 = 40;

/// Gaps smaller than this (display scale) count as balance.
pub const MIN_SIGNIFICANT_GAP: i32 = 2;

/// The four opener categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GapCategory {
    /// The two self-representations barely overlap.
    Congruence,
    /// The user feels they "should" be higher than they are.
    Anxious,
    /// The ideal self is out of reach.
    Depressive,
    /// Gaps are small, or the user is at or above the ideal.
    Flow,
}

/// One axis on the 1–10 display scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisReading {
    pub label: String,
    pub actual: u8,
    pub ideal: u8,
    /// Where the user feels they ought to be. Defaults to `actual`.
    #[serde(default)]
    pub ought: Option<u8>,
}

impl AxisReading {
    pub fn new(label: impl Into<String>, actual: u8, ideal: u8) -> Self {
        Self {
            label: label.into(),
            actual,
            ideal,
            ought: None,
        }
    }

    pub fn with_ought(mut self, ought: u8) -> Self {
        self.ought = Some(ought);
        self
    }

    fn ought_or_actual(&self) -> u8 {
        self.ought.unwrap_or(self.actual)
    }
}

/// The axis that drove the selection, with its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantAxis {
    pub label: String,
    pub actual: u8,
    pub ideal: u8,
    pub ought: u8,
}

/// Outcome of the heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSelection {
    pub category: GapCategory,
    pub congruence: u8,
    /// Largest absolute gap seen, or -1 when no axis was scanned.
    pub magnitude: i32,
    pub dominant: Option<DominantAxis>,
}

/// Picks the opener category for a finished entry.
///
/// Low congruence wins outright. Otherwise the axis with the largest absolute
/// gap wins, first-seen on ties; the ideal gap sets `depressive`/`flow` and a
/// strictly larger ought gap overrides to `anxious`/`flow`. A winning gap
/// below [`MIN_SIGNIFICANT_GAP`] always yields `flow`.
pub fn select_prompt(congruence: u8, axes: &[AxisReading]) -> PromptSelection {
    if congruence < LOW_CONGRUENCE_THRESHOLD {
        return PromptSelection {
            category: GapCategory::Congruence,
            congruence,
            magnitude: -1,
            dominant: None,
        };
    }

    let mut magnitude: i32 = -1;
    let mut category = GapCategory::Flow;
    let mut dominant: Option<&AxisReading> = None;

    for axis in axes {
        let actual = i32::from(axis.actual);
        let ideal_gap = i32::from(axis.ideal) - actual;
        let ought_gap = i32::from(axis.ought_or_actual()) - actual;

        if ideal_gap.abs() > magnitude {
            magnitude = ideal_gap.abs();
            dominant = Some(axis);
            category = if ideal_gap > 0 {
                GapCategory::Depressive
            } else {
                GapCategory::Flow
            };
        }

        if ought_gap.abs() > magnitude {
            magnitude = ought_gap.abs();
            dominant = Some(axis);
            category = if ought_gap > 0 {
                GapCategory::Anxious
            } else {
                GapCategory::Flow
            };
        }
    }

    if magnitude < MIN_SIGNIFICANT_GAP {
        category = GapCategory::Flow;
    }

    PromptSelection {
        category,
        congruence,
        magnitude,
        dominant: dominant.map(|axis| DominantAxis {
            label: axis.label.clone(),
            actual: axis.actual,
            ideal: axis.ideal,
            ought: axis.ought_or_actual(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(pairs: &[(u8, u8)]) -> Vec<AxisReading> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (actual, ideal))| AxisReading::new(format!("axis-{i}"), *actual, *ideal))
            .collect()
    }

    #[test]
    fn test_low_congruence_ignores_gaps() {
        let axes = readings(&[(2, 7), (1, 6), (3, 8)]);
        let selection = select_prompt(10, &axes);
        assert_eq!(selection.category, GapCategory::Congruence);
        assert!(selection.dominant.is_none());

        assert_eq!(select_prompt(39, &axes).category, GapCategory::Congruence);
        assert_ne!(select_prompt(40, &axes).category, GapCategory::Congruence);
    }

    #[test]
    fn test_largest_positive_gap_is_depressive() {
        let axes = readings(&[(5, 6), (3, 8), (5, 4)]);
        let selection = select_prompt(80, &axes);
        assert_eq!(selection.category, GapCategory::Depressive);
        assert_eq!(selection.magnitude, 5);
        let dominant = selection.dominant.unwrap();
        assert_eq!(dominant.label, "axis-1");
        assert_eq!(dominant.ideal, 8);
    }

    #[test]
    fn test_largest_negative_gap_is_flow() {
        let axes = readings(&[(5, 6), (9, 3)]);
        let selection = select_prompt(55, &axes);
        assert_eq!(selection.category, GapCategory::Flow);
        assert_eq!(selection.magnitude, 6);
        assert_eq!(selection.dominant.unwrap().label, "axis-1");
    }

    #[test]
    fn test_ties_keep_first_axis() {
        // Gaps +1, -1, +1.
        let axes = readings(&[(5, 6), (5, 4), (5, 6)]);
        let selection = select_prompt(80, &axes);
        assert_eq!(selection.magnitude, 1);
        assert_eq!(selection.dominant.unwrap().label, "axis-0");
        // Magnitude 1 is below the significance floor.
        assert_eq!(selection.category, GapCategory::Flow);
    }

    #[test]
    fn test_tie_at_significant_gap_keeps_first() {
        let axes = readings(&[(2, 6), (8, 4), (1, 5)]);
        let selection = select_prompt(90, &axes);
        assert_eq!(selection.category, GapCategory::Depressive);
        assert_eq!(selection.dominant.unwrap().label, "axis-0");
    }

    #[test]
    fn test_small_gaps_force_flow() {
        let axes = readings(&[(5, 6), (4, 5), (7, 6)]);
        let selection = select_prompt(40, &axes);
        assert_eq!(selection.category, GapCategory::Flow);
    }

    #[test]
    fn test_no_axes_is_flow() {
        let selection = select_prompt(75, &[]);
        assert_eq!(selection.category, GapCategory::Flow);
        assert_eq!(selection.magnitude, -1);
        assert!(selection.dominant.is_none());
    }

    #[test]
    fn test_ought_defaults_never_override() {
        let axes = readings(&[(5, 5), (5, 5)]);
        let selection = select_prompt(70, &axes);
        assert_eq!(selection.category, GapCategory::Flow);
        assert_eq!(selection.dominant.unwrap().ought, 5);
    }

    #[test]
    fn test_larger_ought_gap_overrides_to_anxious() {
        let axes = vec![
            AxisReading::new("Self-image", 3, 5).with_ought(9),
            AxisReading::new("Self-esteem", 4, 8),
        ];
        let selection = select_prompt(60, &axes);
        assert_eq!(selection.category, GapCategory::Anxious);
        assert_eq!(selection.magnitude, 6);
        let dominant = selection.dominant.unwrap();
        assert_eq!(dominant.label, "Self-image");
        assert_eq!(dominant.ought, 9);
    }

    #[test]
    fn test_category_parses_from_str() {
        use std::str::FromStr;
        assert_eq!(GapCategory::from_str("anxious").unwrap(), GapCategory::Anxious);
        assert_eq!(GapCategory::Depressive.to_string(), "depressive");
    }
}
