//! The four opener questions and their diagnostic context lines.

use super::heuristic::{DominantAxis, GapCategory, PromptSelection};

const CONGRUENCE_QUESTION: &str = "Before we look at the details, let's honor the big picture. Your congruence score suggests you felt you had to wear a mask today. That is an exhausting thing to do. In which specific moment today did you feel you had to hide your true self, and what would it feel like to gently take that mask off right now, in this private space?";

const FLOW_QUESTION: &str = "Your chart shows a gentle balance today. You are relatively aligned with your ideals. What is one moment of ease or flow you experienced today that you would like to anchor into your memory?";

const FLOW_CONTEXT: &str = "Gaps are small, user is in flow/stasis.";

fn anxious_question(axis: &DominantAxis) -> String {
    format!(
        "I notice a heavy weight in your {label} today. There is a strong voice telling you that you 'should' be at a {ought}, even though you're currently feeling like a {actual}. If you could gently set down that heavy expectation for just five minutes, what is the one true thing your {actual} needs to feel safe right now?",
        label = axis.label,
        ought = axis.ought,
        actual = axis.actual,
    )
}

fn depressive_question(axis: &DominantAxis) -> String {
    format!(
        "There is a beautiful longing in your chart today regarding your {label}. You can clearly see the version of yourself who is {ideal}, but the gap to get there feels wide. Instead of trying to leap across that gap, what is the tiniest bridge you could build today? What is one micro-action that honors your desire for {label} without overwhelming you?",
        label = axis.label,
        ideal = axis.ideal,
    )
}

impl PromptSelection {
    /// The question template with the dominant axis interpolated.
    pub fn question(&self) -> String {
        match (self.category, &self.dominant) {
            (GapCategory::Congruence, _) => CONGRUENCE_QUESTION.to_string(),
            (GapCategory::Anxious, Some(axis)) => anxious_question(axis),
            (GapCategory::Depressive, Some(axis)) => depressive_question(axis),
            _ => FLOW_QUESTION.to_string(),
        }
    }

    /// One-line summary of the data behind the choice, for logs.
    pub fn data_context(&self) -> String {
        match (self.category, &self.dominant) {
            (GapCategory::Congruence, _) => {
                format!("Congruence Score: {}% (Low)", self.congruence)
            }
            (GapCategory::Anxious, Some(axis)) => format!(
                "Metric: {}, Actual: {}, Ought: {}",
                axis.label, axis.actual, axis.ought
            ),
            (GapCategory::Depressive, Some(axis)) => format!(
                "Metric: {}, Actual: {}, Ideal: {}",
                axis.label, axis.actual, axis.ideal
            ),
            _ => FLOW_CONTEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{AxisReading, select_prompt};

    #[test]
    fn test_congruence_question_is_fixed() {
        let selection = select_prompt(12, &[]);
        assert!(selection.question().starts_with("Before we look at the details"));
        assert_eq!(selection.data_context(), "Congruence Score: 12% (Low)");
    }

    #[test]
    fn test_depressive_question_interpolates_axis() {
        let axes = vec![AxisReading::new("Self-esteem", 3, 8)];
        let selection = select_prompt(70, &axes);
        let question = selection.question();
        assert!(question.contains("regarding your Self-esteem"));
        assert!(question.contains("who is 8,"));
        assert!(question.contains("your desire for Self-esteem without"));
        assert_eq!(
            selection.data_context(),
            "Metric: Self-esteem, Actual: 3, Ideal: 8"
        );
    }

    #[test]
    fn test_anxious_question_interpolates_ought() {
        let axes = vec![AxisReading::new("Self-image", 4, 4).with_ought(8)];
        let selection = select_prompt(70, &axes);
        let question = selection.question();
        assert!(question.contains("heavy weight in your Self-image today"));
        assert!(question.contains("'should' be at a 8"));
        assert!(question.contains("feeling like a 4."));
        assert_eq!(
            selection.data_context(),
            "Metric: Self-image, Actual: 4, Ought: 8"
        );
    }

    #[test]
    fn test_flow_question() {
        let selection = select_prompt(90, &[AxisReading::new("Bodily Self", 6, 6)]);
        assert!(selection.question().starts_with("Your chart shows a gentle balance"));
        assert_eq!(selection.data_context(), FLOW_CONTEXT);
    }
}
