//! Exercise and plan types returned by the content provider

use serde::{Deserialize, Serialize};

/// A single physical or physiotherapy exercise
///
/// `title` is the identity key for favorites. Two exercises with the same
/// title are the same favorite even when they come from different plans or
/// carry different descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Body area or skill the exercise works on
    #[serde(default)]
    pub target: String,
    /// Free-form duration such as "5 min" or "3 x 10"
    #[serde(default)]
    pub duration: String,
}

impl Exercise {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        target: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            target: target.into(),
            duration: duration.into(),
        }
    }
}

/// Question/answer pair for the cognitive exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalExercise {
    pub question: String,
    pub answer: String,
}

/// AI-generated bundle for the day
///
/// Replaced wholesale on refresh, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub motivation: String,
    #[serde(default)]
    pub physical_exercises: Vec<Exercise>,
    pub mental_exercise: MentalExercise,
}

impl DailyPlan {
    /// Number of physical exercises
    pub fn exercise_count(&self) -> usize {
        self.physical_exercises.len()
    }
}

/// Which plan a completion index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanKind {
    Daily,
    Physio,
}

impl std::fmt::Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Physio => write!(f, "physio"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_plan_uses_camel_case_keys() {
        let json = r#"{
            "motivation": "Cada passo conta.",
            "physicalExercises": [
                {"title": "Marcha", "description": "Caminhar", "target": "Equilíbrio", "duration": "10 min"}
            ],
            "mentalExercise": {"question": "2+2?", "answer": "4"}
        }"#;

        let plan: DailyPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.exercise_count(), 1);
        assert_eq!(plan.physical_exercises[0].target, "Equilíbrio");
        assert_eq!(plan.mental_exercise.answer, "4");

        let back = serde_json::to_value(&plan).unwrap();
        assert!(back.get("physicalExercises").is_some());
        assert!(back.get("mentalExercise").is_some());
    }

    #[test]
    fn test_exercise_missing_optional_fields() {
        let ex: Exercise = serde_json::from_str(r#"{"title": "Alongamento"}"#).unwrap();
        assert_eq!(ex.title, "Alongamento");
        assert!(ex.description.is_empty());
    }
}
