//! Symptom triage results

use serde::{Deserialize, Serialize};

/// Classifier output: a severity label plus advice text
///
/// `level` is kept verbatim so consumers can show whatever the model used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomAssessment {
    pub level: String,
    pub advice: String,
}

impl SymptomAssessment {
    pub fn triage_level(&self) -> TriageLevel {
        TriageLevel::from_label(&self.level)
    }
}

/// Coarse severity used for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageLevel {
    /// "ESTÁVEL"
    Stable,
    /// "OBSERVAR"
    Observe,
    /// Any other label the classifier returns
    Urgent,
}

impl TriageLevel {
    /// Map a classifier label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "ESTÁVEL" | "ESTAVEL" => Self::Stable,
            "OBSERVAR" => Self::Observe,
            _ => Self::Urgent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_level_from_label() {
        assert_eq!(TriageLevel::from_label("ESTÁVEL"), TriageLevel::Stable);
        assert_eq!(TriageLevel::from_label("estável "), TriageLevel::Stable);
        assert_eq!(TriageLevel::from_label("OBSERVAR"), TriageLevel::Observe);
        assert_eq!(TriageLevel::from_label("URGENTE"), TriageLevel::Urgent);
        assert_eq!(TriageLevel::from_label(""), TriageLevel::Urgent);
    }

    #[test]
    fn test_assessment_keeps_raw_level() {
        let a = SymptomAssessment {
            level: "Observar".to_string(),
            advice: "Registe no diário".to_string(),
        };
        assert_eq!(a.level, "Observar");
        assert_eq!(a.triage_level(), TriageLevel::Observe);
    }
}
