//! Daily progress figures derived from session state

use crate::domain::{DailyPlan, DiaryEntry, Medication};

/// Percentages in 0..=100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub medication: f64,
    pub exercise: f64,
    pub combined: f64,
}

impl Progress {
    pub fn compute(medications: &[Medication], plan: Option<&DailyPlan>, completed_daily: usize) -> Self {
        let medication = medication_progress(medications);
        let exercise = exercise_progress(plan, completed_daily);
        Self {
            medication,
            exercise,
            combined: combined_progress(medication, exercise),
        }
    }
}

/// Share of scheduled doses marked taken; 0 with no schedule
pub fn medication_progress(medications: &[Medication]) -> f64 {
    if medications.is_empty() {
        return 0.0;
    }
    let taken = medications.iter().filter(|m| m.taken).count();
    percent(taken, medications.len())
}

/// Completed daily items over N + 1 (the mental exercise counts once)
pub fn exercise_progress(plan: Option<&DailyPlan>, completed_daily: usize) -> f64 {
    let Some(plan) = plan else {
        return 0.0;
    };
    percent(completed_daily, plan.exercise_count() + 1)
}

pub fn combined_progress(medication: f64, exercise: f64) -> f64 {
    (medication + exercise) / 2.0
}

pub fn medications_remaining(medications: &[Medication]) -> usize {
    medications.iter().filter(|m| !m.taken).count()
}

/// Physical exercises plus the mental exercise
pub fn planned_exercise_count(plan: Option<&DailyPlan>) -> usize {
    plan.map(|p| p.exercise_count() + 1).unwrap_or(0)
}

/// The `n` most recent entries as (date, tremor level), oldest first
///
/// `entries` is newest first, as the diary stores them.
pub fn tremor_series(entries: &[DiaryEntry], n: usize) -> Vec<(String, u8)> {
    entries
        .iter()
        .take(n)
        .rev()
        .map(|e| (e.date.clone(), e.tremor_level))
        .collect()
}

fn percent(part: usize, whole: usize) -> f64 {
    (part as f64 / whole as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Exercise, MentalExercise, Mood};

    fn med(id: &str, taken: bool) -> Medication {
        Medication {
            id: id.to_string(),
            name: "Levodopa".to_string(),
            dosage: "100mg".to_string(),
            time: "08:00".to_string(),
            taken,
            reminders_enabled: true,
        }
    }

    fn plan(n: usize) -> DailyPlan {
        DailyPlan {
            motivation: "Vamos!".to_string(),
            physical_exercises: (0..n).map(|i| Exercise::new(format!("E{i}"), "", "", "")).collect(),
            mental_exercise: MentalExercise {
                question: "?".to_string(),
                answer: "!".to_string(),
            },
        }
    }

    fn entry(date: &str, tremor: u8) -> DiaryEntry {
        DiaryEntry {
            id: date.to_string(),
            date: date.to_string(),
            timestamp: 0,
            mood: Mood::Meh,
            tremor_level: tremor,
            notes: "n".to_string(),
        }
    }

    #[test]
    fn test_medication_progress() {
        let meds = [med("1", true), med("2", false), med("3", false)];
        let value = medication_progress(&meds);
        assert!((value - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(medications_remaining(&meds), 2);
    }

    #[test]
    fn test_medication_progress_empty_schedule() {
        assert_eq!(medication_progress(&[]), 0.0);
    }

    #[test]
    fn test_exercise_progress_counts_mental_exercise() {
        // two physical + one mental, one completed: 1/3
        let value = exercise_progress(Some(&plan(2)), 1);
        assert!((value - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(planned_exercise_count(Some(&plan(2))), 3);
    }

    #[test]
    fn test_exercise_progress_without_plan() {
        assert_eq!(exercise_progress(None, 3), 0.0);
        assert_eq!(planned_exercise_count(None), 0);
    }

    #[test]
    fn test_combined_is_mean() {
        let meds = [med("1", true), med("2", true)];
        let progress = Progress::compute(&meds, Some(&plan(1)), 1);
        assert_eq!(progress.medication, 100.0);
        assert_eq!(progress.exercise, 50.0);
        assert_eq!(progress.combined, 75.0);
    }

    #[test]
    fn test_tremor_series_oldest_first() {
        let entries = [entry("03/01", 6), entry("02/01", 4), entry("01/01", 2)];
        let series = tremor_series(&entries, 2);
        assert_eq!(series, vec![("02/01".to_string(), 4), ("03/01".to_string(), 6)]);

        assert_eq!(tremor_series(&entries, 10).len(), 3);
        assert!(tremor_series(&[], 7).is_empty());
    }
}
