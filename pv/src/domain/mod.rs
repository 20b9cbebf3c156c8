//! Domain types for ParkinVibe
//!
//! Plans and exercises come from the content provider; diary entries and
//! favorites are persisted; medications are session state seeded from config.

mod diary;
mod exercise;
mod medication;
mod triage;

pub use diary::{DiaryEntry, MAX_TREMOR_LEVEL, MIN_TREMOR_LEVEL, Mood};
pub use exercise::{DailyPlan, Exercise, MentalExercise, PlanKind};
pub use medication::Medication;
pub use triage::{SymptomAssessment, TriageLevel};
