//! Messages flowing into and events flowing out of a session

use crate::domain::{DailyPlan, Exercise, SymptomAssessment};
use crate::provider::ProviderError;

/// Results posted back to the session by its background tasks
///
/// Every variant carries the generation of the request that produced it so
/// superseded results can be recognised and dropped.
#[derive(Debug)]
pub enum SessionMessage {
    DailyPlan {
        generation: u64,
        result: Result<DailyPlan, ProviderError>,
    },
    PhysioPlan {
        generation: u64,
        result: Result<Vec<Exercise>, ProviderError>,
    },
    Triage {
        generation: u64,
        result: Result<SymptomAssessment, ProviderError>,
    },
    /// One reveal step for the daily plan of this generation
    Tick { generation: u64 },
}

/// Notifications broadcast to session observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DailyPlanLoaded { exercises: usize },
    DailyPlanFailed { reason: String },
    PhysioPlanLoaded { exercises: usize },
    PhysioPlanFailed { reason: String },
    TriageReady { level: String },
    TriageFailed { reason: String },
    Revealed { counter: usize },
    RevealFinished,
    FavoritesChanged { count: usize },
    DiaryChanged { count: usize },
    MedicationToggled { id: String, taken: bool },
}
