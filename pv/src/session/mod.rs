//! Session orchestration
//!
//! - [`fetch`] - generation-tagged fetch slots
//! - [`reveal`] - progressive reveal scheduler and its timer task
//! - [`cache`] - fetch-once physio plan cache
//! - [`tracker`] - completion marks and favorites
//! - [`progress`] - derived progress figures
//! - [`manager`] - the [`Session`] that ties them together

pub mod cache;
pub mod fetch;
pub mod manager;
pub mod messages;
pub mod permission;
pub mod progress;
pub mod reveal;
pub mod tracker;

pub use cache::{PhysioCache, PhysioSlot};
pub use fetch::{FetchSlot, FetchState, Resolution};
pub use manager::{ExerciseTab, Session, SessionOptions};
pub use messages::{SessionEvent, SessionMessage};
pub use permission::{PermissionSource, StaticPermission};
pub use progress::{
    Progress, combined_progress, exercise_progress, medication_progress, medications_remaining,
    planned_exercise_count, tremor_series,
};
pub use reveal::{DEFAULT_REVEAL_INTERVAL, RevealScheduler, RevealTimer};
pub use tracker::{CompletionTracker, Favorites};
