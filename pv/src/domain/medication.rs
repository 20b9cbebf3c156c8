//! Medication schedule entries

use serde::{Deserialize, Serialize};

/// A scheduled dose and whether it has been taken today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Time of day, e.g. "08:00"
    pub time: String,
    pub taken: bool,
    pub reminders_enabled: bool,
}
