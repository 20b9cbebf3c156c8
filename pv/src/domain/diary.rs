//! Symptom diary entries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Lowest tremor level a user can record
pub const MIN_TREMOR_LEVEL: u8 = 1;

/// Highest tremor level a user can record
pub const MAX_TREMOR_LEVEL: u8 = 10;

/// How the user felt when writing the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Frown,
    Meh,
    #[default]
    Smile,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frown => write!(f, "frown"),
            Self::Meh => write!(f, "meh"),
            Self::Smile => write!(f, "smile"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frown" => Ok(Self::Frown),
            "meh" => Ok(Self::Meh),
            "smile" => Ok(Self::Smile),
            other => Err(format!("unknown mood '{}' (expected frown, meh or smile)", other)),
        }
    }
}

/// One saved diary record
///
/// Created only by an explicit save and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    /// Local calendar date, dd/mm/yyyy
    pub date: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub mood: Mood,
    pub tremor_level: u8,
    pub notes: String,
}

impl DiaryEntry {
    /// Build a new entry stamped with the current local time
    ///
    /// Returns None when `notes` is blank. The tremor level is clamped into
    /// the 1-10 scale.
    pub fn new(mood: Mood, tremor_level: u8, notes: impl Into<String>) -> Option<Self> {
        Self::at(Local::now(), mood, tremor_level, notes)
    }

    /// Build an entry for an explicit point in time
    pub fn at(now: DateTime<Local>, mood: Mood, tremor_level: u8, notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        debug!(%mood, tremor_level, notes_len = notes.len(), "DiaryEntry::at: called");
        if notes.trim().is_empty() {
            debug!("DiaryEntry::at: blank notes, rejecting");
            return None;
        }

        Some(Self {
            id: Uuid::now_v7().to_string(),
            date: now.format("%d/%m/%Y").to_string(),
            timestamp: now.timestamp_millis(),
            mood,
            tremor_level: tremor_level.clamp(MIN_TREMOR_LEVEL, MAX_TREMOR_LEVEL),
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_stamps_date_and_timestamp() {
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 30, 0).unwrap();
        let entry = DiaryEntry::at(now, Mood::Meh, 7, "Mão direita tremeu ao pequeno-almoço").unwrap();

        assert_eq!(entry.date, "07/03/2026");
        assert_eq!(entry.timestamp, now.timestamp_millis());
        assert_eq!(entry.tremor_level, 7);
        assert_eq!(entry.mood, Mood::Meh);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_blank_notes_rejected() {
        assert!(DiaryEntry::new(Mood::Smile, 5, "   \n").is_none());
        assert!(DiaryEntry::new(Mood::Smile, 5, "").is_none());
    }

    #[test]
    fn test_tremor_level_clamped() {
        assert_eq!(DiaryEntry::new(Mood::Frown, 0, "x").unwrap().tremor_level, 1);
        assert_eq!(DiaryEntry::new(Mood::Frown, 42, "x").unwrap().tremor_level, 10);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = DiaryEntry::new(Mood::Smile, 3, "a").unwrap();
        let b = DiaryEntry::new(Mood::Smile, 3, "b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_mood_parse() {
        assert_eq!("Frown".parse::<Mood>().unwrap(), Mood::Frown);
        assert_eq!(" meh ".parse::<Mood>().unwrap(), Mood::Meh);
        assert!("angry".parse::<Mood>().is_err());
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = DiaryEntry {
            id: "abc".to_string(),
            date: "01/01/2026".to_string(),
            timestamp: 1,
            mood: Mood::Smile,
            tremor_level: 4,
            notes: "ok".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["tremorLevel"], 4);
        assert_eq!(json["mood"], "smile");
    }
}
