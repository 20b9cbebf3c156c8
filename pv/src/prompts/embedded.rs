//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Daily plan prompt (motivation, physical exercises, mental exercise)
pub const DAILY: &str = include_str!("../../prompts/daily.pmt");

/// Physiotherapy session prompt
pub const PHYSIO: &str = include_str!("../../prompts/physio.pmt");

/// Symptom triage prompt
pub const TRIAGE: &str = include_str!("../../prompts/triage.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "daily" => Some(DAILY),
        "physio" => Some(PHYSIO),
        "triage" => Some(TRIAGE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_daily() {
        let daily = get_embedded("daily").unwrap();
        assert!(daily.contains("physicalExercises"));
        assert!(daily.contains("mentalExercise"));
        assert!(daily.contains("{{exercise_count}}"));
    }

    #[test]
    fn test_get_embedded_triage_lists_levels() {
        let triage = get_embedded("triage").unwrap();
        assert!(triage.contains("ESTÁVEL"));
        assert!(triage.contains("OBSERVAR"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
