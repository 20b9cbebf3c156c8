//! Fetch-once cache for the physiotherapy plan

use tracing::debug;

use super::fetch::{FetchState, Resolution};
use crate::domain::Exercise;

/// Physio plan lifecycle
///
/// `Fetched(vec![])` is a real answer and is never refetched, unlike
/// `NotFetched`. A failed fetch drops back to `NotFetched` so the next tab
/// selection retries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhysioCache {
    #[default]
    NotFetched,
    InFlight { generation: u64 },
    Fetched(Vec<Exercise>),
}

#[derive(Debug, Default)]
pub struct PhysioSlot {
    cache: PhysioCache,
    generation: u64,
    last_error: Option<String>,
}

impl PhysioSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only when nothing has been fetched and nothing is in flight
    pub fn should_fetch(&self) -> bool {
        matches!(self.cache, PhysioCache::NotFetched)
    }

    /// Mark a fetch as started; returns None when one is not needed
    pub fn begin(&mut self) -> Option<u64> {
        if !self.should_fetch() {
            debug!(cache = ?self.cache, "PhysioSlot::begin: fetch not needed");
            return None;
        }
        self.generation += 1;
        self.last_error = None;
        self.cache = PhysioCache::InFlight {
            generation: self.generation,
        };
        Some(self.generation)
    }

    pub fn resolve(&mut self, generation: u64, result: Result<Vec<Exercise>, String>) -> Resolution {
        match self.cache {
            PhysioCache::InFlight { generation: current } if current == generation => {}
            _ => {
                debug!(generation, "PhysioSlot::resolve: stale result dropped");
                return Resolution::Stale;
            }
        }

        match result {
            Ok(exercises) => {
                self.cache = PhysioCache::Fetched(exercises);
                Resolution::Applied
            }
            Err(reason) => {
                self.cache = PhysioCache::NotFetched;
                self.last_error = Some(reason);
                Resolution::Failed
            }
        }
    }

    /// Abandon a fetch in flight so the next selection starts a new one
    pub fn cancel(&mut self) {
        if let PhysioCache::InFlight { generation } = self.cache {
            debug!(generation, "PhysioSlot::cancel: fetch abandoned");
            self.cache = PhysioCache::NotFetched;
        }
    }

    pub fn cache(&self) -> &PhysioCache {
        &self.cache
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.cache, PhysioCache::InFlight { .. })
    }

    /// Cached exercises, empty until fetched
    pub fn exercises(&self) -> &[Exercise] {
        match &self.cache {
            PhysioCache::Fetched(exercises) => exercises,
            _ => &[],
        }
    }

    pub fn state(&self) -> FetchState<&[Exercise]> {
        match &self.cache {
            PhysioCache::InFlight { .. } => FetchState::Loading,
            PhysioCache::Fetched(exercises) => FetchState::Loaded(exercises.as_slice()),
            PhysioCache::NotFetched => match &self.last_error {
                Some(reason) => FetchState::Failed(reason.clone()),
                None => FetchState::Idle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetches_once() {
        let mut slot = PhysioSlot::new();
        assert!(slot.should_fetch());

        let generation = slot.begin().unwrap();
        assert!(slot.begin().is_none());
        assert!(slot.state().is_loading());

        slot.resolve(generation, Ok(vec![Exercise::new("Ponte", "", "", "")]));
        assert!(!slot.should_fetch());
        assert!(slot.begin().is_none());
        assert_eq!(slot.exercises().len(), 1);
    }

    #[test]
    fn test_empty_result_is_cached() {
        let mut slot = PhysioSlot::new();
        let generation = slot.begin().unwrap();
        assert_eq!(slot.resolve(generation, Ok(Vec::new())), Resolution::Applied);

        assert_eq!(slot.cache(), &PhysioCache::Fetched(Vec::new()));
        assert!(!slot.should_fetch());
        assert_eq!(slot.state(), FetchState::Loaded(&[][..]));
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut slot = PhysioSlot::new();
        let generation = slot.begin().unwrap();
        assert_eq!(slot.resolve(generation, Err("offline".to_string())), Resolution::Failed);

        assert!(slot.should_fetch());
        assert_eq!(slot.state().error(), Some("offline"));

        let retry = slot.begin().unwrap();
        assert_ne!(retry, generation);
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_cancel_returns_to_not_fetched() {
        let mut slot = PhysioSlot::new();
        let generation = slot.begin().unwrap();
        slot.cancel();

        assert!(slot.should_fetch());
        assert_eq!(slot.state(), FetchState::Idle);
        assert_eq!(slot.resolve(generation, Ok(Vec::new())), Resolution::Stale);
    }

    #[test]
    fn test_cancel_keeps_fetched_plan() {
        let mut slot = PhysioSlot::new();
        let generation = slot.begin().unwrap();
        slot.resolve(generation, Ok(vec![Exercise::new("Ponte", "", "", "")]));
        slot.cancel();

        assert_eq!(slot.exercises().len(), 1);
        assert!(!slot.should_fetch());
    }

    #[test]
    fn test_result_without_request_is_stale() {
        let mut slot = PhysioSlot::new();
        assert_eq!(slot.resolve(1, Ok(Vec::new())), Resolution::Stale);
        assert!(slot.should_fetch());
    }
}
