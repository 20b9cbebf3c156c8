//! Fetch lifecycle for one kind of remote content
//!
//! Every request gets a generation number. Only the result carrying the
//! slot's current generation is applied; anything older was superseded and is
//! dropped. A failure keeps the last good value readable.

use tracing::debug;

/// Externally visible state of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Never requested
    Idle,
    /// A request is in flight
    Loading,
    /// Last request succeeded
    Loaded(T),
    /// Last request failed with this reason
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// What happened when a result was offered to a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// New value stored
    Applied,
    /// Failure recorded, previous value kept
    Failed,
    /// Result belonged to a superseded request and was ignored
    Stale,
}

#[derive(Debug)]
pub struct FetchSlot<T> {
    generation: u64,
    loading: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            loading: false,
            data: None,
            error: None,
        }
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any in flight; returns its generation
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        debug!(generation = self.generation, "FetchSlot::begin: called");
        self.generation
    }

    /// Whether a result tagged `generation` would still be applied
    pub fn is_current(&self, generation: u64) -> bool {
        self.loading && generation == self.generation
    }

    /// Offer a result; the loading flag is cleared on both success and failure
    pub fn resolve(&mut self, generation: u64, result: Result<T, String>) -> Resolution {
        if !self.is_current(generation) {
            debug!(
                generation,
                current = self.generation,
                "FetchSlot::resolve: stale result dropped"
            );
            return Resolution::Stale;
        }

        self.loading = false;
        match result {
            Ok(value) => {
                self.data = Some(value);
                self.error = None;
                Resolution::Applied
            }
            Err(reason) => {
                self.error = Some(reason);
                Resolution::Failed
            }
        }
    }

    /// Abandon the request in flight; its result will be stale
    pub fn cancel(&mut self) {
        if self.loading {
            debug!(generation = self.generation, "FetchSlot::cancel: request abandoned");
            self.generation += 1;
            self.loading = false;
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last successfully fetched value, even while reloading or after a failure
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn state(&self) -> FetchState<&T> {
        if self.loading {
            return FetchState::Loading;
        }
        if let Some(reason) = &self.error {
            return FetchState::Failed(reason.clone());
        }
        match &self.data {
            Some(value) => FetchState::Loaded(value),
            None => FetchState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_idle() {
        let slot: FetchSlot<u32> = FetchSlot::new();
        assert_eq!(slot.state(), FetchState::Idle);
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_success_clears_loading() {
        let mut slot = FetchSlot::new();
        let generation = slot.begin();
        assert!(slot.state().is_loading());

        assert_eq!(slot.resolve(generation, Ok(7)), Resolution::Applied);
        assert_eq!(slot.state(), FetchState::Loaded(&7));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_failure_clears_loading_and_keeps_previous_value() {
        let mut slot = FetchSlot::new();
        let first = slot.begin();
        slot.resolve(first, Ok("old plan"));

        let second = slot.begin();
        assert_eq!(slot.resolve(second, Err("timeout".to_string())), Resolution::Failed);

        assert!(!slot.is_loading());
        assert_eq!(slot.state().error(), Some("timeout"));
        assert_eq!(slot.data(), Some(&"old plan"));
    }

    #[test]
    fn test_superseded_result_is_stale() {
        let mut slot = FetchSlot::new();
        let a = slot.begin();
        let b = slot.begin();

        assert_eq!(slot.resolve(b, Ok("B")), Resolution::Applied);
        // A arrives late and must not overwrite B
        assert_eq!(slot.resolve(a, Ok("A")), Resolution::Stale);
        assert_eq!(slot.data(), Some(&"B"));
    }

    #[test]
    fn test_duplicate_delivery_is_stale() {
        let mut slot = FetchSlot::new();
        let generation = slot.begin();
        slot.resolve(generation, Ok(1));

        assert_eq!(slot.resolve(generation, Ok(2)), Resolution::Stale);
        assert_eq!(slot.data(), Some(&1));
    }

    #[test]
    fn test_cancel_clears_loading_and_drops_late_result() {
        let mut slot = FetchSlot::new();
        let first = slot.begin();
        slot.resolve(first, Ok("kept"));

        let second = slot.begin();
        slot.cancel();
        assert!(!slot.is_loading());
        assert_eq!(slot.state(), FetchState::Loaded(&"kept"));

        assert_eq!(slot.resolve(second, Ok("late")), Resolution::Stale);
        assert_eq!(slot.data(), Some(&"kept"));
    }

    #[test]
    fn test_cancel_when_idle_keeps_generation() {
        let mut slot: FetchSlot<u8> = FetchSlot::new();
        slot.cancel();
        assert_eq!(slot.generation(), 0);
        assert_eq!(slot.state(), FetchState::Idle);
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut slot: FetchSlot<u8> = FetchSlot::new();
        let generation = slot.begin();
        slot.resolve(generation, Err("boom".to_string()));

        slot.begin();
        assert_eq!(slot.state(), FetchState::Loading);
    }
}
