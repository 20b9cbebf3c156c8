//! Completion marks and favorites

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Exercise, PlanKind};

/// Indices of completed items, kept separately per plan
///
/// For the daily plan the mental exercise uses index N, one past the last
/// physical exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTracker {
    daily: BTreeSet<usize>,
    physio: BTreeSet<usize>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: PlanKind) -> &BTreeSet<usize> {
        match kind {
            PlanKind::Daily => &self.daily,
            PlanKind::Physio => &self.physio,
        }
    }

    fn set_mut(&mut self, kind: PlanKind) -> &mut BTreeSet<usize> {
        match kind {
            PlanKind::Daily => &mut self.daily,
            PlanKind::Physio => &mut self.physio,
        }
    }

    /// Flip membership of `idx`; returns whether it is now completed
    pub fn toggle(&mut self, kind: PlanKind, idx: usize) -> bool {
        let set = self.set_mut(kind);
        let completed = if set.remove(&idx) {
            false
        } else {
            set.insert(idx);
            true
        };
        debug!(%kind, idx, completed, "CompletionTracker::toggle: called");
        completed
    }

    pub fn is_completed(&self, kind: PlanKind, idx: usize) -> bool {
        self.set(kind).contains(&idx)
    }

    pub fn completed_count(&self, kind: PlanKind) -> usize {
        self.set(kind).len()
    }

    pub fn clear(&mut self, kind: PlanKind) {
        self.set_mut(kind).clear();
    }

    pub fn completed(&self, kind: PlanKind) -> impl Iterator<Item = usize> + '_ {
        self.set(kind).iter().copied()
    }
}

/// Saved exercises, unique by title, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    items: Vec<Exercise>,
}

impl Favorites {
    /// Build from stored data, dropping later duplicates of a title
    pub fn from_stored(stored: Vec<Exercise>) -> Self {
        let mut items: Vec<Exercise> = Vec::with_capacity(stored.len());
        for exercise in stored {
            if !items.iter().any(|e| e.title == exercise.title) {
                items.push(exercise);
            }
        }
        Self { items }
    }

    /// Remove the favorite with this title, or append the exercise
    ///
    /// Returns whether the exercise is a favorite afterwards.
    pub fn toggle(&mut self, exercise: &Exercise) -> bool {
        if let Some(pos) = self.items.iter().position(|e| e.title == exercise.title) {
            self.items.remove(pos);
            debug!(title = %exercise.title, "Favorites::toggle: removed");
            false
        } else {
            self.items.push(exercise.clone());
            debug!(title = %exercise.title, "Favorites::toggle: added");
            true
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.items.iter().any(|e| e.title == title)
    }

    pub fn items(&self) -> &[Exercise] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
