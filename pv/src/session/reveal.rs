//! Progressive reveal of the daily plan
//!
//! [`RevealScheduler`] is a pure counter driven by ticks, so it can be tested
//! without a clock. [`RevealTimer`] is the tokio task that produces those
//! ticks at a fixed cadence.
//!
//! Slot layout: 0 is the motivation header, exercise `i` needs `i + 2` ticks,
//! the mental exercise needs `N + 2` where N is the exercise count.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::messages::SessionMessage;

/// Default delay between two reveal ticks
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(350);

/// Shortest delay the timer accepts; tokio intervals cannot have a zero period
pub const MIN_REVEAL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealScheduler {
    counter: usize,
    exercise_count: usize,
    active: bool,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter to 0 for a plan with `exercise_count` exercises
    pub fn start(&mut self, exercise_count: usize) {
        debug!(exercise_count, "RevealScheduler::start: called");
        self.counter = 0;
        self.exercise_count = exercise_count;
        self.active = true;
    }

    /// Advance by one; returns false once the scheduler has stopped
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.counter += 1;
        if self.counter >= self.limit() {
            debug!(counter = self.counter, "RevealScheduler::tick: reveal finished");
            self.active = false;
        }
        true
    }

    /// Stop ticking without changing the counter
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Jump straight to fully revealed and stop
    pub fn finish(&mut self) {
        self.counter = self.counter.max(self.limit());
        self.active = false;
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Counter value at which everything is visible
    pub fn limit(&self) -> usize {
        self.exercise_count + 2
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_complete(&self) -> bool {
        self.counter >= self.limit()
    }

    pub fn is_motivation_visible(&self) -> bool {
        self.counter >= 1
    }

    pub fn is_exercise_visible(&self, idx: usize) -> bool {
        self.counter >= idx + 2
    }

    pub fn is_mental_visible(&self) -> bool {
        self.counter >= self.limit()
    }

    /// How many exercises (a prefix of the plan) are currently visible
    pub fn visible_exercise_count(&self) -> usize {
        self.counter.saturating_sub(1).min(self.exercise_count)
    }
}

/// Background task posting `Tick` messages for one daily-plan generation
///
/// Dropping the timer aborts the task.
#[derive(Debug)]
pub struct RevealTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl RevealTimer {
    /// Spawn a timer that sends at most `ticks` ticks, one every `interval`
    ///
    /// `interval` is raised to [`MIN_REVEAL_INTERVAL`] if shorter.
    pub fn spawn(
        interval: Duration,
        ticks: usize,
        generation: u64,
        tx: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        debug!(?interval, ticks, generation, "RevealTimer::spawn: called");
        let interval = interval.max(MIN_REVEAL_INTERVAL);
        let first = Instant::now() + interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for _ in 0..ticks {
                ticker.tick().await;
                if tx.send(SessionMessage::Tick { generation }).is_err() {
                    debug!(generation, "RevealTimer: session gone, stopping");
                    break;
                }
            }
        });
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resets_counter() {
        let mut reveal = RevealScheduler::new();
        reveal.start(2);
        reveal.tick();
        reveal.tick();

        reveal.start(5);
        assert_eq!(reveal.counter(), 0);
        assert!(reveal.is_active());
        assert_eq!(reveal.limit(), 7);
    }

    #[test]
    fn test_counter_stops_at_limit() {
        let mut reveal = RevealScheduler::new();
        reveal.start(3);

        let mut seen = vec![reveal.counter()];
        while reveal.tick() {
            seen.push(reveal.counter());
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert!(!reveal.is_active());
        assert!(reveal.is_complete());
        // further ticks are ignored
        assert!(!reveal.tick());
        assert_eq!(reveal.counter(), 5);
    }

    #[test]
    fn test_reveal_order() {
        let mut reveal = RevealScheduler::new();
        reveal.start(2);

        assert!(!reveal.is_motivation_visible());
        assert!(!reveal.is_exercise_visible(0));

        reveal.tick(); // 1: header
        assert!(reveal.is_motivation_visible());
        assert!(!reveal.is_exercise_visible(0));

        reveal.tick(); // 2: first exercise
        assert!(reveal.is_exercise_visible(0));
        assert!(!reveal.is_exercise_visible(1));
        assert_eq!(reveal.visible_exercise_count(), 1);

        reveal.tick(); // 3: second exercise
        assert!(reveal.is_exercise_visible(1));
        assert!(!reveal.is_mental_visible());

        reveal.tick(); // 4 = N + 2: mental exercise
        assert!(reveal.is_mental_visible());
        assert_eq!(reveal.visible_exercise_count(), 2);
    }

    #[test]
    fn test_visibility_matches_counter_formula() {
        let mut reveal = RevealScheduler::new();
        let n = 4;
        reveal.start(n);
        loop {
            let c = reveal.counter();
            for i in 0..n {
                assert_eq!(reveal.is_exercise_visible(i), c >= i + 2);
            }
            assert_eq!(reveal.is_mental_visible(), c >= n + 2);
            if !reveal.tick() {
                break;
            }
        }
    }

    #[test]
    fn test_empty_plan_still_reveals_header_and_mental() {
        let mut reveal = RevealScheduler::new();
        reveal.start(0);

        assert!(reveal.tick());
        assert!(reveal.is_motivation_visible());
        assert!(!reveal.is_mental_visible());
        assert!(reveal.tick());
        assert!(reveal.is_mental_visible());
        assert!(!reveal.is_active());
    }

    #[test]
    fn test_cancel_freezes_counter() {
        let mut reveal = RevealScheduler::new();
        reveal.start(3);
        reveal.tick();
        reveal.cancel();

        assert!(!reveal.tick());
        assert_eq!(reveal.counter(), 1);
    }

    #[test]
    fn test_finish_reveals_everything() {
        let mut reveal = RevealScheduler::new();
        reveal.start(3);
        reveal.tick();
        reveal.finish();

        assert_eq!(reveal.counter(), 5);
        assert!(reveal.is_mental_visible());
        assert!(!reveal.is_active());
    }

    #[test]
    fn test_unstarted_scheduler_shows_nothing() {
        let reveal = RevealScheduler::new();
        assert!(!reveal.is_motivation_visible());
        assert!(!reveal.is_mental_visible());
        assert_eq!(reveal.visible_exercise_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_on_cadence_then_stops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = RevealTimer::spawn(DEFAULT_REVEAL_INTERVAL, 3, 9, tx);

        let start = Instant::now();
        for expected in 1..=3u32 {
            let msg = rx.recv().await.unwrap();
            assert!(matches!(msg, SessionMessage::Tick { generation: 9 }));
            assert_eq!(start.elapsed(), DEFAULT_REVEAL_INTERVAL * expected);
        }

        tokio::time::sleep(DEFAULT_REVEAL_INTERVAL * 5).await;
        assert!(rx.try_recv().is_err());
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = RevealTimer::spawn(Duration::ZERO, 2, 4, tx);

        let start = Instant::now();
        for expected in 1..=2u32 {
            let msg = rx.recv().await.unwrap();
            assert!(matches!(msg, SessionMessage::Tick { generation: 4 }));
            assert_eq!(start.elapsed(), MIN_REVEAL_INTERVAL * expected);
        }
        // both ticks sent, the task ended and dropped its sender
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = RevealTimer::spawn(DEFAULT_REVEAL_INTERVAL, 10, 1, tx);

        assert!(rx.recv().await.is_some());
        drop(timer);

        tokio::time::sleep(DEFAULT_REVEAL_INTERVAL * 10).await;
        // the aborted task dropped its sender, so the channel is closed and empty
        assert!(rx.recv().await.is_none());
    }
}
