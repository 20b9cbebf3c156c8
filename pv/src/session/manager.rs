//! Session orchestrator
//!
//! A [`Session`] owns all user-visible state. Provider calls and the reveal
//! timer run as spawned tasks and post [`SessionMessage`]s back over an
//! unbounded channel; the owner applies them with [`Session::process_pending`]
//! (non-blocking) or [`Session::next_message`] (awaits one). Nothing outside
//! the owner mutates state, so there is no locking.
//!
//! Methods that start fetches spawn tokio tasks and must be called from within
//! a runtime.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cache::PhysioSlot;
use super::fetch::{FetchSlot, FetchState, Resolution};
use super::messages::{SessionEvent, SessionMessage};
use super::permission::PermissionSource;
use super::progress::{self, Progress};
use super::reveal::{DEFAULT_REVEAL_INTERVAL, RevealScheduler, RevealTimer};
use super::tracker::{CompletionTracker, Favorites};
use crate::config::Config;
use crate::domain::{DailyPlan, DiaryEntry, Exercise, Medication, Mood, PlanKind, SymptomAssessment};
use crate::provider::{ContentProvider, ProviderError};
use crate::store::SessionStore;

/// Capacity of the observer broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Aborts the wrapped task when dropped, so aborting the reporting task also
/// cancels the provider call it awaits
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Which exercise list the user is looking at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExerciseTab {
    #[default]
    Daily,
    Physio,
    Favorites,
}

/// Construction parameters not owned by the provider or store
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub reveal_interval: Duration,
    pub medications: Vec<Medication>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            medications: Vec::new(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reveal_interval: config.reveal.interval(),
            medications: config.medication_schedule(),
        }
    }
}

pub struct Session {
    provider: Arc<dyn ContentProvider>,
    store: Box<dyn SessionStore>,
    reveal_interval: Duration,

    tx: mpsc::UnboundedSender<SessionMessage>,
    rx: mpsc::UnboundedReceiver<SessionMessage>,
    events: broadcast::Sender<SessionEvent>,
    /// Provider calls still running
    tasks: Vec<JoinHandle<()>>,

    daily: FetchSlot<DailyPlan>,
    physio: PhysioSlot,
    triage: FetchSlot<SymptomAssessment>,

    reveal: RevealScheduler,
    reveal_timer: Option<RevealTimer>,

    completions: CompletionTracker,
    favorites: Favorites,
    diary: Vec<DiaryEntry>,
    medications: Vec<Medication>,
    notifications_enabled: bool,
    tab: ExerciseTab,
}

impl Session {
    /// Create a session, loading favorites and diary from `store`
    pub fn new(provider: Arc<dyn ContentProvider>, store: Box<dyn SessionStore>, options: SessionOptions) -> Self {
        debug!(reveal_interval = ?options.reveal_interval, "Session::new: called");
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let favorites = Favorites::from_stored(store.load_favorites());
        let diary = store.load_diary();
        info!(
            favorites = favorites.len(),
            diary_entries = diary.len(),
            medications = options.medications.len(),
            "Session state loaded"
        );

        Self {
            provider,
            store,
            reveal_interval: options.reveal_interval,
            tx,
            rx,
            events,
            tasks: Vec::new(),
            daily: FetchSlot::new(),
            physio: PhysioSlot::new(),
            triage: FetchSlot::new(),
            reveal: RevealScheduler::new(),
            reveal_timer: None,
            completions: CompletionTracker::new(),
            favorites,
            diary,
            medications: options.medications,
            notifications_enabled: false,
            tab: ExerciseTab::Daily,
        }
    }

    /// Kick off the initial daily plan load
    pub fn start(&mut self) -> u64 {
        debug!("Session::start: called");
        self.fetch_daily_plan()
    }

    /// Observe session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Run a provider call and always post its tagged result
    ///
    /// The call runs as its own task. If it panics or is cancelled the outer
    /// task still reports `ProviderError::Aborted`, so the slot cannot stay
    /// loading.
    fn spawn_request<T, F, M>(&mut self, request: F, into_message: M)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ProviderError>> + Send + 'static,
        M: FnOnce(Result<T, ProviderError>) -> SessionMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        let outer = tokio::spawn(async move {
            let mut inner = AbortOnDrop(tokio::spawn(request));
            let result = match (&mut inner.0).await {
                Ok(result) => result,
                Err(e) if e.is_panic() => {
                    warn!("Provider call panicked");
                    Err(ProviderError::Aborted("provider call panicked".to_string()))
                }
                Err(_) => Err(ProviderError::Aborted("provider call cancelled".to_string())),
            };
            let _ = tx.send(into_message(result));
        });
        self.tasks.retain(|handle| !handle.is_finished());
        self.tasks.push(outer);
    }

    // === Fetching ===

    /// Request a fresh daily plan, superseding any request in flight
    ///
    /// The current plan stays readable until the new one arrives. Its reveal
    /// timer is stopped straight away.
    pub fn fetch_daily_plan(&mut self) -> u64 {
        self.stop_reveal_timer();
        self.reveal.cancel();

        let generation = self.daily.begin();
        info!(generation, "Fetching daily plan");

        let provider = Arc::clone(&self.provider);
        self.spawn_request(async move { provider.get_daily_plan().await }, move |result| {
            SessionMessage::DailyPlan { generation, result }
        });
        generation
    }

    /// Load the physio plan unless it is cached or already loading
    ///
    /// Returns whether a provider call was made.
    pub fn fetch_physio_plan(&mut self) -> bool {
        let Some(generation) = self.physio.begin() else {
            return false;
        };
        info!(generation, "Fetching physio plan");

        let provider = Arc::clone(&self.provider);
        self.spawn_request(async move { provider.get_physio_plan().await }, move |result| {
            SessionMessage::PhysioPlan { generation, result }
        });
        true
    }

    /// Send `text` for triage; blank input is ignored and returns None
    pub fn classify_symptoms(&mut self, text: &str) -> Option<u64> {
        if text.trim().is_empty() {
            debug!("Session::classify_symptoms: blank input ignored");
            return None;
        }

        let generation = self.triage.begin();
        info!(generation, text_len = text.len(), "Classifying symptoms");

        let provider = Arc::clone(&self.provider);
        let text = text.to_string();
        self.spawn_request(async move { provider.classify_symptoms(&text).await }, move |result| {
            SessionMessage::Triage { generation, result }
        });
        Some(generation)
    }

    // === Message loop ===

    /// Apply every message already queued; returns how many were handled
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            handled += 1;
        }
        if handled > 0 {
            debug!(handled, "Session::process_pending: applied messages");
        }
        handled
    }

    /// Wait for the next message and apply it
    ///
    /// Waits forever if nothing is in flight; check [`Self::is_busy`] first.
    pub async fn next_message(&mut self) {
        // the session holds a sender, so the channel never closes
        if let Some(message) = self.rx.recv().await {
            self.apply(message);
        }
    }

    /// Whether a fetch or the reveal timer can still produce messages
    pub fn is_busy(&self) -> bool {
        self.daily.is_loading() || self.physio.is_loading() || self.triage.is_loading() || self.reveal_timer.is_some()
    }

    /// Apply messages until nothing is in flight and the reveal has finished
    pub async fn settle(&mut self) {
        debug!("Session::settle: called");
        while self.is_busy() {
            self.next_message().await;
        }
        self.process_pending();
    }

    fn apply(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::DailyPlan { generation, result } => self.apply_daily(generation, result),
            SessionMessage::PhysioPlan { generation, result } => self.apply_physio(generation, result),
            SessionMessage::Triage { generation, result } => self.apply_triage(generation, result),
            SessionMessage::Tick { generation } => self.apply_tick(generation),
        }
    }

    fn apply_daily(&mut self, generation: u64, result: Result<DailyPlan, ProviderError>) {
        let result = result.map_err(|e| e.to_string());
        match self.daily.resolve(generation, result) {
            Resolution::Applied => {
                let exercises = self.daily.data().map(DailyPlan::exercise_count).unwrap_or(0);
                info!(generation, exercises, "Daily plan loaded");
                self.completions.clear(PlanKind::Daily);
                self.start_reveal(generation, exercises);
                self.emit(SessionEvent::DailyPlanLoaded { exercises });
            }
            Resolution::Failed => {
                let reason = self.daily.state().error().unwrap_or_default().to_string();
                warn!(generation, %reason, "Daily plan fetch failed");
                // whatever plan is still shown should be fully visible
                self.reveal.finish();
                self.emit(SessionEvent::DailyPlanFailed { reason });
            }
            Resolution::Stale => {}
        }
    }

    fn apply_physio(&mut self, generation: u64, result: Result<Vec<Exercise>, ProviderError>) {
        let result = result.map_err(|e| e.to_string());
        match self.physio.resolve(generation, result) {
            Resolution::Applied => {
                let exercises = self.physio.exercises().len();
                info!(generation, exercises, "Physio plan loaded");
                self.emit(SessionEvent::PhysioPlanLoaded { exercises });
            }
            Resolution::Failed => {
                let reason = self.physio.state().error().unwrap_or_default().to_string();
                warn!(generation, %reason, "Physio plan fetch failed");
                self.emit(SessionEvent::PhysioPlanFailed { reason });
            }
            Resolution::Stale => {}
        }
    }

    fn apply_triage(&mut self, generation: u64, result: Result<SymptomAssessment, ProviderError>) {
        let result = result.map_err(|e| e.to_string());
        match self.triage.resolve(generation, result) {
            Resolution::Applied => {
                let level = self.triage.data().map(|a| a.level.clone()).unwrap_or_default();
                info!(generation, %level, "Symptom triage ready");
                self.emit(SessionEvent::TriageReady { level });
            }
            Resolution::Failed => {
                let reason = self.triage.state().error().unwrap_or_default().to_string();
                warn!(generation, %reason, "Symptom triage failed");
                self.emit(SessionEvent::TriageFailed { reason });
            }
            Resolution::Stale => {}
        }
    }

    // === Reveal ===

    fn start_reveal(&mut self, generation: u64, exercises: usize) {
        self.stop_reveal_timer();
        self.reveal.start(exercises);
        self.reveal_timer = Some(RevealTimer::spawn(
            self.reveal_interval,
            self.reveal.limit(),
            generation,
            self.tx.clone(),
        ));
    }

    fn stop_reveal_timer(&mut self) {
        if let Some(timer) = self.reveal_timer.take() {
            debug!(generation = timer.generation(), "Session::stop_reveal_timer: aborting");
        }
    }

    fn apply_tick(&mut self, generation: u64) {
        let current = self.reveal_timer.as_ref().map(RevealTimer::generation);
        if current != Some(generation) {
            debug!(generation, ?current, "Session::apply_tick: stale tick dropped");
            return;
        }

        if self.reveal.tick() {
            self.emit(SessionEvent::Revealed {
                counter: self.reveal.counter(),
            });
        }
        if !self.reveal.is_active() {
            self.stop_reveal_timer();
            self.emit(SessionEvent::RevealFinished);
        }
    }

    pub fn reveal_counter(&self) -> usize {
        self.reveal.counter()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_active()
    }

    pub fn is_motivation_visible(&self) -> bool {
        self.daily.data().is_some() && self.reveal.is_motivation_visible()
    }

    pub fn is_exercise_visible(&self, idx: usize) -> bool {
        self.daily.data().is_some_and(|plan| idx < plan.exercise_count()) && self.reveal.is_exercise_visible(idx)
    }

    pub fn is_mental_visible(&self) -> bool {
        self.daily.data().is_some() && self.reveal.is_mental_visible()
    }

    /// The prefix of daily exercises revealed so far
    pub fn visible_exercises(&self) -> &[Exercise] {
        match self.daily.data() {
            Some(plan) => {
                let n = self.reveal.visible_exercise_count().min(plan.exercise_count());
                &plan.physical_exercises[..n]
            }
            None => &[],
        }
    }

    // === Content views ===

    pub fn daily_plan(&self) -> Option<&DailyPlan> {
        self.daily.data()
    }

    pub fn daily_state(&self) -> FetchState<&DailyPlan> {
        self.daily.state()
    }

    pub fn physio_plan(&self) -> &[Exercise] {
        self.physio.exercises()
    }

    pub fn physio_state(&self) -> FetchState<&[Exercise]> {
        self.physio.state()
    }

    pub fn triage_result(&self) -> Option<&SymptomAssessment> {
        self.triage.data()
    }

    pub fn triage_state(&self) -> FetchState<&SymptomAssessment> {
        self.triage.state()
    }

    // === Tabs ===

    /// Switch tabs; selecting Physio loads that plan on first use
    pub fn select_tab(&mut self, tab: ExerciseTab) {
        debug!(?tab, "Session::select_tab: called");
        self.tab = tab;
        if tab == ExerciseTab::Physio {
            self.fetch_physio_plan();
        }
    }

    pub fn tab(&self) -> ExerciseTab {
        self.tab
    }

    // === Completion and favorites ===

    /// Toggle a physical exercise of `kind`; returns whether it is now completed
    pub fn toggle_completion(&mut self, kind: PlanKind, idx: usize) -> bool {
        self.completions.toggle(kind, idx)
    }

    /// Toggle the daily mental exercise, tracked at index N
    pub fn toggle_mental_completion(&mut self) -> bool {
        let idx = self.daily.data().map(DailyPlan::exercise_count).unwrap_or(0);
        self.completions.toggle(PlanKind::Daily, idx)
    }

    pub fn is_completed(&self, kind: PlanKind, idx: usize) -> bool {
        self.completions.is_completed(kind, idx)
    }

    pub fn is_mental_completed(&self) -> bool {
        let idx = self.daily.data().map(DailyPlan::exercise_count).unwrap_or(0);
        self.completions.is_completed(PlanKind::Daily, idx)
    }

    pub fn completed_count(&self, kind: PlanKind) -> usize {
        self.completions.completed_count(kind)
    }

    /// Add or remove a favorite by title and persist the collection
    ///
    /// Returns whether the exercise is a favorite afterwards. A failed save
    /// is logged; the in-memory change stands.
    pub fn toggle_favorite(&mut self, exercise: &Exercise) -> bool {
        let favorite = self.favorites.toggle(exercise);
        if let Err(e) = self.store.save_favorites(self.favorites.items()) {
            warn!(error = %e, "Failed to save favorites");
        }
        self.emit(SessionEvent::FavoritesChanged {
            count: self.favorites.len(),
        });
        favorite
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.contains(title)
    }

    pub fn favorites(&self) -> &[Exercise] {
        self.favorites.items()
    }

    // === Diary ===

    /// Prepend a diary entry and persist; blank notes are ignored
    pub fn save_diary_entry(&mut self, mood: Mood, tremor_level: u8, notes: &str) -> Option<&DiaryEntry> {
        let entry = DiaryEntry::new(mood, tremor_level, notes)?;
        info!(id = %entry.id, %mood, tremor_level = entry.tremor_level, "Diary entry saved");
        self.diary.insert(0, entry);

        if let Err(e) = self.store.save_diary(&self.diary) {
            warn!(error = %e, "Failed to save diary");
        }
        self.emit(SessionEvent::DiaryChanged {
            count: self.diary.len(),
        });
        self.diary.first()
    }

    /// Entries, newest first
    pub fn diary(&self) -> &[DiaryEntry] {
        &self.diary
    }

    pub fn tremor_series(&self, n: usize) -> Vec<(String, u8)> {
        progress::tremor_series(&self.diary, n)
    }

    // === Medications ===

    /// Flip `taken` on the medication with `id`; false when no such id
    pub fn toggle_medication(&mut self, id: &str) -> bool {
        let Some(medication) = self.medications.iter_mut().find(|m| m.id == id) else {
            debug!(%id, "Session::toggle_medication: unknown id");
            return false;
        };
        medication.taken = !medication.taken;
        let taken = medication.taken;
        debug!(%id, taken, "Session::toggle_medication: toggled");
        self.emit(SessionEvent::MedicationToggled {
            id: id.to_string(),
            taken,
        });
        true
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    // === Progress ===

    pub fn progress(&self) -> Progress {
        Progress::compute(
            &self.medications,
            self.daily.data(),
            self.completions.completed_count(PlanKind::Daily),
        )
    }

    pub fn medications_remaining(&self) -> usize {
        progress::medications_remaining(&self.medications)
    }

    pub fn planned_exercise_count(&self) -> usize {
        progress::planned_exercise_count(self.daily.data())
    }

    // === Notifications ===

    /// Ask `source` for permission and remember the answer
    pub async fn request_notifications(&mut self, source: &dyn PermissionSource) -> bool {
        let granted = source.request().await;
        info!(granted, "Notification permission answered");
        self.notifications_enabled = granted;
        granted
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// Stop the reveal timer and abandon in-flight requests
    ///
    /// Abandoned requests no longer count as loading, so the session is idle
    /// afterwards.
    pub fn shutdown(&mut self) {
        debug!(tasks = self.tasks.len(), "Session::shutdown: called");
        self.stop_reveal_timer();
        self.reveal.cancel();
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
        self.daily.cancel();
        self.physio.cancel();
        self.triage.cancel();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
