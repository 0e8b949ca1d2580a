use chrono::NaiveDate;

use super::actions::ActivityDraft;
use super::actions::ActivityPatch;
use super::actions::RoutineAction;
use super::actions::UserPatch;
use super::catalog::DEFAULT_TIMER_MINUTES;
use super::clock::Clock;
use super::config::Config;
use super::config::DEFAULT_STORAGE_KEY;
use super::derive::PhaseGate;
use super::error::ActionError;
use super::i18n::Translator;
use super::persistence::decode_state;
use super::persistence::encode_state;
use super::persistence::KeyValueStorage;
use super::reducer::reduce;
use super::reducer::RoutineEffect;
use super::state::ActivityPhase;
use super::state::AppState;
use super::state::LocalizedText;
use super::state::Theme;

/// Receives the active theme each time state is written, so styling can follow it globally.
pub trait ThemeSink {
    fn apply_theme(&mut self, theme: Theme);
}

impl<F: FnMut(Theme)> ThemeSink for F {
    fn apply_theme(&mut self, theme: Theme) {
        (*self)(theme)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub key: String,
    pub gate: PhaseGate,
    pub default_timer_minutes: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            gate: PhaseGate::default(),
            default_timer_minutes: DEFAULT_TIMER_MINUTES,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            key: config.storage.key.clone(),
            gate: config.routine.gate(),
            default_timer_minutes: config.routine.default_timer_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Durable,
    /// A storage call failed; changes live in memory until the process exits.
    InMemory,
}

/// Owner of the application state. Reads go through [`RoutineStore::state`], writes through
/// [`RoutineStore::dispatch`], and every applied write is persisted before `dispatch` returns.
pub struct RoutineStore<S> {
    storage: S,
    options: StoreOptions,
    state: AppState,
    mode: PersistenceMode,
    theme_sink: Option<Box<dyn ThemeSink>>,
}

impl<S: KeyValueStorage> RoutineStore<S> {
    /// Loads the stored record, or defaults when it is absent or unreadable, then applies the
    /// daily reset and writes the result back. Never fails.
    pub fn load(storage: S, clock: &dyn Clock, options: StoreOptions) -> Self {
        let today = clock.today();
        let mut mode = PersistenceMode::Durable;
        let (mut state, stored_date) = match storage.get(&options.key) {
            Ok(Some(text)) => {
                match decode_state(&text, today, options.default_timer_minutes) {
                    Ok(decoded) => {
                        if !decoded.repairs.is_empty() {
                            let repairs: Vec<&str> =
                                decoded.repairs.iter().map(|repair| repair.label()).collect();
                            tracing::info!(?repairs, "migrated stored record");
                        }
                        (decoded.state, decoded.stored_date)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "stored record unreadable, using defaults");
                        (AppState::new(today), Some(today))
                    }
                }
            }
            Ok(None) => {
                tracing::debug!(key = %options.key, "no stored record, using defaults");
                (AppState::new(today), Some(today))
            }
            Err(err) => {
                tracing::warn!(error = %err, "storage read failed, continuing in memory");
                mode = PersistenceMode::InMemory;
                (AppState::new(today), Some(today))
            }
        };

        if apply_daily_reset(&mut state, stored_date, today) {
            tracing::info!(today = %today, "new day, progress cleared");
        }

        let mut store = Self {
            storage,
            options,
            state,
            mode,
            theme_sink: None,
        };
        store.persist();
        store
    }

    /// Installs the theme hook and hands it the current theme straight away.
    pub fn with_theme_sink(mut self, sink: impl ThemeSink + 'static) -> Self {
        let mut sink: Box<dyn ThemeSink> = Box::new(sink);
        sink.apply_theme(self.state.user.theme);
        self.theme_sink = Some(sink);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.state.user.language)
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.translator().t(key)
    }

    pub fn phase_complete(&self, phase: ActivityPhase) -> bool {
        self.options.gate.phase_complete(&self.state, phase)
    }

    pub fn phase_locked(&self, phase: ActivityPhase) -> bool {
        self.options.gate.phase_locked(&self.state, phase)
    }

    pub fn all_complete(&self) -> bool {
        self.options.gate.all_complete(&self.state)
    }

    /// Applies `action` to a copy of the state and swaps it in only on success.
    pub fn dispatch(&mut self, action: RoutineAction) -> Result<Vec<RoutineEffect>, ActionError> {
        let label = action.label();
        let was_complete = self.all_complete();
        let mut next = self.state.clone();
        let mut effects = match reduce(&mut next, action) {
            Ok(effects) => effects,
            Err(err) => {
                tracing::debug!(action = label, error = %err, "action rejected");
                return Err(err);
            }
        };
        if !effects.contains(&RoutineEffect::Persist) {
            tracing::debug!(action = label, "action left state unchanged");
            return Ok(effects);
        }
        self.state = next;
        tracing::debug!(action = label, "action applied");
        if !was_complete && self.all_complete() {
            tracing::info!("all phases complete");
            effects.push(RoutineEffect::DayComplete);
        }
        self.persist();
        Ok(effects)
    }

    /// Writes the full state under the configured key and notifies the theme hook.
    pub fn persist(&mut self) {
        if let Some(sink) = self.theme_sink.as_mut() {
            sink.apply_theme(self.state.user.theme);
        }
        if self.mode == PersistenceMode::InMemory {
            return;
        }
        let result =
            encode_state(&self.state).and_then(|text| self.storage.set(&self.options.key, &text));
        if let Err(err) = result {
            tracing::warn!(error = %err, "storage write failed, continuing in memory");
            self.mode = PersistenceMode::InMemory;
        }
    }

    pub fn update_user(&mut self, patch: UserPatch) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::UpdateUser(patch)).map(drop)
    }

    /// Flips completion of `id` and reports whether this toggle finished the day.
    pub fn toggle_task(&mut self, id: impl Into<String>) -> Result<bool, ActionError> {
        let effects = self.dispatch(RoutineAction::ToggleTask(id.into()))?;
        Ok(effects.contains(&RoutineEffect::DayComplete))
    }

    pub fn reset_progress(&mut self) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::ResetProgress).map(drop)
    }

    /// Adds an activity at the end of `phase` and returns its new id.
    pub fn add_activity(
        &mut self,
        phase: ActivityPhase,
        draft: ActivityDraft,
    ) -> Result<String, ActionError> {
        let effects = self.dispatch(RoutineAction::AddActivity { phase, draft })?;
        Ok(effects
            .into_iter()
            .find_map(|effect| match effect {
                RoutineEffect::ActivityCreated { id, .. } => Some(id),
                _ => None,
            })
            .unwrap_or_default())
    }

    pub fn remove_activity(&mut self, phase: ActivityPhase, id: &str) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::RemoveActivity {
            phase,
            id: id.to_string(),
        })
        .map(drop)
    }

    pub fn update_activity(
        &mut self,
        phase: ActivityPhase,
        id: &str,
        patch: ActivityPatch,
    ) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::UpdateActivity {
            phase,
            id: id.to_string(),
            patch,
        })
        .map(drop)
    }

    pub fn reorder_activities(
        &mut self,
        phase: ActivityPhase,
        from: usize,
        to: usize,
    ) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::ReorderActivities { phase, from, to })
            .map(drop)
    }

    pub fn update_phase_name(
        &mut self,
        phase: ActivityPhase,
        name: LocalizedText,
    ) -> Result<(), ActionError> {
        self.dispatch(RoutineAction::UpdatePhaseName { phase, name })
            .map(drop)
    }
}

/// Clears the day's progress when the stored day is not `today`. Skipped until onboarding
/// is complete. Returns whether a reset happened.
pub fn apply_daily_reset(
    state: &mut AppState,
    stored_date: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    if !state.user.onboarding_complete || stored_date == Some(today) {
        return false;
    }
    state.completed_tasks.clear();
    state.last_interaction = None;
    state.last_completed_date = today;
    true
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::clock::parse_date;
    use crate::clock::FixedClock;
    use crate::error::StorageError;
    use crate::persistence::FileStorage;
    use crate::persistence::MemoryStorage;
    use crate::state::Language;

    fn day(value: &str) -> NaiveDate {
        parse_date(value).expect("date")
    }

    fn record(onboarded: bool, completed: &[&str], date: &str) -> String {
        serde_json::json!({
            "user": {
                "name": "Anri",
                "language": "en",
                "theme": "seun",
                "onboardingComplete": onboarded
            },
            "completedTasks": completed,
            "theme": "seun",
            "lastCompletedDate": date,
            "lastInteraction": completed.last()
        })
        .to_string()
    }

    fn load(storage: MemoryStorage, today: &str) -> RoutineStore<MemoryStorage> {
        RoutineStore::load(storage, &FixedClock(day(today)), StoreOptions::default())
    }

    fn stored(store: &RoutineStore<MemoryStorage>) -> serde_json::Value {
        let text = store
            .storage()
            .get(DEFAULT_STORAGE_KEY)
            .expect("get")
            .expect("record written");
        serde_json::from_str(&text).expect("json")
    }

    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: bool,
        fail_writes: bool,
        writes: usize,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(std::io::Error::other("disk gone").into());
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn new_day_clears_progress_after_onboarding() {
        let storage =
            MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, record(true, &["unpack"], "2024-01-01"));
        let store = load(storage, "2024-01-02");

        assert!(store.state().completed_tasks.is_empty());
        assert_eq!(store.state().last_interaction, None);
        assert_eq!(store.state().last_completed_date, day("2024-01-02"));
        assert_eq!(stored(&store)["lastCompletedDate"], "2024-01-02");
        assert_eq!(stored(&store)["completedTasks"], serde_json::json!([]));
    }

    #[test]
    fn no_reset_before_onboarding() {
        let storage = MemoryStorage::with_entry(
            DEFAULT_STORAGE_KEY,
            record(false, &["unpack"], "2024-01-01"),
        );
        let store = load(storage, "2024-01-02");

        assert_eq!(store.state().completed_tasks.as_slice(), ["unpack"]);
        assert_eq!(store.state().last_interaction.as_deref(), Some("unpack"));
        assert_eq!(store.state().last_completed_date, day("2024-01-01"));
    }

    #[test]
    fn same_day_keeps_progress() {
        let storage =
            MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, record(true, &["unpack"], "2024-01-02"));
        let store = load(storage, "2024-01-02");
        assert_eq!(store.state().completed_tasks.as_slice(), ["unpack"]);
    }

    #[test]
    fn unreadable_date_counts_as_another_day() {
        let storage =
            MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, record(true, &["unpack"], "yesterday"));
        let store = load(storage, "2024-01-02");
        assert!(store.state().completed_tasks.is_empty());
        assert_eq!(store.state().last_completed_date, day("2024-01-02"));
    }

    #[test]
    fn corrupt_record_falls_back_to_defaults_and_is_replaced() {
        let storage = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let store = load(storage, "2024-01-02");

        assert_eq!(store.state(), &AppState::new(day("2024-01-02")));
        assert_eq!(store.mode(), PersistenceMode::Durable);
        assert_eq!(stored(&store)["user"]["onboardingComplete"], false);
    }

    #[test]
    fn empty_storage_starts_from_defaults() {
        let store = load(MemoryStorage::new(), "2024-01-02");
        assert_eq!(store.state().user.name, "");
        assert_eq!(store.state().user.language, Language::Af);
        assert!(!store.state().user.onboarding_complete);
        assert_eq!(store.state().activities(ActivityPhase::Arrival).len(), 5);
    }

    #[test]
    fn every_applied_mutation_is_persisted() {
        let mut store = load(MemoryStorage::new(), "2024-01-02");
        store.toggle_task("unpack").expect("toggle");
        assert_eq!(stored(&store)["completedTasks"], serde_json::json!(["unpack"]));
        assert_eq!(stored(&store)["lastInteraction"], "unpack");

        store
            .update_user(UserPatch {
                theme: Some(Theme::Seun),
                ..UserPatch::default()
            })
            .expect("update");
        assert_eq!(stored(&store)["theme"], "seun");
        assert_eq!(stored(&store)["user"]["theme"], "seun");
    }

    #[test]
    fn rejected_mutation_leaves_state_and_record_alone() {
        let mut store = load(MemoryStorage::new(), "2024-01-02");
        let before = store.state().clone();
        let record_before = stored(&store);

        let err = store
            .reorder_activities(ActivityPhase::Organization, 0, 5)
            .expect_err("out of range");

        assert!(matches!(err, ActionError::IndexOutOfRange { .. }));
        assert_eq!(store.state(), &before);
        assert_eq!(stored(&store), record_before);
    }

    #[test]
    fn mutations_survive_reload() {
        let dir = tempdir().expect("tmpdir");
        let clock = FixedClock(day("2024-01-02"));
        let storage = FileStorage::open(dir.path()).expect("open");
        let mut store = RoutineStore::load(storage, &clock, StoreOptions::default());
        let id = store
            .add_activity(
                ActivityPhase::Study,
                ActivityDraft::new("Music", LocalizedText::new("Musiek", "Music")),
            )
            .expect("add");
        store
            .update_phase_name(ActivityPhase::Study, LocalizedText::new("Leer", "Learn"))
            .expect("rename");
        store.toggle_task(id.clone()).expect("toggle");

        let storage = FileStorage::open(dir.path()).expect("reopen");
        let reloaded = RoutineStore::load(storage, &clock, StoreOptions::default());

        assert_eq!(reloaded.state(), store.state());
        assert!(reloaded.state().find_activity(ActivityPhase::Study, &id).is_some());
    }

    #[test]
    fn read_failure_keeps_running_in_memory() {
        let storage = FlakyStorage {
            fail_reads: true,
            ..FlakyStorage::default()
        };
        let mut store = RoutineStore::load(
            storage,
            &FixedClock(day("2024-01-02")),
            StoreOptions::default(),
        );
        assert_eq!(store.mode(), PersistenceMode::InMemory);

        store.toggle_task("unpack").expect("toggle");

        assert!(store.state().is_completed("unpack"));
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn write_failure_degrades_without_failing_callers() {
        let storage = FlakyStorage {
            fail_writes: true,
            ..FlakyStorage::default()
        };
        let mut store = RoutineStore::load(
            storage,
            &FixedClock(day("2024-01-02")),
            StoreOptions::default(),
        );
        assert_eq!(store.mode(), PersistenceMode::InMemory);
        assert_eq!(store.storage().writes, 1);

        store.toggle_task("unpack").expect("toggle");
        store.toggle_task("lunch").expect("toggle");

        assert_eq!(store.state().completed_tasks.as_slice(), ["unpack", "lunch"]);
        assert_eq!(store.storage().writes, 1);
    }

    #[test]
    fn theme_hook_sees_every_persist() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let mut store = load(MemoryStorage::new(), "2024-01-02")
            .with_theme_sink(move |theme: Theme| sink_seen.borrow_mut().push(theme));

        store
            .update_user(UserPatch {
                theme: Some(Theme::Seun),
                ..UserPatch::default()
            })
            .expect("update");

        assert_eq!(*seen.borrow(), vec![Theme::Meisie, Theme::Seun]);
    }

    #[test]
    fn finishing_the_last_task_reports_day_complete() {
        let mut store = load(MemoryStorage::new(), "2024-01-02");
        let ids: Vec<String> = ActivityPhase::ALL
            .into_iter()
            .flat_map(|phase| store.state().activities(phase).to_vec())
            .map(|activity| activity.id)
            .collect();
        let (last, rest) = ids.split_last().expect("defaults are not empty");

        for id in rest {
            assert!(!store.toggle_task(id.clone()).expect("toggle"));
        }
        assert!(store.phase_complete(ActivityPhase::Organization));
        assert!(!store.phase_locked(ActivityPhase::Study));
        assert!(store.toggle_task(last.clone()).expect("toggle"));
        assert!(store.all_complete());

        assert!(!store.toggle_task(last.clone()).expect("untoggle"));
        assert!(!store.all_complete());
    }

    #[test]
    fn translation_follows_user_language() {
        let mut store = load(MemoryStorage::new(), "2024-01-02");
        assert_eq!(store.t("yes"), "Ja");
        store
            .update_user(UserPatch {
                language: Some(Language::En),
                ..UserPatch::default()
            })
            .expect("update");
        assert_eq!(store.t("yes"), "Yes");
        assert_eq!(store.t("nonexistent_key"), "nonexistent_key");
    }
}
