use std::collections::HashMap;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::catalog;
use super::clock::format_date;
use super::clock::parse_date;
use super::error::StorageError;
use super::state::Activity;
use super::state::AppState;
use super::state::CompletedTasks;
use super::state::LocalizedText;
use super::state::PhaseMap;
use super::state::Theme;
use super::state::User;

/// Durable string storage addressed by key. Both directions may fail.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        write_private(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.into());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord<'a> {
    user: &'a User,
    activities: &'a PhaseMap<Vec<Activity>>,
    phase_names: &'a PhaseMap<LocalizedText>,
    completed_tasks: &'a CompletedTasks,
    theme: Theme,
    last_completed_date: String,
    last_interaction: Option<&'a str>,
}

pub fn encode_state(state: &AppState) -> Result<String, StorageError> {
    let record = PersistedRecord {
        user: &state.user,
        activities: &state.activities,
        phase_names: &state.phase_names,
        completed_tasks: &state.completed_tasks,
        theme: state.user.theme,
        last_completed_date: format_date(state.last_completed_date),
        last_interaction: state.last_interaction.as_deref(),
    };
    Ok(serde_json::to_string(&record)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    user: User,
    #[serde(default)]
    activities: Option<StoredPhases<Vec<StoredActivity>>>,
    #[serde(default)]
    phase_names: Option<StoredPhases<LocalizedText>>,
    #[serde(default)]
    completed_tasks: Vec<String>,
    #[serde(default)]
    last_completed_date: Option<String>,
    #[serde(default)]
    last_interaction: Option<String>,
}

#[derive(Deserialize)]
struct StoredPhases<T> {
    #[serde(default = "Option::default")]
    arrival: Option<T>,
    #[serde(default = "Option::default")]
    organization: Option<T>,
    #[serde(default = "Option::default")]
    study: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredActivity {
    id: String,
    #[serde(default)]
    icon_name: String,
    label: LocalizedText,
    #[serde(default)]
    has_timer: Option<bool>,
    #[serde(default)]
    timer_duration: Option<f64>,
}

/// Default-filled gaps found while decoding an older record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    ActivitiesFilled,
    PhaseNamesFilled,
    TimerDurationFilled,
    DuplicateActivityDropped,
    DuplicateCompletionDropped,
}

impl Repair {
    pub fn label(self) -> &'static str {
        match self {
            Self::ActivitiesFilled => "activities-filled",
            Self::PhaseNamesFilled => "phase-names-filled",
            Self::TimerDurationFilled => "timer-duration-filled",
            Self::DuplicateActivityDropped => "duplicate-activity-dropped",
            Self::DuplicateCompletionDropped => "duplicate-completion-dropped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub state: AppState,
    /// The stored day, when the record had a readable one.
    pub stored_date: Option<NaiveDate>,
    pub repairs: Vec<Repair>,
}

/// Decodes a stored record, filling anything an older layout lacks.
/// Only a record without a readable `user` object is rejected.
pub fn decode_state(
    text: &str,
    today: NaiveDate,
    default_timer_minutes: u32,
) -> Result<DecodedRecord, serde_json::Error> {
    let record: StoredRecord = serde_json::from_str(text)?;
    let mut repairs = Vec::new();

    let defaults = catalog::default_activities();
    let activities = match record.activities {
        Some(stored) => {
            let mut fill = |list: Option<Vec<StoredActivity>>, default: Vec<Activity>| match list {
                Some(list) => migrate_activities(list, default_timer_minutes, &mut repairs),
                None => {
                    repairs.push(Repair::ActivitiesFilled);
                    default
                }
            };
            PhaseMap {
                arrival: fill(stored.arrival, defaults.arrival),
                organization: fill(stored.organization, defaults.organization),
                study: fill(stored.study, defaults.study),
            }
        }
        None => {
            repairs.push(Repair::ActivitiesFilled);
            defaults
        }
    };

    let default_names = catalog::default_phase_names();
    let phase_names = match record.phase_names {
        Some(stored) => {
            let mut fill = |name: Option<LocalizedText>, default: LocalizedText| {
                name.unwrap_or_else(|| {
                    repairs.push(Repair::PhaseNamesFilled);
                    default
                })
            };
            PhaseMap {
                arrival: fill(stored.arrival, default_names.arrival),
                organization: fill(stored.organization, default_names.organization),
                study: fill(stored.study, default_names.study),
            }
        }
        None => {
            repairs.push(Repair::PhaseNamesFilled);
            default_names
        }
    };

    let stored_count = record.completed_tasks.len();
    let completed_tasks = CompletedTasks::from(record.completed_tasks);
    if completed_tasks.len() != stored_count {
        repairs.push(Repair::DuplicateCompletionDropped);
    }

    let stored_date = record.last_completed_date.as_deref().and_then(parse_date);
    let mut unique = Vec::with_capacity(repairs.len());
    for repair in repairs {
        if !unique.contains(&repair) {
            unique.push(repair);
        }
    }

    Ok(DecodedRecord {
        state: AppState {
            user: record.user,
            activities,
            phase_names,
            completed_tasks,
            last_completed_date: stored_date.unwrap_or(today),
            last_interaction: record.last_interaction,
        },
        stored_date,
        repairs: unique,
    })
}

fn migrate_activities(
    stored: Vec<StoredActivity>,
    default_timer_minutes: u32,
    repairs: &mut Vec<Repair>,
) -> Vec<Activity> {
    let mut seen = HashSet::new();
    let mut activities = Vec::with_capacity(stored.len());
    for item in stored {
        if !seen.insert(item.id.clone()) {
            repairs.push(Repair::DuplicateActivityDropped);
            continue;
        }
        let has_timer = item.has_timer.unwrap_or(false);
        let mut timer_duration_minutes = item
            .timer_duration
            .filter(|minutes| minutes.is_finite() && *minutes >= 1.0)
            .map(|minutes| minutes.round().min(f64::from(u32::MAX)) as u32);
        if has_timer && timer_duration_minutes.is_none() {
            repairs.push(Repair::TimerDurationFilled);
            timer_duration_minutes = Some(default_timer_minutes.max(1));
        }
        activities.push(Activity {
            id: item.id,
            icon_name: item.icon_name,
            label: item.label,
            has_timer,
            timer_duration_minutes,
        });
    }
    activities
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::state::ActivityPhase;
    use crate::state::Language;

    fn day(value: &str) -> NaiveDate {
        parse_date(value).expect("date")
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempdir().expect("tmpdir");
        let mut storage = FileStorage::open(dir.path().join("data")).expect("open");
        assert_eq!(storage.get("slimkop-app-data").expect("get"), None);

        storage.set("slimkop-app-data", "{\"a\":1}").expect("set");
        storage.set("slimkop-app-data", "{\"a\":2}").expect("overwrite");

        assert_eq!(
            storage.get("slimkop-app-data").expect("get").as_deref(),
            Some("{\"a\":2}")
        );
        assert!(dir.path().join("data/slimkop-app-data.json").exists());
    }

    #[test]
    fn boxed_storage_forwards() {
        let mut storage: Box<dyn KeyValueStorage> = Box::new(MemoryStorage::with_entry("k", "v"));
        assert_eq!(storage.get("k").expect("get"), Some("v".to_string()));
        storage.set("k", "w").expect("set");
        assert_eq!(storage.get("k").expect("get"), Some("w".to_string()));
        assert_eq!(storage.get("other").expect("get"), None);
    }

    #[test]
    fn file_storage_rejects_path_keys() {
        let dir = tempdir().expect("tmpdir");
        let storage = FileStorage::open(dir.path()).expect("open");
        assert!(matches!(
            storage.get("../escape"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn encoded_record_uses_stable_layout() {
        let state = AppState::new(day("2024-03-04"));
        let value: serde_json::Value =
            serde_json::from_str(&encode_state(&state).expect("encode")).expect("json");

        assert_eq!(value["lastCompletedDate"], "2024-03-04");
        assert_eq!(value["theme"], "meisie");
        assert_eq!(value["user"]["language"], "af");
        assert_eq!(value["user"]["onboardingComplete"], false);
        assert_eq!(value["lastInteraction"], serde_json::Value::Null);
        assert_eq!(value["activities"]["arrival"][3]["id"], "rest");
        assert_eq!(value["activities"]["arrival"][3]["timerDuration"], 30);
        assert_eq!(value["phaseNames"]["study"]["en"], "Study Session");
        assert!(value["activities"]["arrival"][0].get("timerDuration").is_none());
    }

    #[test]
    fn encode_then_decode_preserves_state() {
        let mut state = AppState::new(day("2024-03-04"));
        state.user.name = "Anri".to_string();
        state.user.language = Language::En;
        state.completed_tasks.toggle("unpack");
        state.last_interaction = Some("unpack".to_string());

        let text = encode_state(&state).expect("encode");
        let decoded = decode_state(&text, day("2024-03-05"), 30).expect("decode");

        assert_eq!(decoded.state, state);
        assert_eq!(decoded.stored_date, Some(day("2024-03-04")));
        assert!(decoded.repairs.is_empty());
    }

    #[test]
    fn legacy_record_gets_catalog_defaults() {
        let text = r#"{
            "user": {"name": "Gerhard", "language": "en", "theme": "seun", "onboardingComplete": true, "isAdmin": true},
            "completedTasks": ["unpack", "unpack", "lunch"],
            "lastCompletedDate": "2024-01-01",
            "lastInteraction": "lunch"
        }"#;
        let decoded = decode_state(text, day("2024-01-01"), 30).expect("decode");

        assert_eq!(decoded.state.activities, catalog::default_activities());
        assert_eq!(decoded.state.phase_names, catalog::default_phase_names());
        assert_eq!(decoded.state.completed_tasks.as_slice(), ["unpack", "lunch"]);
        assert_eq!(decoded.state.user.name, "Gerhard");
        assert_eq!(
            decoded.repairs,
            vec![
                Repair::ActivitiesFilled,
                Repair::PhaseNamesFilled,
                Repair::DuplicateCompletionDropped
            ]
        );
    }

    #[test]
    fn missing_phase_entries_are_filled_individually() {
        let text = r#"{
            "user": {"name": "", "language": "af", "theme": "meisie", "onboardingComplete": false},
            "activities": {"arrival": [{"id": "x", "iconName": "Nope", "label": {"af": "X", "en": "X"}, "hasTimer": true}]},
            "phaseNames": {"study": {"af": "Leer", "en": "Learn"}},
            "completedTasks": []
        }"#;
        let decoded = decode_state(text, day("2024-01-01"), 20).expect("decode");
        let state = decoded.state;

        assert_eq!(state.activities(ActivityPhase::Arrival).len(), 1);
        assert_eq!(state.activities.arrival[0].icon_name, "Nope");
        assert_eq!(state.activities.arrival[0].timer_minutes(), Some(20));
        assert_eq!(
            state.activities.organization,
            catalog::default_activities().organization
        );
        assert_eq!(state.phase_names.study, LocalizedText::new("Leer", "Learn"));
        assert_eq!(
            state.phase_names.arrival,
            catalog::default_phase_names().arrival
        );
        assert_eq!(decoded.stored_date, None);
        assert_eq!(state.last_completed_date, day("2024-01-01"));
    }

    #[test]
    fn duplicate_activity_ids_keep_first() {
        let text = r#"{
            "user": {},
            "activities": {
                "arrival": [
                    {"id": "a", "iconName": "Star", "label": {"af": "1", "en": "1"}},
                    {"id": "a", "iconName": "Star", "label": {"af": "2", "en": "2"}}
                ],
                "organization": [],
                "study": []
            }
        }"#;
        let decoded = decode_state(text, day("2024-01-01"), 30).expect("decode");
        assert_eq!(decoded.state.activities.arrival.len(), 1);
        assert_eq!(decoded.state.activities.arrival[0].label.en, "1");
        assert!(decoded.repairs.contains(&Repair::DuplicateActivityDropped));
    }

    #[test]
    fn structurally_broken_records_are_rejected() {
        let today = day("2024-01-01");
        assert!(decode_state("not json", today, 30).is_err());
        assert!(decode_state("{}", today, 30).is_err());
        assert!(decode_state(r#"{"user": {"language": "fr"}}"#, today, 30).is_err());
        assert!(decode_state(r#"{"user": {}, "completedTasks": "unpack"}"#, today, 30).is_err());
    }
}
