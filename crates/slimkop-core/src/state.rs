use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Af,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Af, Language::En];

    pub fn label(self) -> &'static str {
        match self {
            Self::Af => "af",
            Self::En => "en",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "af" => Some(Self::Af),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Af => Self::En,
            Self::En => Self::Af,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Meisie,
    Seun,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Meisie => "meisie",
            Self::Seun => "seun",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meisie" => Some(Self::Meisie),
            "seun" => Some(Self::Seun),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Meisie => Self::Seun,
            Self::Seun => Self::Meisie,
        }
    }

    pub fn accent(self) -> &'static str {
        match self {
            Self::Meisie => "pink",
            Self::Seun => "blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub language: Language,
    pub theme: Theme,
    pub onboarding_complete: bool,
}

/// A display string in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub af: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(af: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            af: af.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Af => self.af.as_str(),
            Language::En => self.en.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPhase {
    Arrival,
    Organization,
    Study,
}

impl ActivityPhase {
    /// Phases in gating order: each one is locked until every earlier one is complete.
    pub const ALL: [ActivityPhase; 3] = [
        ActivityPhase::Arrival,
        ActivityPhase::Organization,
        ActivityPhase::Study,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Organization => "organization",
            Self::Study => "study",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "arrival" => Some(Self::Arrival),
            "organization" | "organisation" => Some(Self::Organization),
            "study" => Some(Self::Study),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Arrival => 0,
            Self::Organization => 1,
            Self::Study => 2,
        }
    }

    /// Phases that must be complete before this one unlocks.
    pub fn predecessors(self) -> &'static [ActivityPhase] {
        &Self::ALL[..self.index()]
    }
}

/// One value per phase. The fixed fields make a missing phase unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseMap<T> {
    pub arrival: T,
    pub organization: T,
    pub study: T,
}

impl<T> PhaseMap<T> {
    pub fn get(&self, phase: ActivityPhase) -> &T {
        match phase {
            ActivityPhase::Arrival => &self.arrival,
            ActivityPhase::Organization => &self.organization,
            ActivityPhase::Study => &self.study,
        }
    }

    pub fn get_mut(&mut self, phase: ActivityPhase) -> &mut T {
        match phase {
            ActivityPhase::Arrival => &mut self.arrival,
            ActivityPhase::Organization => &mut self.organization,
            ActivityPhase::Study => &mut self.study,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityPhase, &T)> {
        ActivityPhase::ALL
            .into_iter()
            .map(move |phase| (phase, self.get(phase)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Symbolic icon reference. Unknown names are kept as-is and resolved at render time.
    pub icon_name: String,
    pub label: LocalizedText,
    #[serde(default)]
    pub has_timer: bool,
    #[serde(
        default,
        rename = "timerDuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timer_duration_minutes: Option<u32>,
}

impl Activity {
    /// Countdown length in minutes, only when the timer is switched on.
    pub fn timer_minutes(&self) -> Option<u32> {
        if self.has_timer {
            self.timer_duration_minutes
        } else {
            None
        }
    }
}

/// Ordered set of completed task identifiers. An id is present at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CompletedTasks(Vec<String>);

impl CompletedTasks {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    /// Flips membership and reports whether `id` is now completed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keeps only the ids for which `keep` holds. Order is preserved.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|id| keep(id));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for CompletedTasks {
    fn from(ids: Vec<String>) -> Self {
        let mut tasks = Self::new();
        for id in ids {
            if !tasks.contains(&id) {
                tasks.0.push(id);
            }
        }
        tasks
    }
}

impl From<CompletedTasks> for Vec<String> {
    fn from(tasks: CompletedTasks) -> Self {
        tasks.0
    }
}

impl<'a> FromIterator<&'a str> for CompletedTasks {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(str::to_string).collect::<Vec<_>>())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub user: User,
    pub activities: PhaseMap<Vec<Activity>>,
    pub phase_names: PhaseMap<LocalizedText>,
    pub completed_tasks: CompletedTasks,
    /// The calendar day the completion set is valid for.
    pub last_completed_date: NaiveDate,
    pub last_interaction: Option<String>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            user: catalog::initial_user(),
            activities: catalog::default_activities(),
            phase_names: catalog::default_phase_names(),
            completed_tasks: CompletedTasks::new(),
            last_completed_date: today,
            last_interaction: None,
        }
    }

    pub fn activities(&self, phase: ActivityPhase) -> &[Activity] {
        self.activities.get(phase)
    }

    pub fn find_activity(&self, phase: ActivityPhase, id: &str) -> Option<&Activity> {
        self.activities
            .get(phase)
            .iter()
            .find(|activity| activity.id == id)
    }

    pub fn phase_name(&self, phase: ActivityPhase) -> &str {
        self.phase_names.get(phase).get(self.user.language)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed_tasks.contains(id)
    }
}
