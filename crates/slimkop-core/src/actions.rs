use super::state::Activity;
use super::state::ActivityPhase;
use super::state::Language;
use super::state::LocalizedText;
use super::state::Theme;
use super::state::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineAction {
    UpdateUser(UserPatch),
    ToggleTask(String),
    ResetProgress,
    AddActivity {
        phase: ActivityPhase,
        draft: ActivityDraft,
    },
    RemoveActivity {
        phase: ActivityPhase,
        id: String,
    },
    UpdateActivity {
        phase: ActivityPhase,
        id: String,
        patch: ActivityPatch,
    },
    ReorderActivities {
        phase: ActivityPhase,
        from: usize,
        to: usize,
    },
    UpdatePhaseName {
        phase: ActivityPhase,
        name: LocalizedText,
    },
}

impl RoutineAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpdateUser(_) => "update_user",
            Self::ToggleTask(_) => "toggle_task",
            Self::ResetProgress => "reset_progress",
            Self::AddActivity { .. } => "add_activity",
            Self::RemoveActivity { .. } => "remove_activity",
            Self::UpdateActivity { .. } => "update_activity",
            Self::ReorderActivities { .. } => "reorder_activities",
            Self::UpdatePhaseName { .. } => "update_phase_name",
        }
    }
}

/// Shallow patch over [`User`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub onboarding_complete: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.language.is_none()
            && self.theme.is_none()
            && self.onboarding_complete.is_none()
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(language) = self.language {
            user.language = language;
        }
        if let Some(theme) = self.theme {
            user.theme = theme;
        }
        if let Some(done) = self.onboarding_complete {
            user.onboarding_complete = done;
        }
    }
}

/// An activity before it has been given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub icon_name: String,
    pub label: LocalizedText,
    pub has_timer: bool,
    pub timer_duration_minutes: Option<u32>,
}

impl ActivityDraft {
    pub fn new(icon_name: impl Into<String>, label: LocalizedText) -> Self {
        Self {
            icon_name: icon_name.into(),
            label,
            has_timer: false,
            timer_duration_minutes: None,
        }
    }

    pub fn with_timer(mut self, minutes: u32) -> Self {
        self.has_timer = true;
        self.timer_duration_minutes = Some(minutes);
        self
    }

    pub fn into_activity(self, id: String) -> Activity {
        Activity {
            id,
            icon_name: self.icon_name,
            label: self.label,
            has_timer: self.has_timer,
            timer_duration_minutes: self.timer_duration_minutes,
        }
    }
}

/// Shallow patch over an [`Activity`]. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub icon_name: Option<String>,
    pub label: Option<LocalizedText>,
    pub has_timer: Option<bool>,
    /// `Some(None)` clears the stored duration.
    pub timer_duration_minutes: Option<Option<u32>>,
}

impl ActivityPatch {
    pub fn apply(self, activity: &mut Activity) {
        if let Some(icon_name) = self.icon_name {
            activity.icon_name = icon_name;
        }
        if let Some(label) = self.label {
            activity.label = label;
        }
        if let Some(has_timer) = self.has_timer {
            activity.has_timer = has_timer;
        }
        if let Some(minutes) = self.timer_duration_minutes {
            activity.timer_duration_minutes = minutes;
        }
    }
}
