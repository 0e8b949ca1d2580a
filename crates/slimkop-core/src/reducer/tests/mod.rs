use chrono::NaiveDate;
use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use super::RoutineEffect;
pub(super) use crate::actions::ActivityDraft;
pub(super) use crate::actions::ActivityPatch;
pub(super) use crate::actions::RoutineAction;
pub(super) use crate::actions::UserPatch;
pub(super) use crate::derive::phase_locked;
pub(super) use crate::error::ActionError;
pub(super) use crate::state::Activity;
pub(super) use crate::state::ActivityPhase;
pub(super) use crate::state::AppState;
pub(super) use crate::state::Language;
pub(super) use crate::state::LocalizedText;
pub(super) use crate::state::PhaseMap;
pub(super) use crate::state::Theme;


fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date")
}

fn state() -> AppState {
    AppState::new(today())
}

fn activity(id: &str) -> Activity {
    Activity {
        id: id.to_string(),
        icon_name: "Star".to_string(),
        label: LocalizedText::new(id, id),
        has_timer: false,
        timer_duration_minutes: None,
    }
}

fn state_with(arrival: &[&str], organization: &[&str], study: &[&str]) -> AppState {
    let mut state = state();
    state.activities = PhaseMap {
        arrival: arrival.iter().map(|id| activity(id)).collect(),
        organization: organization.iter().map(|id| activity(id)).collect(),
        study: study.iter().map(|id| activity(id)).collect(),
    };
    state
}

fn draft(en: &str) -> ActivityDraft {
    ActivityDraft::new("Smile", LocalizedText::new(en, en))
}

fn ids(state: &AppState, phase: ActivityPhase) -> Vec<&str> {
    state
        .activities(phase)
        .iter()
        .map(|activity| activity.id.as_str())
        .collect()
}

fn completed(state: &AppState) -> Vec<&str> {
    state.completed_tasks.iter().collect()
}

fn run(state: &mut AppState, action: RoutineAction) -> Vec<RoutineEffect> {
    reduce(state, action).expect("action should apply")
}

fn toggle(state: &mut AppState, id: &str) {
    let effects = run(state, RoutineAction::ToggleTask(id.to_string()));
    assert_eq!(effects, vec![RoutineEffect::Persist]);
}

fn assert_rejected(state: &mut AppState, action: RoutineAction, expected: ActionError) {
    let before = state.clone();
    let err = reduce(state, action).expect_err("action should be rejected");
    assert_eq!(err, expected);
    assert_eq!(*state, before);
}
