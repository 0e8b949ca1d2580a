use super::actions::ActivityDraft;
use super::actions::RoutineAction;
use super::error::ActionError;
use super::state::Activity;
use super::state::ActivityPhase;
use super::state::AppState;
use super::state::LocalizedText;
use super::task_id::parse_sub_task_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineEffect {
    /// State changed and should be written back.
    Persist,
    ActivityCreated {
        phase: ActivityPhase,
        id: String,
    },
    /// Every phase became complete with this action.
    DayComplete,
}

/// Applies one action. Arguments are checked before anything is written, so on `Err`
/// the state is exactly what it was.
pub fn reduce(
    state: &mut AppState,
    action: RoutineAction,
) -> Result<Vec<RoutineEffect>, ActionError> {
    match action {
        RoutineAction::UpdateUser(patch) => {
            if patch.is_empty() {
                return Ok(Vec::new());
            }
            patch.apply(&mut state.user);
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::ToggleTask(id) => {
            state.completed_tasks.toggle(&id);
            state.last_interaction = Some(id);
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::ResetProgress => {
            state.completed_tasks.clear();
            state.last_interaction = None;
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::AddActivity { phase, draft } => add_activity(state, phase, draft),
        RoutineAction::RemoveActivity { phase, id } => {
            let list = state.activities.get_mut(phase);
            let Some(index) = list.iter().position(|activity| activity.id == id) else {
                return Err(ActionError::UnknownActivity { phase, id });
            };
            list.remove(index);
            state.completed_tasks.remove(&id);
            if phase == ActivityPhase::Study {
                state.completed_tasks.retain(|entry| {
                    parse_sub_task_id(entry).map_or(true, |sub| sub.subject != id)
                });
            }
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::UpdateActivity { phase, id, patch } => {
            let list = state.activities.get_mut(phase);
            let Some(activity) = list.iter_mut().find(|activity| activity.id == id) else {
                return Err(ActionError::UnknownActivity { phase, id });
            };
            let mut updated = activity.clone();
            patch.apply(&mut updated);
            validate(&updated.label, updated.has_timer, updated.timer_duration_minutes)?;
            if *activity == updated {
                return Ok(Vec::new());
            }
            *activity = updated;
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::ReorderActivities { phase, from, to } => {
            let list = state.activities.get_mut(phase);
            let len = list.len();
            for index in [from, to] {
                if index >= len {
                    return Err(ActionError::IndexOutOfRange { phase, index, len });
                }
            }
            if from == to {
                return Ok(Vec::new());
            }
            let moved = list.remove(from);
            list.insert(to, moved);
            Ok(vec![RoutineEffect::Persist])
        }
        RoutineAction::UpdatePhaseName { phase, name } => {
            *state.phase_names.get_mut(phase) = name;
            Ok(vec![RoutineEffect::Persist])
        }
    }
}

fn add_activity(
    state: &mut AppState,
    phase: ActivityPhase,
    draft: ActivityDraft,
) -> Result<Vec<RoutineEffect>, ActionError> {
    validate(&draft.label, draft.has_timer, draft.timer_duration_minutes)?;
    let list = state.activities.get_mut(phase);
    let id = new_activity_id(list);
    list.push(draft.into_activity(id.clone()));
    Ok(vec![
        RoutineEffect::Persist,
        RoutineEffect::ActivityCreated { phase, id },
    ])
}

fn validate(
    label: &LocalizedText,
    has_timer: bool,
    timer_duration_minutes: Option<u32>,
) -> Result<(), ActionError> {
    if label.af.trim().is_empty() && label.en.trim().is_empty() {
        return Err(ActionError::EmptyLabel);
    }
    if timer_duration_minutes == Some(0)
        || (has_timer && timer_duration_minutes.is_none())
    {
        return Err(ActionError::InvalidTimer);
    }
    Ok(())
}

fn new_activity_id(existing: &[Activity]) -> String {
    loop {
        let id = format!("activity-{}", uuid::Uuid::now_v7().simple());
        if existing.iter().all(|activity| activity.id != id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests;
