//! View state computed from [`AppState`] on every read. Nothing here is stored.

use super::state::ActivityPhase;
use super::state::AppState;
use super::task_id::parse_sub_task_id;
use super::task_id::sub_task_id;
use super::task_id::SubTaskKind;

/// How an empty phase is treated when it gates the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseGate {
    pub empty_phase_counts_complete: bool,
}

impl Default for PhaseGate {
    fn default() -> Self {
        Self {
            empty_phase_counts_complete: true,
        }
    }
}

impl PhaseGate {
    pub fn phase_complete(self, state: &AppState, phase: ActivityPhase) -> bool {
        let activities = state.activities(phase);
        if activities.is_empty() {
            return self.empty_phase_counts_complete;
        }
        activities
            .iter()
            .all(|activity| state.is_completed(&activity.id))
    }

    pub fn phase_locked(self, state: &AppState, phase: ActivityPhase) -> bool {
        phase
            .predecessors()
            .iter()
            .any(|earlier| !self.phase_complete(state, *earlier))
    }

    pub fn all_complete(self, state: &AppState) -> bool {
        ActivityPhase::ALL
            .into_iter()
            .all(|phase| self.phase_complete(state, phase))
    }

    /// The first phase that still has work and is not locked.
    pub fn current_phase(self, state: &AppState) -> Option<ActivityPhase> {
        ActivityPhase::ALL
            .into_iter()
            .find(|phase| !self.phase_complete(state, *phase))
    }
}

pub fn phase_complete(state: &AppState, phase: ActivityPhase) -> bool {
    PhaseGate::default().phase_complete(state, phase)
}

pub fn phase_locked(state: &AppState, phase: ActivityPhase) -> bool {
    PhaseGate::default().phase_locked(state, phase)
}

pub fn all_complete(state: &AppState) -> bool {
    PhaseGate::default().all_complete(state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseProgress {
    pub done: usize,
    pub total: usize,
}

pub fn phase_progress(state: &AppState, phase: ActivityPhase) -> PhaseProgress {
    let activities = state.activities(phase);
    PhaseProgress {
        done: activities
            .iter()
            .filter(|activity| state.is_completed(&activity.id))
            .count(),
        total: activities.len(),
    }
}

/// True when every listed sub-task of `subject` is in the completion set.
pub fn subject_complete(state: &AppState, subject: &str, kinds: &[SubTaskKind]) -> bool {
    !kinds.is_empty()
        && kinds
            .iter()
            .all(|kind| state.is_completed(&sub_task_id(subject, *kind)))
}

/// One star per completed task.
pub fn star_count(state: &AppState) -> usize {
    state.completed_tasks.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Default,
    Unpack,
    Clothes,
    Lunch,
    Trash,
    Rest,
    Organized,
    Study,
    Awesome,
}

impl Reward {
    pub fn title_key(self) -> &'static str {
        match self {
            Self::Default => "reward_default_title",
            Self::Unpack => "reward_unpack_title",
            Self::Clothes => "reward_clothes_title",
            Self::Lunch => "reward_lunch_title",
            Self::Trash => "reward_trash_title",
            Self::Rest => "reward_rest_title",
            Self::Organized => "reward_org_title",
            Self::Study => "reward_study_title",
            Self::Awesome => "reward_awesome_title",
        }
    }

    pub fn description_key(self) -> Option<&'static str> {
        match self {
            Self::Default => Some("reward_default_desc"),
            Self::Unpack => Some("reward_unpack_desc"),
            Self::Clothes => Some("reward_clothes_desc"),
            Self::Lunch => Some("reward_lunch_desc"),
            Self::Trash => Some("reward_trash_desc"),
            Self::Rest => Some("reward_rest_desc"),
            Self::Organized => Some("reward_org_desc"),
            Self::Study => Some("reward_study_desc"),
            Self::Awesome => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Default => "🙂⭐",
            Self::Unpack => "🎒✨",
            Self::Clothes => "👕🦸",
            Self::Lunch => "🥪😋",
            Self::Trash => "🗑️♻️",
            Self::Rest => "🛌💤",
            Self::Organized => "📚✅",
            Self::Study => "🧠💡",
            Self::Awesome => "✨",
        }
    }

    /// Whether the card shows the "+1 star" badge.
    pub fn grants_star(self) -> bool {
        !matches!(self, Self::Default | Self::Awesome)
    }
}

/// Picks the feedback card for the most recently touched task.
pub fn reward_for(last_interaction: Option<&str>) -> Reward {
    let Some(id) = last_interaction else {
        return Reward::Default;
    };
    match id {
        "unpack" => Reward::Unpack,
        "clothes" => Reward::Clothes,
        "lunch" => Reward::Lunch,
        "trash" => Reward::Trash,
        "rest" => Reward::Rest,
        "homework_sorted" => Reward::Organized,
        _ if id.starts_with("study_") || parse_sub_task_id(id).is_some() => Reward::Study,
        _ => Reward::Awesome,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::state::Activity;
    use crate::state::LocalizedText;
    use crate::state::PhaseMap;

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
        let mut state = AppState::new(NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
        state.activities = PhaseMap {
            arrival: arrival.iter().map(|id| activity(id)).collect(),
            organization: organization.iter().map(|id| activity(id)).collect(),
            study: study.iter().map(|id| activity(id)).collect(),
        };
        state
    }

    #[test]
    fn untimed_duration_does_not_affect_completion() {
        let mut plain = state_with(&["a", "b"], &["c"], &[]);
        let mut with_duration = plain.clone();
        with_duration.activities.arrival[0].timer_duration_minutes = Some(45);

        for id in ["", "a", "b"] {
            if !id.is_empty() {
                plain.completed_tasks.toggle(id);
                with_duration.completed_tasks.toggle(id);
            }
            assert_eq!(
                phase_complete(&with_duration, ActivityPhase::Arrival),
                phase_complete(&plain, ActivityPhase::Arrival)
            );
            assert_eq!(
                phase_locked(&with_duration, ActivityPhase::Organization),
                phase_locked(&plain, ActivityPhase::Organization)
            );
        }
        assert!(phase_complete(&with_duration, ActivityPhase::Arrival));
    }

    #[test]
    fn arrival_is_never_locked() {
        let state = state_with(&["a"], &["b"], &["c"]);
        assert!(!phase_locked(&state, ActivityPhase::Arrival));
        assert!(phase_locked(&state, ActivityPhase::Organization));
        assert!(phase_locked(&state, ActivityPhase::Study));
    }

    #[test]
    fn study_needs_both_earlier_phases() {
        let mut state = state_with(&["a"], &["b"], &["c"]);
        state.completed_tasks.toggle("b");
        assert!(phase_locked(&state, ActivityPhase::Study));

        state.completed_tasks.toggle("a");
        assert!(!phase_locked(&state, ActivityPhase::Study));
        assert!(!all_complete(&state));

        state.completed_tasks.toggle("c");
        assert!(all_complete(&state));
    }

    #[test]
    fn empty_phase_gate_follows_configuration() {
        let state = state_with(&[], &["b"], &[]);
        assert!(phase_complete(&state, ActivityPhase::Arrival));
        assert!(!phase_locked(&state, ActivityPhase::Organization));

        let strict = PhaseGate {
            empty_phase_counts_complete: false,
        };
        assert!(!strict.phase_complete(&state, ActivityPhase::Arrival));
        assert!(strict.phase_locked(&state, ActivityPhase::Organization));
    }

    #[test]
    fn composite_ids_do_not_complete_a_subject_activity() {
        let mut state = state_with(&[], &[], &["math"]);
        for kind in SubTaskKind::CORE {
            state.completed_tasks.toggle(&sub_task_id("math", kind));
        }
        assert!(subject_complete(&state, "math", &SubTaskKind::CORE));
        assert!(!subject_complete(&state, "math", &SubTaskKind::ALL));
        assert!(!phase_complete(&state, ActivityPhase::Study));
    }

    #[test]
    fn current_phase_walks_forward() {
        let mut state = state_with(&["a"], &["b"], &["c"]);
        let gate = PhaseGate::default();
        assert_eq!(gate.current_phase(&state), Some(ActivityPhase::Arrival));
        state.completed_tasks.toggle("a");
        assert_eq!(gate.current_phase(&state), Some(ActivityPhase::Organization));
        state.completed_tasks.toggle("b");
        state.completed_tasks.toggle("c");
        assert_eq!(gate.current_phase(&state), None);
    }

    #[test]
    fn progress_counts_only_phase_members() {
        let mut state = state_with(&["a", "b"], &[], &[]);
        state.completed_tasks.toggle("a");
        state.completed_tasks.toggle("stray");
        assert_eq!(
            phase_progress(&state, ActivityPhase::Arrival),
            PhaseProgress { done: 1, total: 2 }
        );
        assert_eq!(star_count(&state), 2);
    }

    #[test]
    fn reward_selection() {
        assert_eq!(reward_for(None), Reward::Default);
        assert_eq!(reward_for(Some("unpack")), Reward::Unpack);
        assert_eq!(reward_for(Some("homework_sorted")), Reward::Organized);
        assert_eq!(reward_for(Some("study_math")), Reward::Study);
        assert_eq!(reward_for(Some("science_read")), Reward::Study);
        assert_eq!(reward_for(Some("custom-1")), Reward::Awesome);
        assert!(!Reward::Awesome.grants_star());
        assert_eq!(Reward::Awesome.description_key(), None);
    }
}
