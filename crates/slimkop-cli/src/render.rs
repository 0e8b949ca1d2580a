use std::fmt;
use std::fmt::Write;

use slimkop_core::derive::phase_progress;
use slimkop_core::derive::reward_for;
use slimkop_core::derive::star_count;
use slimkop_core::derive::subject_complete;
use slimkop_core::derive::PhaseGate;
use slimkop_core::i18n::Translator;
use slimkop_core::icon::Icon;
use slimkop_core::task_id::sub_task_id;
use slimkop_core::task_id::SubTaskKind;
use slimkop_core::Activity;
use slimkop_core::ActivityPhase;
use slimkop_core::AppState;
use slimkop_core::Theme;

pub fn mascot(theme: Theme) -> &'static str {
    match theme {
        Theme::Meisie => "🐼",
        Theme::Seun => "🚀",
    }
}

fn check(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

/// The dashboard for one state, written through `Display`.
pub struct StatusView<'a> {
    pub state: &'a AppState,
    pub gate: PhaseGate,
    pub theme: Theme,
}

pub fn render_status(state: &AppState, gate: PhaseGate, theme: Theme) -> String {
    StatusView { state, gate, theme }.to_string()
}

impl fmt::Display for StatusView<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        let t = Translator::new(state.user.language);

        let name = if state.user.name.is_empty() {
            "?"
        } else {
            state.user.name.as_str()
        };
        writeln!(out, "{} {}, {name}", mascot(self.theme), t.t("goodAfternoon"))?;
        if !state.user.onboarding_complete {
            writeln!(out, "{}", t.t("welcome"))?;
        }

        for (index, phase) in ActivityPhase::ALL.into_iter().enumerate() {
            let progress = phase_progress(state, phase);
            writeln!(
                out,
                "\n{}. {} ({}/{})",
                index + 1,
                state.phase_name(phase),
                progress.done,
                progress.total
            )?;
            if self.gate.phase_locked(state, phase) {
                writeln!(out, "   🔒 {}", t.t("phaseLocked"))?;
            }
            for activity in state.activities(phase) {
                write_activity(out, state, phase, activity, t)?;
            }
        }

        let reward = reward_for(state.last_interaction.as_deref());
        writeln!(out)?;
        write!(out, "{} {}", reward.emoji(), t.t(reward.title_key()))?;
        if let Some(key) = reward.description_key() {
            write!(out, " {}", t.t(key))?;
        }
        if reward.grants_star() {
            write!(out, " {}", t.t("plusOneStar"))?;
        }
        writeln!(out)?;
        writeln!(out, "⭐ {}: {}", t.t("totalStars"), star_count(state))?;
        if self.gate.all_complete(state) {
            writeln!(out, "🏆 {}", t.t("allDone"))?;
        }
        Ok(())
    }
}

fn write_activity(
    out: &mut impl fmt::Write,
    state: &AppState,
    phase: ActivityPhase,
    activity: &Activity,
    t: Translator,
) -> fmt::Result {
    let icon = Icon::from_name(&activity.icon_name);
    write!(
        out,
        "   {} {} {} ({})",
        check(state.is_completed(&activity.id)),
        icon.glyph(),
        activity.label.get(t.language()),
        activity.id
    )?;
    if let Some(minutes) = activity.timer_minutes() {
        write!(out, " ⏱ {minutes}m")?;
    }
    writeln!(out)?;

    if phase == ActivityPhase::Study {
        for kind in SubTaskKind::ALL {
            let id = sub_task_id(&activity.id, kind);
            writeln!(
                out,
                "       {} {} ({id})",
                check(state.is_completed(&id)),
                t.t(kind.translation_key())
            )?;
        }
        if subject_complete(state, &activity.id, &SubTaskKind::CORE)
            && !state.is_completed(&activity.id)
        {
            writeln!(out, "       -> toggle {} to finish the subject", activity.id)?;
        }
    }
    Ok(())
}
