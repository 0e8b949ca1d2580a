use super::state::Activity;
use super::state::LocalizedText;
use super::state::PhaseMap;
use super::state::User;

pub const DEFAULT_TIMER_MINUTES: u32 = 30;

pub fn initial_user() -> User {
    User::default()
}

pub fn default_phase_names() -> PhaseMap<LocalizedText> {
    PhaseMap {
        arrival: LocalizedText::new("Aankoms Roetine", "Arrival Routine"),
        organization: LocalizedText::new("Organisasie", "Organization"),
        study: LocalizedText::new("Studie Sessie", "Study Session"),
    }
}

pub fn default_activities() -> PhaseMap<Vec<Activity>> {
    PhaseMap {
        arrival: vec![
            activity("unpack", "Backpack", "Pak Tas Uit", "Unpack Bag"),
            activity("clothes", "Shirt", "Skoolklere", "School Clothes"),
            activity("lunch", "Utensils", "Kosblik", "Lunch Box"),
            timed_activity(
                "rest",
                "Clock",
                "Rus vir 30 min",
                "Rest for 30 mins",
                DEFAULT_TIMER_MINUTES,
            ),
            activity("trash", "Trash2", "Maak asblik leeg", "Empty Trash"),
        ],
        organization: vec![activity(
            "homework_sorted",
            "Layers",
            "Sorteer Huiswerk",
            "Sort Homework",
        )],
        study: vec![
            activity("math", "BookOpen", "Wiskunde", "Math"),
            activity("science", "Microscope", "Wetenskap", "Science"),
            activity("social", "Map", "Sosiale Wetenskappe", "Social Sciences"),
            activity("language", "Layers", "Tale", "Languages"),
        ],
    }
}

fn activity(id: &str, icon_name: &str, af: &str, en: &str) -> Activity {
    Activity {
        id: id.to_string(),
        icon_name: icon_name.to_string(),
        label: LocalizedText::new(af, en),
        has_timer: false,
        timer_duration_minutes: None,
    }
}

fn timed_activity(id: &str, icon_name: &str, af: &str, en: &str, minutes: u32) -> Activity {
    Activity {
        has_timer: true,
        timer_duration_minutes: Some(minutes),
        ..activity(id, icon_name, af, en)
    }
}
