use super::state::Language;

#[derive(Debug, Clone, Copy)]
enum Entry {
    Text(&'static str),
    Group(&'static [(&'static str, &'static str)]),
}

use Entry::Group;
use Entry::Text;

const EN: &[(&str, Entry)] = &[
    // onboarding
    ("welcome", Text("Welcome!")),
    ("whatIsYourName", Text("What is your name?")),
    ("chooseTheme", Text("Choose a Theme")),
    ("chooseLanguage", Text("Choose Language")),
    ("girl", Text("Girl")),
    ("boy", Text("Boy")),
    ("start", Text("Start My Day")),
    // dashboard
    ("goodMorning", Text("Good Morning")),
    ("goodAfternoon", Text("Good Afternoon")),
    ("phase1", Text("The Arrival")),
    ("phase2", Text("Organize")),
    ("phase3", Text("Study Time")),
    ("phaseLocked", Text("Finish previous step first!")),
    ("tasks", Text("Tasks")),
    ("startTimer", Text("Start Timer")),
    ("pause", Text("Pause")),
    // tasks
    ("unpack", Text("Unpack your bag")),
    ("clothes", Text("Change your clothes")),
    ("lunch", Text("Eat lunch")),
    ("rest", Text("Rest for 30 minutes")),
    ("trash", Text("Trash Patrol")),
    ("homework", Text("Sort Homework")),
    ("tomorrow", Text("Homework for Tomorrow?")),
    ("dayafter", Text("Homework for Day After?")),
    ("study", Text("Study Session")),
    (
        "subjects",
        Group(&[("science", "Natural Sciences"), ("social", "Social Sciences")]),
    ),
    // study flow
    ("read", Text("Read Textbook")),
    ("notes", Text("Make a Mind Map")),
    ("mindmap", Text("Make a Mind Map")),
    ("practice", Text("Make a Summary")),
    ("summary", Text("Make a Summary")),
    ("file", Text("File it")),
    // rewards
    ("reward_default_title", Text("Start Your Day!")),
    ("reward_default_desc", Text("Complete tasks to collect stars.")),
    ("reward_unpack_title", Text("Bag Empty!")),
    ("reward_unpack_desc", Text("Great job! No heavy lifting anymore.")),
    ("reward_clothes_title", Text("Super Suit On!")),
    ("reward_clothes_desc", Text("You look ready for anything.")),
    ("reward_lunch_title", Text("Yummy!")),
    ("reward_lunch_desc", Text("Fuel for the brain!")),
    ("reward_trash_title", Text("Clean Space!")),
    ("reward_trash_desc", Text("Happy planet, happy room.")),
    ("reward_rest_title", Text("Power Nap!")),
    ("reward_rest_desc", Text("Recharging batteries...")),
    ("reward_org_title", Text("Organized!")),
    ("reward_org_desc", Text("Now we know exactly what to do.")),
    ("reward_study_title", Text("Brain Power!")),
    ("reward_study_desc", Text("Your brain just got bigger!")),
    ("reward_awesome_title", Text("Awesome!")),
    ("totalStars", Text("Total Stars")),
    ("plusOneStar", Text("+1 Star!")),
    ("startNewDay", Text("Start a New Day")),
    ("allDone", Text("All Done for Today!")),
    ("yes", Text("Yes")),
    ("no", Text("No")),
];

const AF: &[(&str, Entry)] = &[
    ("welcome", Text("Welkom!")),
    ("whatIsYourName", Text("Wat is jou naam?")),
    ("chooseTheme", Text("Kies 'n Tema")),
    ("chooseLanguage", Text("Kies Taal")),
    ("girl", Text("Meisie")),
    ("boy", Text("Seun")),
    ("start", Text("Begin My Dag")),
    ("goodMorning", Text("Goeie Môre")),
    ("goodAfternoon", Text("Goeie Middag")),
    ("phase1", Text("Die Aankoms")),
    ("phase2", Text("Organiseer")),
    ("phase3", Text("Die Studie")),
    ("phaseLocked", Text("Maak eers klaar!")),
    ("tasks", Text("Take")),
    ("startTimer", Text("Begin Tydhouer")),
    ("pause", Text("Wag")),
    ("unpack", Text("Pak tasse uit")),
    ("clothes", Text("Trek ander klere aan")),
    ("lunch", Text("Eet lunch")),
    ("rest", Text("Rus vir ‘n half uur")),
    ("trash", Text("Gooi rommel weg")),
    ("homework", Text("Pak huiswerk in hopies")),
    ("tomorrow", Text("Huiswerk vir Môre?")),
    ("dayafter", Text("Huiswerk vir Oormôre?")),
    ("study", Text("Die Studie")),
    (
        "subjects",
        Group(&[("science", "Natuurwetenskappe"), ("social", "Sosiale Wetenskappe")]),
    ),
    ("read", Text("Lees handboek")),
    ("notes", Text("Maak 'n Mind Map")),
    ("mindmap", Text("Maak 'n Mind Map")),
    ("practice", Text("Maak 'n opsomming")),
    ("summary", Text("Maak 'n opsomming")),
    ("file", Text("Sit dit in die opsommingsler")),
    ("reward_default_title", Text("Begin Jou Dag!")),
    ("reward_default_desc", Text("Voltooi take om sterre te versamel.")),
    ("reward_unpack_title", Text("Tas Leeg!")),
    ("reward_unpack_desc", Text("Mooi so! Geen swaar dinge meer nie.")),
    ("reward_clothes_title", Text("Super-Pak Aan!")),
    ("reward_clothes_desc", Text("Jy lyk gereed vir enigiets.")),
    ("reward_lunch_title", Text("Daaaam!")),
    ("reward_lunch_desc", Text("Brandstof vir die brein!")),
    ("reward_trash_title", Text("Skoon Spasie!")),
    ("reward_trash_desc", Text("Gelukkige planeet, gelukkige kamer.")),
    ("reward_rest_title", Text("Krag-Slapie!")),
    ("reward_rest_desc", Text("Herlaai batterye...")),
    ("reward_org_title", Text("Georganiseerd!")),
    ("reward_org_desc", Text("Nou weet ons presies wat om te doen.")),
    ("reward_study_title", Text("Breinkrag!")),
    ("reward_study_desc", Text("Jou brein het sopas groter geword!")),
    ("reward_awesome_title", Text("Ongelooflik!")),
    ("totalStars", Text("Totale Sterre")),
    ("plusOneStar", Text("+1 Ster!")),
    ("startNewDay", Text("Begin 'n Nuwe Dag")),
    ("allDone", Text("Klaar vir Vandag!")),
    ("yes", Text("Ja")),
    ("no", Text("Nee")),
];

fn table(language: Language) -> &'static [(&'static str, Entry)] {
    match language {
        Language::Af => AF,
        Language::En => EN,
    }
}

fn entry(language: Language, key: &str) -> Option<Entry> {
    table(language)
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, entry)| *entry)
}

/// Looks up `key` for `language`. `category.name` reaches into a nested group.
/// Anything missing resolves to the key itself.
pub fn resolve(key: &str, language: Language) -> &str {
    let found = match key.split_once('.') {
        Some((category, rest)) => {
            let name = rest.split('.').next().unwrap_or(rest);
            match entry(language, category) {
                Some(Group(items)) => items
                    .iter()
                    .find(|(item, _)| *item == name)
                    .map(|(_, text)| *text),
                _ => None,
            }
        }
        None => match entry(language, key) {
            Some(Text(text)) => Some(text),
            _ => None,
        },
    };
    match found {
        Some(text) if !text.is_empty() => text,
        _ => key,
    }
}

/// The translation table bound to one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(self) -> Language {
        self.language
    }

    pub fn t(self, key: &str) -> &str {
        resolve(key, self.language)
    }
}
