use std::sync::OnceLock;

use regex::Regex;

/// Fixed steps nested under a study subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubTaskKind {
    Read,
    Notes,
    Practice,
    File,
}

impl SubTaskKind {
    pub const ALL: [SubTaskKind; 4] = [Self::Read, Self::Notes, Self::Practice, Self::File];

    /// Steps a subject needs before it counts as studied.
    pub const CORE: [SubTaskKind; 3] = [Self::Read, Self::Notes, Self::Practice];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Notes => "notes",
            Self::Practice => "practice",
            Self::File => "file",
        }
    }

    /// Accepts the older `mindmap` and `summary` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(Self::Read),
            "notes" | "mindmap" => Some(Self::Notes),
            "practice" | "summary" => Some(Self::Practice),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub fn translation_key(self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTaskId<'a> {
    pub subject: &'a str,
    pub kind: SubTaskKind,
}

pub fn sub_task_id(subject: &str, kind: SubTaskKind) -> String {
    format!("{subject}_{}", kind.as_str())
}

fn composite_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<subject>.+)_(?P<kind>read|notes|mindmap|practice|summary|file)$")
            .expect("composite task id pattern is valid")
    })
}

/// Splits `{subject}_{kind}`. Plain activity ids such as `homework_sorted` return `None`.
pub fn parse_sub_task_id(id: &str) -> Option<SubTaskId<'_>> {
    let captures = composite_pattern().captures(id)?;
    let subject = captures.name("subject")?.as_str();
    let kind = SubTaskKind::parse(captures.name("kind")?.as_str())?;
    Some(SubTaskId { subject, kind })
}
