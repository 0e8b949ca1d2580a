/// Icons an activity can show. Stored names are resolved here, at render time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    BookOpen,
    Layers,
    Map,
    Microscope,
    Smile,
    Star,
    Rocket,
    Music,
    Trash2,
    Utensils,
    Shirt,
    Backpack,
    Clock,
    Gamepad2,
    Coffee,
    Moon,
    /// Shown for any name not in the set.
    Help,
}

impl Icon {
    /// Icons offered by the activity editor, in picker order.
    pub const SELECTABLE: [Icon; 16] = [
        Icon::BookOpen,
        Icon::Layers,
        Icon::Map,
        Icon::Microscope,
        Icon::Smile,
        Icon::Star,
        Icon::Rocket,
        Icon::Music,
        Icon::Trash2,
        Icon::Utensils,
        Icon::Shirt,
        Icon::Backpack,
        Icon::Clock,
        Icon::Gamepad2,
        Icon::Coffee,
        Icon::Moon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BookOpen => "BookOpen",
            Self::Layers => "Layers",
            Self::Map => "Map",
            Self::Microscope => "Microscope",
            Self::Smile => "Smile",
            Self::Star => "Star",
            Self::Rocket => "Rocket",
            Self::Music => "Music",
            Self::Trash2 => "Trash2",
            Self::Utensils => "Utensils",
            Self::Shirt => "Shirt",
            Self::Backpack => "Backpack",
            Self::Clock => "Clock",
            Self::Gamepad2 => "Gamepad2",
            Self::Coffee => "Coffee",
            Self::Moon => "Moon",
            Self::Help => "HelpCircle",
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::SELECTABLE
            .into_iter()
            .find(|icon| icon.name() == name)
            .unwrap_or(Self::Help)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::BookOpen => "📖",
            Self::Layers => "🗂️",
            Self::Map => "🗺️",
            Self::Microscope => "🔬",
            Self::Smile => "😊",
            Self::Star => "⭐",
            Self::Rocket => "🚀",
            Self::Music => "🎵",
            Self::Trash2 => "🗑️",
            Self::Utensils => "🍴",
            Self::Shirt => "👕",
            Self::Backpack => "🎒",
            Self::Clock => "⏰",
            Self::Gamepad2 => "🎮",
            Self::Coffee => "☕",
            Self::Moon => "🌙",
            Self::Help => "❔",
        }
    }
}
