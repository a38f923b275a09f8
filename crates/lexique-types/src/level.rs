use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse difficulty stored on every word
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    /// Parse a level name, case-insensitive. CEFR codes are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "beginner" => Some(DifficultyLevel::Beginner),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            _ => CefrLevel::parse(s).map(CefrLevel::difficulty),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common European Framework level as reported by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1, // Beginner
    A2, // Elementary
    B1, // Intermediate
    B2, // Upper intermediate
    C1, // Advanced
    C2, // Proficient
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Parse level from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }

    /// Get level string
    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Get level description
    pub fn description(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1 - Beginner",
            CefrLevel::A2 => "A2 - Elementary",
            CefrLevel::B1 => "B1 - Intermediate",
            CefrLevel::B2 => "B2 - Upper Intermediate",
            CefrLevel::C1 => "C1 - Advanced",
            CefrLevel::C2 => "C2 - Proficient",
        }
    }

    pub fn difficulty(self) -> DifficultyLevel {
        match self {
            CefrLevel::A1 | CefrLevel::A2 => DifficultyLevel::Beginner,
            CefrLevel::B1 | CefrLevel::B2 => DifficultyLevel::Intermediate,
            CefrLevel::C1 | CefrLevel::C2 => DifficultyLevel::Advanced,
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How well the learner knows a saved word
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Familiarity {
    #[default]
    New,
    Learning,
    Familiar,
    Mastered,
}

impl Familiarity {
    pub const ALL: [Familiarity; 4] = [
        Familiarity::New,
        Familiarity::Learning,
        Familiarity::Familiar,
        Familiarity::Mastered,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Familiarity::New),
            "learning" => Some(Familiarity::Learning),
            "familiar" => Some(Familiarity::Familiar),
            "mastered" => Some(Familiarity::Mastered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Familiarity::New => "New",
            Familiarity::Learning => "Learning",
            Familiarity::Familiar => "Familiar",
            Familiarity::Mastered => "Mastered",
        }
    }
}

impl fmt::Display for Familiarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cefr_maps_onto_difficulty() {
        assert_eq!(CefrLevel::A2.difficulty(), DifficultyLevel::Beginner);
        assert_eq!(CefrLevel::B1.difficulty(), DifficultyLevel::Intermediate);
        assert_eq!(CefrLevel::C2.difficulty(), DifficultyLevel::Advanced);
    }

    #[test]
    fn difficulty_accepts_names_and_cefr_codes() {
        assert_eq!(DifficultyLevel::parse(" advanced "), Some(DifficultyLevel::Advanced));
        assert_eq!(DifficultyLevel::parse("b2"), Some(DifficultyLevel::Intermediate));
        assert_eq!(DifficultyLevel::parse("expert"), None);
    }

    #[test]
    fn parse_and_as_str_agree() {
        for level in DifficultyLevel::ALL {
            assert_eq!(DifficultyLevel::parse(level.as_str()), Some(level));
        }
        for level in Familiarity::ALL {
            assert_eq!(Familiarity::parse(level.as_str()), Some(level));
        }
        for level in CefrLevel::ALL {
            assert_eq!(CefrLevel::parse(level.as_str()), Some(level));
        }
    }

    #[test]
    fn familiarity_defaults_to_new() {
        assert_eq!(Familiarity::default(), Familiarity::New);
        assert_eq!(Familiarity::parse("MASTERED"), Some(Familiarity::Mastered));
        assert_eq!(Familiarity::parse(""), None);
    }
}
