use rocket::serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Highest first; the aggregate difficulty of a sentence is the first of
    /// these any of its words carries.
    pub const BY_PRIORITY: [Difficulty; 3] = [
        Difficulty::Advanced,
        Difficulty::Intermediate,
        Difficulty::Beginner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            JlptLevel::N5 => "N5",
            JlptLevel::N4 => "N4",
            JlptLevel::N3 => "N3",
            JlptLevel::N2 => "N2",
            JlptLevel::N1 => "N1",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolitenessLevel {
    Plain,
    Polite,
    Honorific,
}

impl PolitenessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolitenessLevel::Plain => "plain",
            PolitenessLevel::Polite => "polite",
            PolitenessLevel::Honorific => "honorific",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayField {
    Kanji,
    #[default]
    Furigana,
    Romaji,
    Meaning,
}
