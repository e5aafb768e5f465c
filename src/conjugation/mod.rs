pub mod engine;
pub mod oracle;

pub use engine::SoundVerbEngine;
pub use oracle::{fallback_result, Oracle};

use crate::pronouns::SLOT_COUNT;
use crate::vocabulary::VerbEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
}

impl Tense {
    pub fn as_str(self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
        }
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mood label as supplied by the conjugator. Opaque apart from the
/// imperative check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Mood(String);

impl Mood {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_imperative(&self) -> bool {
        self.0.trim_start().to_lowercase().starts_with("imperative")
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One point of the tense/mood space. Past tense carries no mood.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "tense", rename_all = "lowercase")]
pub enum TenseMood {
    Past,
    Present { mood: Mood },
}

impl TenseMood {
    pub fn present(mood: impl Into<String>) -> Self {
        TenseMood::Present {
            mood: Mood::new(mood),
        }
    }

    pub fn tense(&self) -> Tense {
        match self {
            TenseMood::Past => Tense::Past,
            TenseMood::Present { .. } => Tense::Present,
        }
    }

    pub fn mood(&self) -> Option<&Mood> {
        match self {
            TenseMood::Past => None,
            TenseMood::Present { mood } => Some(mood),
        }
    }

    pub fn is_imperative(&self) -> bool {
        self.mood().is_some_and(Mood::is_imperative)
    }

    /// Option text for tense/mood identification questions.
    pub fn label(&self) -> String {
        match self {
            TenseMood::Past => "past".to_string(),
            TenseMood::Present { mood } => format!("present - {}", mood),
        }
    }

    pub fn mood_display(&self) -> &str {
        self.mood().map_or("—", Mood::label)
    }
}

impl fmt::Display for TenseMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The 14 forms of one verb under one tense/mood, indexed by pronoun slot.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConjugationResult {
    pub title: String,
    pub forms: Vec<String>,
}

impl ConjugationResult {
    /// Form at pronoun slot `index`; empty when the slot has no form.
    pub fn form(&self, index: usize) -> &str {
        self.forms.get(index).map_or("", String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.forms.len() == SLOT_COUNT
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConjugationError {
    #[error("conjugation engine is not available")]
    Unavailable,
    #[error("verb '{lemma}' is not supported: {reason}")]
    UnsupportedVerb { lemma: String, reason: String },
    #[error("unknown conjugation pattern '{0}'")]
    UnknownPattern(String),
    #[error("present tense of '{0}' needs a conjugation pattern")]
    MissingPattern(String),
    #[error("unknown mood '{0}'")]
    UnknownMood(String),
    #[error("expected {expected} forms, engine returned {found}")]
    WrongFormCount { expected: usize, found: usize },
}

/// The conjugation oracle consumed by the question generator.
pub trait Conjugator {
    fn conjugate(
        &self,
        verb: &VerbEntry,
        tense_mood: &TenseMood,
    ) -> Result<ConjugationResult, ConjugationError>;

    /// Present-tense moods this conjugator understands, in display order.
    fn moods(&self) -> Vec<Mood> {
        default_moods()
    }
}

pub const INDICATIVE: &str = "Indicative (مرفوع)";
pub const SUBJUNCTIVE: &str = "Subjunctive (منصوب)";
pub const JUSSIVE: &str = "Jussive (مجزوم)";
pub const IMPERATIVE: &str = "Imperative (أمر)";

/// Moods used when no conjugator says otherwise.
pub fn default_moods() -> Vec<Mood> {
    [INDICATIVE, SUBJUNCTIVE, JUSSIVE]
        .into_iter()
        .map(Mood::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imperative_check_ignores_case_and_gloss() {
        assert!(Mood::new(IMPERATIVE).is_imperative());
        assert!(Mood::new("imperative").is_imperative());
        assert!(!Mood::new(JUSSIVE).is_imperative());
        assert!(TenseMood::present(IMPERATIVE).is_imperative());
        assert!(!TenseMood::Past.is_imperative());
    }

    #[test]
    fn labels_distinguish_tense_and_mood() {
        assert_eq!(TenseMood::Past.label(), "past");
        assert_eq!(
            TenseMood::present(SUBJUNCTIVE).label(),
            format!("present - {}", SUBJUNCTIVE)
        );
        assert_eq!(TenseMood::Past.mood_display(), "—");
    }

    #[test]
    fn missing_slots_read_as_empty() {
        let result = ConjugationResult {
            title: "t".to_string(),
            forms: vec!["a".to_string()],
        };
        assert_eq!(result.form(0), "a");
        assert_eq!(result.form(5), "");
        assert!(!result.is_complete());
    }
}
