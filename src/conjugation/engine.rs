//! Conjugation of sound triliteral (Form I) verbs.
//!
//! Suffix and ending tables are written in a small ASCII notation and
//! expanded by [`expand`]: `a u i o ~` are fatha, damma, kasra, sukun and
//! shadda; `t n m w y A` are the letters ت ن م و ي ا.

use super::{
    ConjugationError, ConjugationResult, Conjugator, Mood, TenseMood, IMPERATIVE, INDICATIVE,
    JUSSIVE, SUBJUNCTIVE,
};
use crate::pronouns::{IMPERATIVE_RANGE, SLOT_COUNT};
use crate::vocabulary::VerbEntry;
use regex::Regex;
use std::sync::LazyLock;

const FATHA: char = '\u{064E}';
const DAMMA: char = '\u{064F}';
const KASRA: char = '\u{0650}';
const SUKUN: char = '\u{0652}';
const SHADDA: char = '\u{0651}';
const ALIF: char = 'ا';
const HAMZA_ALIF: char = 'أ';

static HARAKAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{064B}-\u{0652}]").expect("static harakat pattern"));

fn is_haraka(c: char) -> bool {
    ('\u{064B}'..='\u{0652}').contains(&c)
}

const WEAK_OR_HAMZA: &[char] = &['ا', 'و', 'ي', 'ى', 'ء', 'أ', 'إ', 'ؤ', 'ئ', 'آ'];

const PAST_SUFFIXES: [&str; SLOT_COUNT] = [
    "a", "aA", "uwA", "ato", "ataA", "ona", "ota", "otumaA", "otumo", "oti", "otumaA", "otuna~",
    "otu", "onaA",
];

const INDICATIVE_ENDINGS: [&str; SLOT_COUNT] = [
    "u", "aAni", "uwna", "u", "aAni", "ona", "u", "aAni", "uwna", "iyna", "aAni", "ona", "u", "u",
];

const SUBJUNCTIVE_ENDINGS: [&str; SLOT_COUNT] = [
    "a", "aA", "uwA", "a", "aA", "ona", "a", "aA", "uwA", "iy", "aA", "ona", "a", "a",
];

const JUSSIVE_ENDINGS: [&str; SLOT_COUNT] = [
    "o", "aA", "uwA", "o", "aA", "ona", "o", "aA", "uwA", "iy", "aA", "ona", "o", "o",
];

const PRESENT_PREFIXES: [char; SLOT_COUNT] = [
    'ي', 'ي', 'ي', 'ت', 'ت', 'ي', 'ت', 'ت', 'ت', 'ت', 'ت', 'ت', HAMZA_ALIF, 'ن',
];

/// Pattern key and the middle-radical vowel it gives the present stem.
const PATTERNS: [(&str, char); 6] = [
    ("nasara", DAMMA),
    ("daraba", KASRA),
    ("fataha", FATHA),
    ("samia", FATHA),
    ("hasiba", KASRA),
    ("karuma", DAMMA),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PresentMood {
    Indicative,
    Subjunctive,
    Jussive,
    Imperative,
}

impl PresentMood {
    fn parse(mood: &Mood) -> Result<Self, ConjugationError> {
        let label = mood.label().trim().to_lowercase();
        if label.starts_with("indicative") {
            Ok(PresentMood::Indicative)
        } else if label.starts_with("subjunctive") {
            Ok(PresentMood::Subjunctive)
        } else if label.starts_with("jussive") {
            Ok(PresentMood::Jussive)
        } else if mood.is_imperative() {
            Ok(PresentMood::Imperative)
        } else {
            Err(ConjugationError::UnknownMood(mood.label().to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Root {
    radicals: [char; 3],
    past_vowel: char,
}

fn expand(notation: &str) -> String {
    notation
        .chars()
        .map(|c| match c {
            'a' => FATHA,
            'u' => DAMMA,
            'i' => KASRA,
            'o' => SUKUN,
            '~' => SHADDA,
            't' => 'ت',
            'n' => 'ن',
            'm' => 'م',
            'w' => 'و',
            'y' => 'ي',
            'A' => ALIF,
            other => other,
        })
        .collect()
}

fn unsupported(verb: &VerbEntry, reason: &str) -> ConjugationError {
    ConjugationError::UnsupportedVerb {
        lemma: verb.lemma.clone(),
        reason: reason.to_string(),
    }
}

fn parse_root(verb: &VerbEntry) -> Result<Root, ConjugationError> {
    let lemma = verb.lemma.trim();
    let letters: Vec<char> = HARAKAT.replace_all(lemma, "").chars().collect();
    let radicals: [char; 3] = letters
        .as_slice()
        .try_into()
        .map_err(|_| unsupported(verb, "not a triliteral verb"))?;
    if radicals.iter().any(|r| WEAK_OR_HAMZA.contains(r)) {
        return Err(unsupported(verb, "weak or hamzated root"));
    }
    if radicals[1] == radicals[2] {
        return Err(unsupported(verb, "doubled root"));
    }

    // The haraka written on the second radical, fatha when unmarked.
    let mut seen_letters = 0;
    let mut past_vowel = FATHA;
    let mut chars = lemma.chars().peekable();
    while let Some(c) = chars.next() {
        if is_haraka(c) {
            continue;
        }
        seen_letters += 1;
        if seen_letters == 2 {
            if let Some(&next) = chars.peek() {
                if [FATHA, DAMMA, KASRA].contains(&next) {
                    past_vowel = next;
                }
            }
            break;
        }
    }

    Ok(Root {
        radicals,
        past_vowel,
    })
}

fn present_vowel(verb: &VerbEntry) -> Result<char, ConjugationError> {
    let key = verb.pattern.trim();
    if key.is_empty() {
        return Err(ConjugationError::MissingPattern(verb.lemma.clone()));
    }
    PATTERNS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, vowel)| *vowel)
        .ok_or_else(|| ConjugationError::UnknownPattern(key.to_string()))
}

/// Built-in [`Conjugator`] for sound Form I verbs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoundVerbEngine;

impl SoundVerbEngine {
    pub fn new() -> Self {
        Self
    }

    fn past(&self, root: Root) -> Vec<String> {
        let [r1, r2, r3] = root.radicals;
        let stem: String = [r1, FATHA, r2, root.past_vowel, r3].iter().collect();
        PAST_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{}", stem, expand(suffix)))
            .collect()
    }

    fn present(&self, root: Root, vowel: char, mood: PresentMood) -> Vec<String> {
        let [r1, r2, r3] = root.radicals;
        let stem: String = [r1, SUKUN, r2, vowel, r3].iter().collect();
        let endings = match mood {
            PresentMood::Indicative => &INDICATIVE_ENDINGS,
            PresentMood::Subjunctive => &SUBJUNCTIVE_ENDINGS,
            PresentMood::Jussive | PresentMood::Imperative => &JUSSIVE_ENDINGS,
        };

        (0..SLOT_COUNT)
            .map(|i| {
                let ending = expand(endings[i]);
                if mood != PresentMood::Imperative {
                    format!("{}{}{}{}", PRESENT_PREFIXES[i], FATHA, stem, ending)
                } else if IMPERATIVE_RANGE.contains(&i) {
                    let linking_vowel = if vowel == DAMMA { DAMMA } else { KASRA };
                    format!("{}{}{}{}", ALIF, linking_vowel, stem, ending)
                } else {
                    String::new()
                }
            })
            .collect()
    }
}

impl Conjugator for SoundVerbEngine {
    fn conjugate(
        &self,
        verb: &VerbEntry,
        tense_mood: &TenseMood,
    ) -> Result<ConjugationResult, ConjugationError> {
        let root = parse_root(verb)?;
        match tense_mood {
            TenseMood::Past => Ok(ConjugationResult {
                title: "Past tense (الماضي)".to_string(),
                forms: self.past(root),
            }),
            TenseMood::Present { mood } => {
                let present_mood = PresentMood::parse(mood)?;
                let vowel = present_vowel(verb)?;
                Ok(ConjugationResult {
                    title: format!("Present tense (المضارع) - {}", mood),
                    forms: self.present(root, vowel, present_mood),
                })
            }
        }
    }

    fn moods(&self) -> Vec<Mood> {
        [INDICATIVE, SUBJUNCTIVE, JUSSIVE, IMPERATIVE]
            .into_iter()
            .map(Mood::new)
            .collect()
    }
}
