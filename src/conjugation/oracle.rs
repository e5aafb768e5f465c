use super::{default_moods, ConjugationError, ConjugationResult, Conjugator, Mood, TenseMood};
use crate::pronouns::SLOT_COUNT;
use crate::vocabulary::VerbEntry;
use std::cell::Cell;
use tracing::warn;

/// Placeholder table used whenever the conjugator cannot answer:
/// `forms[i] == "<lemma>[<i>]"`.
pub fn fallback_result(verb: &VerbEntry, tense_mood: &TenseMood) -> ConjugationResult {
    let mood = tense_mood.mood().map_or("default", Mood::label);
    ConjugationResult {
        title: format!("{} - {}", tense_mood.tense(), mood),
        forms: (0..SLOT_COUNT)
            .map(|i| format!("{}[{}]", verb.lemma, i))
            .collect(),
    }
}

/// Conjugation front door for question generation. Never fails: engine errors
/// are logged and replaced by [`fallback_result`].
pub struct Oracle {
    engine: Option<Box<dyn Conjugator>>,
    moods: Vec<Mood>,
    fallbacks: Cell<usize>,
}

impl Oracle {
    pub fn new(engine: Box<dyn Conjugator>) -> Self {
        let moods = engine.moods();
        Self {
            engine: Some(engine),
            moods,
            fallbacks: Cell::new(0),
        }
    }

    /// An oracle with no engine behind it; every table is a placeholder.
    pub fn unavailable() -> Self {
        warn!("conjugation engine unavailable, questions will use placeholder forms");
        Self {
            engine: None,
            moods: default_moods(),
            fallbacks: Cell::new(0),
        }
    }

    /// How many tables so far were replaced by placeholders.
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.get()
    }

    /// Past tense followed by the present tense in every known mood.
    pub fn tense_moods(&self) -> Vec<TenseMood> {
        std::iter::once(TenseMood::Past)
            .chain(self.moods.iter().cloned().map(|mood| TenseMood::Present { mood }))
            .collect()
    }

    pub fn conjugate(&self, verb: &VerbEntry, tense_mood: &TenseMood) -> ConjugationResult {
        self.conjugate_checked(verb, tense_mood).0
    }

    /// Same as [`Oracle::conjugate`], also telling whether the table is a
    /// placeholder. Placeholder tables repeat across tense/moods, so their
    /// forms say nothing about ambiguity.
    pub fn conjugate_checked(
        &self,
        verb: &VerbEntry,
        tense_mood: &TenseMood,
    ) -> (ConjugationResult, bool) {
        match self.try_conjugate(verb, tense_mood) {
            Ok(result) => (result, false),
            Err(error) => {
                self.fallbacks.set(self.fallbacks.get() + 1);
                if self.engine.is_some() {
                    warn!(
                        verb = %verb.lemma,
                        tense_mood = %tense_mood,
                        %error,
                        "conjugation failed, using placeholder forms"
                    );
                }
                (fallback_result(verb, tense_mood), true)
            }
        }
    }

    fn try_conjugate(
        &self,
        verb: &VerbEntry,
        tense_mood: &TenseMood,
    ) -> Result<ConjugationResult, ConjugationError> {
        let engine = self.engine.as_ref().ok_or(ConjugationError::Unavailable)?;
        let result = engine.conjugate(verb, tense_mood)?;
        if !result.is_complete() {
            return Err(ConjugationError::WrongFormCount {
                expected: SLOT_COUNT,
                found: result.forms.len(),
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjugation::{SoundVerbEngine, IMPERATIVE, INDICATIVE};
    use pretty_assertions::assert_eq;

    struct Failing;

    impl Conjugator for Failing {
        fn conjugate(&self, verb: &VerbEntry, _: &TenseMood) -> Result<ConjugationResult, ConjugationError> {
            Err(ConjugationError::UnsupportedVerb {
                lemma: verb.lemma.clone(),
                reason: "test".to_string(),
            })
        }
    }

    struct Short;

    impl Conjugator for Short {
        fn conjugate(&self, _: &VerbEntry, _: &TenseMood) -> Result<ConjugationResult, ConjugationError> {
            Ok(ConjugationResult {
                title: "short".to_string(),
                forms: vec!["x".to_string(); 3],
            })
        }
    }

    #[test]
    fn failed_call_yields_indexed_placeholders() {
        let oracle = Oracle::new(Box::new(Failing));
        let verb = VerbEntry::new("كتب", "nasara");
        let result = oracle.conjugate(&verb, &TenseMood::present(INDICATIVE));
        for i in 0..SLOT_COUNT {
            assert_eq!(result.form(i), format!("كتب[{}]", i));
        }
        assert_eq!(result.title, format!("present - {}", INDICATIVE));
        assert_eq!(oracle.fallback_count(), 1);
    }

    #[test]
    fn incomplete_table_counts_as_failure() {
        let oracle = Oracle::new(Box::new(Short));
        let verb = VerbEntry::new("كتب", "nasara");
        let result = oracle.conjugate(&verb, &TenseMood::Past);
        assert_eq!(result.forms.len(), SLOT_COUNT);
        assert_eq!(result.form(0), "كتب[0]");
        assert_eq!(result.title, "past - default");
    }

    #[test]
    fn unavailable_oracle_marks_every_table() {
        let oracle = Oracle::unavailable();
        let verb = VerbEntry::new("فتح", "fataha");
        let (result, fell_back) = oracle.conjugate_checked(&verb, &TenseMood::Past);
        assert!(fell_back);
        assert_eq!(result.form(13), "فتح[13]");
        assert_eq!(oracle.fallback_count(), 1);
        assert_eq!(oracle.tense_moods().len(), 4);
        assert!(!oracle.tense_moods().iter().any(TenseMood::is_imperative));
    }

    #[test]
    fn tense_moods_follow_engine_moods() {
        let oracle = Oracle::new(Box::new(SoundVerbEngine::new()));
        let all = oracle.tense_moods();
        assert_eq!(all[0], TenseMood::Past);
        assert_eq!(all.last(), Some(&TenseMood::present(IMPERATIVE)));
        assert_eq!(oracle.fallback_count(), 0);
        let verb = VerbEntry::new("كَتَبَ", "nasara");
        assert!(!oracle.conjugate_checked(&verb, &TenseMood::Past).1);
    }
}
