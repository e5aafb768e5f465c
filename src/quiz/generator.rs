use super::question::{Question, QuestionStyle, NO_VALID_FORM};
use super::sampler::{
    pronoun_domain, pronoun_pool, random_selection, shuffled, tense_mood_pool, OptionBuilder,
    Selection,
};
use crate::conjugation::{ConjugationResult, Oracle, TenseMood};
use crate::pronouns::{canon, is_imperative_compatible, PronounSlot, PRONOUNS};
use crate::vocabulary::{other_verbs, VerbEntry};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("vocabulary is empty, at least one verb is required")]
    EmptyVocabulary,
}

/// Tables of one verb per tense/mood, flagged when the oracle fell back.
type Tables = Vec<(TenseMood, ConjugationResult, bool)>;

fn lookup<'t>(tables: &'t Tables, tense_mood: &TenseMood) -> Option<(&'t ConjugationResult, bool)> {
    tables
        .iter()
        .find(|(tm, _, _)| tm == tense_mood)
        .map(|(_, table, fell_back)| (table, *fell_back))
}

fn pronoun_slot(index: usize) -> &'static PronounSlot {
    crate::pronouns::slot(index).unwrap_or(&PRONOUNS[0])
}

/// Form at `pronoun`, or the sentinel when the table has none there.
fn form_or_sentinel(table: &ConjugationResult, pronoun: usize) -> String {
    match table.form(pronoun) {
        "" => NO_VALID_FORM.to_string(),
        form => form.to_string(),
    }
}

/// Tense/moods that would be wrong answers for the form `correct` gives at
/// `pronoun`: excludes readings with no form and readings that produce the
/// very same text. Placeholder tables are never compared.
fn unambiguous_readings(tables: &Tables, correct: &TenseMood, pronoun: usize) -> Vec<TenseMood> {
    let all: Vec<TenseMood> = tables.iter().map(|(tm, _, _)| tm.clone()).collect();
    let (shown, shown_fell_back) =
        lookup(tables, correct).map_or(("", true), |(t, fell_back)| (t.form(pronoun), fell_back));
    tense_mood_pool(&all, correct, pronoun)
        .into_iter()
        .filter(|tm| match lookup(tables, tm) {
            Some((table, fell_back)) => {
                let form = table.form(pronoun);
                !form.is_empty() && (fell_back || shown_fell_back || form != shown)
            }
            None => false,
        })
        .collect()
}

/// Builds questions of every style from one oracle and one vocabulary.
pub struct Generator<'a> {
    oracle: &'a Oracle,
    verbs: &'a [VerbEntry],
    tense_moods: Vec<TenseMood>,
}

impl<'a> Generator<'a> {
    pub fn new(oracle: &'a Oracle, verbs: &'a [VerbEntry]) -> Result<Self, QuizError> {
        if verbs.is_empty() {
            return Err(QuizError::EmptyVocabulary);
        }
        Ok(Self {
            oracle,
            verbs,
            tense_moods: oracle.tense_moods(),
        })
    }

    pub fn random_question<R: Rng + ?Sized>(&self, rng: &mut R, styles: &[QuestionStyle]) -> Question {
        let style = styles
            .choose(rng)
            .copied()
            .unwrap_or(QuestionStyle::ConjugateForm);
        self.generate(rng, style)
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, style: QuestionStyle) -> Question {
        let selection = self.random_selection(rng);
        match style {
            QuestionStyle::ConjugateForm => self.conjugate_form(rng, &selection),
            QuestionStyle::NameTenseMood => self.name_tense_mood_random(rng, selection),
            QuestionStyle::CrossTense => {
                let target = self.random_target(rng, &selection.tense_mood);
                self.cross_tense(rng, &selection, &target)
            }
            QuestionStyle::NamePronoun => self.name_pronoun(rng, &selection),
            QuestionStyle::NameVerb => self.name_verb(rng, &selection),
        }
    }

    fn random_selection<R: Rng + ?Sized>(&self, rng: &mut R) -> Selection {
        random_selection(rng, self.verbs, &self.tense_moods)
            .unwrap_or_else(|| Selection::new(self.verbs[0].clone(), TenseMood::Past, 0))
    }

    fn random_target<R: Rng + ?Sized>(&self, rng: &mut R, source: &TenseMood) -> TenseMood {
        let others: Vec<&TenseMood> = self.tense_moods.iter().filter(|tm| *tm != source).collect();
        others
            .choose(rng)
            .map_or_else(|| source.clone(), |tm| (*tm).clone())
    }

    fn tables_for(&self, verb: &VerbEntry, extra: &TenseMood) -> Tables {
        let mut tense_moods = self.tense_moods.clone();
        if !tense_moods.contains(extra) {
            tense_moods.push(extra.clone());
        }
        tense_moods
            .into_iter()
            .map(|tm| {
                let (table, fell_back) = self.oracle.conjugate_checked(verb, &tm);
                (tm, table, fell_back)
            })
            .collect()
    }

    fn finish(
        &self,
        style: QuestionStyle,
        prompt_text: String,
        hint_text: String,
        correct_option: String,
        builder: OptionBuilder,
        fallbacks_before: usize,
    ) -> Question {
        let (options, exhausted) = builder.finish();
        if exhausted {
            debug!(%style, "distractor pool exhausted, padded with placeholders");
        }
        let degraded = exhausted || self.oracle.fallback_count() > fallbacks_before;
        debug!(%style, correct = %correct_option, ?options, degraded, "generated question");
        Question {
            style,
            prompt_text,
            hint_text,
            options,
            correct_option,
            degraded,
        }
    }

    /// Style 1: pick the form for a given pronoun. Distractors come from the
    /// same table at other pronouns, then the same pronoun in other
    /// tense/moods.
    pub fn conjugate_form<R: Rng + ?Sized>(&self, rng: &mut R, selection: &Selection) -> Question {
        let before = self.oracle.fallback_count();
        let Selection {
            verb,
            tense_mood,
            pronoun,
        } = selection;
        let table = self.oracle.conjugate(verb, tense_mood);
        let correct = form_or_sentinel(&table, *pronoun);

        let mut builder = OptionBuilder::new(correct.clone());
        let mut pronouns = shuffled(rng, pronoun_pool(*pronoun, tense_mood.is_imperative()));
        builder.fill_from(&mut pronouns, |&q: &usize| Some(table.form(q).to_string()));
        let mut alternates = shuffled(rng, tense_mood_pool(&self.tense_moods, tense_mood, *pronoun));
        builder.fill_from(&mut alternates, |tm: &TenseMood| {
            Some(self.oracle.conjugate(verb, tm).form(*pronoun).to_string())
        });

        let slot = pronoun_slot(*pronoun);
        let prompt = format!(
            "Select the correct conjugation for pronoun: {} ({})\nBase verb: {}",
            slot.label, slot.display_form, verb.lemma
        );
        let hint = format!(
            "Tense: {}  Mood: {}",
            tense_mood.tense(),
            tense_mood.mood_display()
        );
        self.finish(QuestionStyle::ConjugateForm, prompt, hint, correct, builder, before)
    }

    /// Style 2: name the tense/mood of a shown form.
    pub fn name_tense_mood<R: Rng + ?Sized>(&self, rng: &mut R, selection: &Selection) -> Question {
        let before = self.oracle.fallback_count();
        let tables = self.tables_for(&selection.verb, &selection.tense_mood);
        self.name_tense_mood_from(rng, selection, &tables, before)
    }

    /// Style 2 with the pronoun picked so that at least three wrong readings
    /// remain, when the verb allows it.
    fn name_tense_mood_random<R: Rng + ?Sized>(&self, rng: &mut R, selection: Selection) -> Question {
        let before = self.oracle.fallback_count();
        let tables = self.tables_for(&selection.verb, &selection.tense_mood);
        let candidates = shuffled(rng, pronoun_domain(&selection.tense_mood));
        let readings = |p: usize| unambiguous_readings(&tables, &selection.tense_mood, p).len();
        let pronoun = candidates
            .iter()
            .copied()
            .find(|&p| readings(p) >= 3)
            .or_else(|| candidates.iter().copied().max_by_key(|&p| readings(p)))
            .unwrap_or(selection.pronoun);
        let selection = Selection {
            pronoun,
            ..selection
        };
        self.name_tense_mood_from(rng, &selection, &tables, before)
    }

    fn name_tense_mood_from<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        selection: &Selection,
        tables: &Tables,
        before: usize,
    ) -> Question {
        let shown = lookup(tables, &selection.tense_mood)
            .map(|(t, _)| form_or_sentinel(t, selection.pronoun))
            .unwrap_or_else(|| NO_VALID_FORM.to_string());
        let correct = selection.tense_mood.label();

        let mut builder = OptionBuilder::new(correct.clone());
        let mut pool = shuffled(
            rng,
            unambiguous_readings(tables, &selection.tense_mood, selection.pronoun),
        );
        builder.fill_from(&mut pool, |tm: &TenseMood| Some(tm.label()));

        let slot = pronoun_slot(selection.pronoun);
        let prompt = format!("Which tense/mood is this conjugated form?\n\n{}", shown);
        let hint = format!(
            "Pronoun: {} ({})  Base verb hidden",
            slot.label, slot.display_form
        );
        self.finish(QuestionStyle::NameTenseMood, prompt, hint, correct, builder, before)
    }

    /// Style 3: given form A, pick the same verb and pronoun under `target`.
    /// An imperative target for a non-second-person pronoun has no form, and
    /// the correct option is [`NO_VALID_FORM`].
    pub fn cross_tense<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        source: &Selection,
        target: &TenseMood,
    ) -> Question {
        let before = self.oracle.fallback_count();
        let pronoun = source.pronoun;
        let source_form = form_or_sentinel(
            &self.oracle.conjugate(&source.verb, &source.tense_mood),
            pronoun,
        );
        let target_valid = !target.is_imperative() || is_imperative_compatible(pronoun);
        let target_table = self.oracle.conjugate(&source.verb, target);
        let correct = if target_valid {
            form_or_sentinel(&target_table, pronoun)
        } else {
            NO_VALID_FORM.to_string()
        };
        debug!(verb = %source.verb.lemma, %target, pronoun, target_valid, "cross-tense question");

        // Same verb and target, other pronouns.
        let mut pronouns = shuffled(rng, pronoun_pool(pronoun, target.is_imperative()));
        let mut same_target = |&q: &usize| Some(target_table.form(q).to_string());

        // Other verbs, same pronoun. Without a target form, other verbs are
        // shown in the source tense/mood instead.
        let other_verb_tm = if target_valid { target } else { &source.tense_mood };
        let mut verbs = shuffled(rng, other_verbs(self.verbs, &source.verb));
        let mut other_verb = |v: &&VerbEntry| {
            Some(self.oracle.conjugate(v, other_verb_tm).form(pronoun).to_string())
        };

        // Same verb and pronoun, other tense/moods.
        let mut alternates = shuffled(rng, tense_mood_pool(&self.tense_moods, target, pronoun));
        let mut other_tense_mood = |tm: &TenseMood| {
            Some(self.oracle.conjugate(&source.verb, tm).form(pronoun).to_string())
        };

        let mut builder = OptionBuilder::new(correct.clone());
        builder.draw_from(&mut pronouns, &mut same_target);
        builder.draw_from(&mut verbs, &mut other_verb);
        builder.draw_from(&mut alternates, &mut other_tense_mood);
        builder.fill_from(&mut alternates, &mut other_tense_mood);
        builder.fill_from(&mut pronouns, &mut same_target);
        builder.fill_from(&mut verbs, &mut other_verb);

        let prompt = format!(
            "Given this conjugated form (A): {}\nIf the same base verb were conjugated for: Tense={} Mood={} Pronoun={}, which would it be?",
            source_form,
            target.tense(),
            target.mood_display(),
            pronoun_slot(pronoun).label
        );
        let hint = format!("Base verb: {} (conjugation A shown)", source.verb.lemma);
        self.finish(QuestionStyle::CrossTense, prompt, hint, correct, builder, before)
    }

    /// Style 4: name the pronoun of a shown form. Pronouns whose form is the
    /// same text are never offered as wrong answers.
    pub fn name_pronoun<R: Rng + ?Sized>(&self, rng: &mut R, selection: &Selection) -> Question {
        let before = self.oracle.fallback_count();
        let table = self.oracle.conjugate(&selection.verb, &selection.tense_mood);
        let shown = form_or_sentinel(&table, selection.pronoun);
        let correct = pronoun_slot(canon(selection.pronoun)).display_form.to_string();

        let mut builder = OptionBuilder::new(correct.clone());
        let mut pool = shuffled(
            rng,
            pronoun_pool(selection.pronoun, selection.tense_mood.is_imperative()),
        );
        builder.fill_from(&mut pool, |&q: &usize| {
            (table.form(q) != shown).then(|| pronoun_slot(q).display_form.to_string())
        });

        let prompt = format!("Which pronoun does this conjugated form belong to?\n\n{}", shown);
        let hint = format!(
            "Base verb: {}  Tense: {}  Mood: {}",
            selection.verb.lemma,
            selection.tense_mood.tense(),
            selection.tense_mood.mood_display()
        );
        self.finish(QuestionStyle::NamePronoun, prompt, hint, correct, builder, before)
    }

    /// Style 5: name the base verb of a shown form.
    pub fn name_verb<R: Rng + ?Sized>(&self, rng: &mut R, selection: &Selection) -> Question {
        let before = self.oracle.fallback_count();
        let Selection {
            verb,
            tense_mood,
            pronoun,
        } = selection;
        let shown = form_or_sentinel(&self.oracle.conjugate(verb, tense_mood), *pronoun);
        let correct = verb.lemma.clone();

        let mut builder = OptionBuilder::new(correct.clone());
        let mut pool = shuffled(rng, other_verbs(self.verbs, verb));
        builder.fill_from(&mut pool, |other: &&VerbEntry| {
            let form = self.oracle.conjugate(other, tense_mood);
            (form.form(*pronoun) != shown).then(|| other.lemma.clone())
        });

        let slot = pronoun_slot(*pronoun);
        let prompt = format!("Which base verb produced this conjugation?\n\n{}", shown);
        let hint = format!(
            "Pronoun: {} ({})  Tense: {}  Mood: {}",
            slot.label,
            slot.display_form,
            tense_mood.tense(),
            tense_mood.mood_display()
        );
        self.finish(QuestionStyle::NameVerb, prompt, hint, correct, builder, before)
    }
}
