//! Shared distractor sampling: candidate pools along one axis, drawn without
//! replacement, deduplicated by surface text and padded when exhausted.

use super::question::OPTION_COUNT;
use crate::conjugation::TenseMood;
use crate::pronouns::{canon, imperative_indices, is_imperative_compatible, unique_indices, SLOT_COUNT};
use crate::vocabulary::VerbEntry;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// The correct answer's coordinates in the conjugation space.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub verb: VerbEntry,
    pub tense_mood: TenseMood,
    pub pronoun: usize,
}

impl Selection {
    pub fn new(verb: VerbEntry, tense_mood: TenseMood, pronoun: usize) -> Self {
        Self {
            verb,
            tense_mood,
            pronoun,
        }
    }
}

/// Pronoun slots a form of `tense_mood` can be asked for.
pub fn pronoun_domain(tense_mood: &TenseMood) -> Vec<usize> {
    if tense_mood.is_imperative() {
        imperative_indices()
    } else {
        (0..SLOT_COUNT).collect()
    }
}

pub fn choose_pronoun<R: Rng + ?Sized>(rng: &mut R, tense_mood: &TenseMood) -> usize {
    let domain = pronoun_domain(tense_mood);
    domain.choose(rng).copied().unwrap_or(0)
}

pub fn random_selection<R: Rng + ?Sized>(
    rng: &mut R,
    verbs: &[VerbEntry],
    tense_moods: &[TenseMood],
) -> Option<Selection> {
    let verb = verbs.choose(rng)?.clone();
    let tense_mood = tense_moods.choose(rng)?.clone();
    let pronoun = choose_pronoun(rng, &tense_mood);
    Some(Selection::new(verb, tense_mood, pronoun))
}

/// Distinct-display pronouns other than `correct`, second person only when
/// `imperative`.
pub fn pronoun_pool(correct: usize, imperative: bool) -> Vec<usize> {
    let correct = canon(correct);
    unique_indices()
        .into_iter()
        .filter(|&i| i != correct)
        .filter(|&i| !imperative || is_imperative_compatible(i))
        .collect()
}

/// Every tense/mood but `exclude` that has a form for `pronoun`.
pub fn tense_mood_pool(all: &[TenseMood], exclude: &TenseMood, pronoun: usize) -> Vec<TenseMood> {
    all.iter()
        .filter(|tm| *tm != exclude)
        .filter(|tm| !tm.is_imperative() || is_imperative_compatible(pronoun))
        .cloned()
        .collect()
}

pub fn shuffled<T, R: Rng + ?Sized>(rng: &mut R, mut items: Vec<T>) -> Vec<T> {
    items.shuffle(rng);
    items
}

fn placeholder(n: usize) -> String {
    format!("— {} —", n)
}

/// Accumulates the correct option plus distinct distractors.
#[derive(Debug)]
pub struct OptionBuilder {
    options: Vec<String>,
}

impl OptionBuilder {
    pub fn new(correct: impl Into<String>) -> Self {
        Self {
            options: vec![correct.into()],
        }
    }

    pub fn is_full(&self) -> bool {
        self.options.len() >= OPTION_COUNT
    }

    /// Accepts a candidate unless it is empty or already offered.
    pub fn offer(&mut self, candidate: Option<String>) -> bool {
        match candidate {
            Some(text) if !self.is_full() && !text.is_empty() && !self.options.contains(&text) => {
                self.options.push(text);
                true
            }
            _ => false,
        }
    }

    /// Pops candidates off `pool` until one is accepted. `render` returns
    /// `None` for candidates that must not be offered.
    pub fn draw_from<C>(&mut self, pool: &mut Vec<C>, mut render: impl FnMut(&C) -> Option<String>) -> bool {
        while !self.is_full() {
            let Some(candidate) = pool.pop() else {
                return false;
            };
            if self.offer(render(&candidate)) {
                return true;
            }
        }
        false
    }

    pub fn fill_from<C>(&mut self, pool: &mut Vec<C>, mut render: impl FnMut(&C) -> Option<String>) {
        while self.draw_from(pool, &mut render) {}
    }

    /// Returns the options and whether placeholders had to be added.
    pub fn finish(mut self) -> (Vec<String>, bool) {
        let mut exhausted = false;
        let mut n = 1;
        while !self.is_full() {
            exhausted = true;
            let text = placeholder(n);
            n += 1;
            self.offer(Some(text));
        }
        (self.options, exhausted)
    }
}
