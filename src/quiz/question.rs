use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Options offered per question.
pub const OPTION_COUNT: usize = 4;

/// Correct option of a cross-tense question whose target has no form for the
/// pronoun (imperative asked for a non-second-person slot).
pub const NO_VALID_FORM: &str = "None";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionStyle {
    /// Pronoun and base verb shown, pick the conjugated form.
    ConjugateForm,
    /// Conjugated form shown, pick its tense/mood.
    NameTenseMood,
    /// Form A shown, pick the same verb and pronoun under another tense/mood.
    CrossTense,
    /// Conjugated form shown, pick its pronoun.
    NamePronoun,
    /// Conjugated form shown, pick its base verb.
    NameVerb,
}

impl QuestionStyle {
    pub const ALL: [QuestionStyle; 5] = [
        QuestionStyle::ConjugateForm,
        QuestionStyle::NameTenseMood,
        QuestionStyle::CrossTense,
        QuestionStyle::NamePronoun,
        QuestionStyle::NameVerb,
    ];

    pub fn number(self) -> u8 {
        match self {
            QuestionStyle::ConjugateForm => 1,
            QuestionStyle::NameTenseMood => 2,
            QuestionStyle::CrossTense => 3,
            QuestionStyle::NamePronoun => 4,
            QuestionStyle::NameVerb => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuestionStyle::ConjugateForm => "conjugate-form",
            QuestionStyle::NameTenseMood => "name-tense-mood",
            QuestionStyle::CrossTense => "cross-tense",
            QuestionStyle::NamePronoun => "name-pronoun",
            QuestionStyle::NameVerb => "name-verb",
        }
    }
}

impl fmt::Display for QuestionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuestionStyle {
    type Err = String;

    /// Accepts the style number (`1`..`5`) or its kebab-case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        QuestionStyle::ALL
            .into_iter()
            .find(|style| style.name() == wanted || style.number().to_string() == wanted)
            .ok_or_else(|| format!("unknown question style '{}'", wanted))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub style: QuestionStyle,
    pub prompt_text: String,
    pub hint_text: String,
    /// Exactly [`OPTION_COUNT`] distinct strings, correct option first.
    pub options: Vec<String>,
    pub correct_option: String,
    /// Set when placeholder text stands in for a real form or option.
    pub degraded: bool,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_option
    }
}

/// A question with its options in the order they were shown.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShownQuestion {
    pub question: Question,
    pub order: Vec<String>,
}

impl ShownQuestion {
    /// Option text for a 0-based button position.
    pub fn option_at(&self, position: usize) -> Option<&str> {
        self.order.get(position).map(String::as_str)
    }

    pub fn correct_position(&self) -> Option<usize> {
        self.order
            .iter()
            .position(|o| *o == self.question.correct_option)
    }
}

pub fn shuffle_for_display<R: Rng + ?Sized>(rng: &mut R, question: Question) -> ShownQuestion {
    let mut order = question.options.clone();
    order.shuffle(rng);
    ShownQuestion { question, order }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question() -> Question {
        Question {
            style: QuestionStyle::ConjugateForm,
            prompt_text: "p".to_string(),
            hint_text: "h".to_string(),
            options: ["a", "b", "c", "d"].map(String::from).to_vec(),
            correct_option: "a".to_string(),
            degraded: false,
        }
    }

    #[test]
    fn styles_parse_by_number_or_name() {
        for style in QuestionStyle::ALL {
            assert_eq!(style.number().to_string().parse::<QuestionStyle>(), Ok(style));
            assert_eq!(style.name().parse::<QuestionStyle>(), Ok(style));
        }
        assert!("6".parse::<QuestionStyle>().is_err());
    }

    #[test]
    fn shuffle_keeps_the_option_set() {
        let mut rng = StdRng::seed_from_u64(7);
        let shown = shuffle_for_display(&mut rng, question());
        let mut order = shown.order.clone();
        order.sort();
        assert_eq!(order, shown.question.options);
        let correct = shown.correct_position().expect("correct option is shown");
        assert_eq!(shown.option_at(correct), Some("a"));
        assert!(shown.question.is_correct("a"));
        assert!(!shown.question.is_correct("b"));
    }
}
