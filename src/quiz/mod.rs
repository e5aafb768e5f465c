//! Multiple-choice question generation over the conjugation space.

pub mod generator;
pub mod question;
pub mod sampler;

pub use generator::{Generator, QuizError};
pub use question::{shuffle_for_display, Question, QuestionStyle, ShownQuestion, NO_VALID_FORM, OPTION_COUNT};
pub use sampler::Selection;
