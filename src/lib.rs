//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod conjugation;
pub mod pronouns;
pub mod quiz;
pub mod session;
pub mod terminal;
pub mod vocabulary;

pub use config::Config;
pub use conjugation::{Conjugator, Oracle, SoundVerbEngine};
pub use quiz::{Generator, Question, QuestionStyle};
pub use session::Session;

//*** END FILE: src/lib.rs ***//
