//! Practice counters and the fixed-length test with its review mode.
//!
//! `Idle -> Running -> Review -> Idle`. Answers and skips both advance a
//! running test; the last one moves it to review, where navigation past
//! either end does nothing.

use crate::quiz::ShownQuestion;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Questions per test unless configured otherwise.
pub const TEST_LENGTH: usize = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no test is running")]
    NotRunning,
    #[error("no question is waiting for an answer")]
    NoPendingQuestion,
    #[error("the current question has not been answered yet")]
    QuestionPending,
}

#[derive(Debug, Clone)]
pub struct Stopwatch {
    started: Instant,
    stopped: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }

    /// Freezes the reading. Stopping twice keeps the first reading.
    pub fn stop(&mut self) -> Duration {
        *self.stopped.get_or_insert_with(|| self.started.elapsed())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "outcome", content = "choice")]
pub enum Outcome {
    Answered(String),
    Skipped,
}

#[derive(Serialize, Debug, Clone)]
pub struct TestRecord {
    pub shown: ShownQuestion,
    pub outcome: Outcome,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl TestRecord {
    pub fn chosen(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Answered(choice) => Some(choice),
            Outcome::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.outcome == Outcome::Skipped
    }

    pub fn is_correct(&self) -> bool {
        self.chosen()
            .is_some_and(|choice| self.shown.question.is_correct(choice))
    }
}

#[derive(Debug)]
pub struct TestRun {
    length: usize,
    records: Vec<TestRecord>,
    pending: Option<ShownQuestion>,
    stopwatch: Stopwatch,
    question_started: Instant,
}

impl TestRun {
    fn new(length: usize) -> Self {
        Self {
            length,
            records: Vec::with_capacity(length),
            pending: None,
            stopwatch: Stopwatch::start(),
            question_started: Instant::now(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// 1-based number of the question being asked (or about to be).
    pub fn question_number(&self) -> usize {
        self.records.len() + 1
    }

    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    fn finish(mut self) -> Review {
        let elapsed = self.stopwatch.stop();
        Review {
            records: self.records,
            pointer: 0,
            elapsed,
        }
    }
}

/// A finished test, browsable one record at a time.
#[derive(Debug)]
pub struct Review {
    records: Vec<TestRecord>,
    pointer: usize,
    elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct ReviewEntry<'r> {
    pub record: &'r TestRecord,
    /// 0-based.
    pub position: usize,
    pub total: usize,
}

impl ReviewEntry<'_> {
    pub fn is_correct(&self) -> bool {
        self.record.is_correct()
    }

    pub fn is_skipped(&self) -> bool {
        self.record.is_skipped()
    }
}

impl Review {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn score(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct()).count()
    }

    pub fn skipped(&self) -> usize {
        self.records.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn current(&self) -> Option<ReviewEntry<'_>> {
        self.records.get(self.pointer).map(|record| ReviewEntry {
            record,
            position: self.pointer,
            total: self.records.len(),
        })
    }

    /// Moves back one record; false (and no move) at the first record.
    pub fn prev(&mut self) -> bool {
        if self.pointer == 0 {
            return false;
        }
        self.pointer -= 1;
        true
    }

    /// Moves forward one record; false (and no move) at the last record.
    pub fn next(&mut self) -> bool {
        if self.pointer + 1 >= self.records.len() {
            return false;
        }
        self.pointer += 1;
        true
    }
}

#[derive(Debug, Default)]
pub enum Mode {
    #[default]
    Idle,
    Running(TestRun),
    Review(Review),
}

#[derive(Debug, Default)]
pub struct Session {
    score: usize,
    total: usize,
    mode: Mode,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Practice score, independent of any test.
    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_running(&self) -> bool {
        matches!(self.mode, Mode::Running(_))
    }

    pub fn record_practice(&mut self, shown: &ShownQuestion, choice: &str) -> bool {
        let correct = shown.question.is_correct(choice);
        self.total += 1;
        if correct {
            self.score += 1;
        }
        correct
    }

    /// Starts a test of `length` questions. Does nothing while a test is
    /// already running; a finished review is discarded.
    pub fn start_test(&mut self, length: usize) -> bool {
        if self.is_running() || length == 0 {
            return false;
        }
        info!(length, "test started");
        self.mode = Mode::Running(TestRun::new(length));
        true
    }

    pub fn test_run(&self) -> Option<&TestRun> {
        match &self.mode {
            Mode::Running(run) => Some(run),
            _ => None,
        }
    }

    pub fn ask(&mut self, shown: ShownQuestion) -> Result<(), SessionError> {
        let Mode::Running(run) = &mut self.mode else {
            return Err(SessionError::NotRunning);
        };
        if run.pending.is_some() {
            return Err(SessionError::QuestionPending);
        }
        run.pending = Some(shown);
        run.question_started = Instant::now();
        Ok(())
    }

    /// Records `choice` for the pending question and reports whether it was
    /// correct.
    pub fn answer(&mut self, choice: &str) -> Result<bool, SessionError> {
        self.record(Outcome::Answered(choice.to_string()))
    }

    pub fn skip(&mut self) -> Result<(), SessionError> {
        self.record(Outcome::Skipped).map(|_| ())
    }

    fn record(&mut self, outcome: Outcome) -> Result<bool, SessionError> {
        let Mode::Running(run) = &mut self.mode else {
            return Err(SessionError::NotRunning);
        };
        let shown = run.pending.take().ok_or(SessionError::NoPendingQuestion)?;
        let record = TestRecord {
            shown,
            outcome,
            elapsed: run.question_started.elapsed(),
        };
        let correct = record.is_correct();
        run.records.push(record);

        if run.records.len() >= run.length {
            if let Mode::Running(run) = std::mem::take(&mut self.mode) {
                let review = run.finish();
                info!(
                    score = review.score(),
                    total = review.len(),
                    skipped = review.skipped(),
                    elapsed_secs = review.elapsed().as_secs(),
                    "test finished"
                );
                self.mode = Mode::Review(review);
            }
        }
        Ok(correct)
    }

    /// Drops a running test without reviewing it.
    pub fn abandon_test(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Mode::Running(mut run) = std::mem::take(&mut self.mode) {
            let elapsed = run.stopwatch.stop();
            info!(answered = run.records.len(), elapsed_secs = elapsed.as_secs(), "test abandoned");
        }
        true
    }

    pub fn review(&self) -> Option<&Review> {
        match &self.mode {
            Mode::Review(review) => Some(review),
            _ => None,
        }
    }

    pub fn current_review(&self) -> Option<ReviewEntry<'_>> {
        self.review().and_then(Review::current)
    }

    pub fn review_prev(&mut self) -> bool {
        match &mut self.mode {
            Mode::Review(review) => review.prev(),
            _ => false,
        }
    }

    pub fn review_next(&mut self) -> bool {
        match &mut self.mode {
            Mode::Review(review) => review.next(),
            _ => false,
        }
    }

    pub fn exit_review(&mut self) -> bool {
        if !matches!(self.mode, Mode::Review(_)) {
            return false;
        }
        self.mode = Mode::Idle;
        true
    }

    /// Score of the test under review.
    pub fn test_score(&self) -> Option<usize> {
        self.review().map(Review::score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{Question, QuestionStyle};
    use pretty_assertions::assert_eq;

    fn shown(n: usize) -> ShownQuestion {
        let options: Vec<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|o| format!("{}{}", o, n))
            .collect();
        ShownQuestion {
            order: options.iter().rev().cloned().collect(),
            question: Question {
                style: QuestionStyle::NameVerb,
                prompt_text: format!("question {}", n),
                hint_text: String::new(),
                correct_option: options[0].clone(),
                options,
                degraded: false,
            },
        }
    }

    fn finished_session(answer: impl Fn(usize) -> Option<&'static str>) -> Session {
        let mut session = Session::new();
        assert!(session.start_test(TEST_LENGTH));
        for n in 0..TEST_LENGTH {
            session.ask(shown(n)).expect("test is running");
            match answer(n) {
                Some(prefix) => {
                    session
                        .answer(&format!("{}{}", prefix, n))
                        .expect("question is pending");
                }
                None => session.skip().expect("question is pending"),
            }
        }
        session
    }

    #[test]
    fn skipping_everything_scores_zero() {
        let session = finished_session(|_| None);
        let review = session.review().expect("test finished");
        assert_eq!(review.len(), TEST_LENGTH);
        assert_eq!(review.score(), 0);
        assert!(review.records().iter().all(TestRecord::is_skipped));
        assert_eq!(session.test_score(), Some(0));
    }

    #[test]
    fn score_counts_correct_answers_only() {
        // Correct on even questions, wrong on every third odd one, else skip.
        let session = finished_session(|n| match n {
            n if n % 2 == 0 => Some("a"),
            n if n % 3 == 0 => Some("c"),
            _ => None,
        });
        let review = session.review().expect("test finished");
        let expected = review
            .records()
            .iter()
            .filter(|r| !r.is_skipped() && r.chosen() == Some(r.shown.question.correct_option.as_str()))
            .count();
        assert_eq!(review.score(), expected);
        assert_eq!(review.score(), 8);
        assert_eq!(review.skipped(), 5);
        assert!(review.score() <= TEST_LENGTH);
    }

    #[test]
    fn review_navigation_stops_at_the_ends() {
        let mut session = finished_session(|_| Some("b"));
        assert!(!session.review_prev());
        assert_eq!(session.current_review().map(|e| e.position), Some(0));

        for _ in 0..TEST_LENGTH - 1 {
            assert!(session.review_next());
        }
        assert!(!session.review_next());
        let last = session.current_review().expect("review has records");
        assert_eq!(last.position, TEST_LENGTH - 1);
        assert_eq!(last.total, TEST_LENGTH);
        assert_eq!(last.record.chosen(), Some("b14"));
        assert!(!last.is_correct());
    }

    #[test]
    fn starting_twice_is_a_no_op() {
        let mut session = Session::new();
        assert!(session.start_test(3));
        session.ask(shown(0)).expect("test is running");
        session.answer("a0").expect("question is pending");
        assert!(!session.start_test(3));
        assert_eq!(session.test_run().map(TestRun::question_number), Some(2));
    }

    #[test]
    fn answering_requires_a_pending_question() {
        let mut session = Session::new();
        assert_eq!(session.answer("a0"), Err(SessionError::NotRunning));
        session.start_test(2);
        assert_eq!(session.skip(), Err(SessionError::NoPendingQuestion));
        session.ask(shown(0)).expect("test is running");
        assert_eq!(session.ask(shown(1)), Err(SessionError::QuestionPending));
        assert_eq!(session.answer("a0"), Ok(true));
    }

    #[test]
    fn exit_and_abandon_return_to_idle() {
        let mut session = finished_session(|_| Some("a"));
        assert!(session.exit_review());
        assert!(matches!(session.mode(), Mode::Idle));
        assert!(!session.exit_review());

        session.start_test(TEST_LENGTH);
        assert!(session.abandon_test());
        assert!(matches!(session.mode(), Mode::Idle));
        assert!(!session.abandon_test());
    }

    #[test]
    fn practice_counters_are_separate_from_tests() {
        let mut session = Session::new();
        assert!(session.record_practice(&shown(0), "a0"));
        assert!(!session.record_practice(&shown(1), "d1"));
        assert_eq!((session.score(), session.total()), (1, 2));
        let _ = finished_session(|_| Some("a"));
        assert_eq!((session.score(), session.total()), (1, 2));
    }

    #[test]
    fn stopwatch_freezes_on_stop() {
        let mut watch = Stopwatch::start();
        let first = watch.stop();
        assert_eq!(watch.stop(), first);
        assert_eq!(watch.elapsed(), first);
    }
}
