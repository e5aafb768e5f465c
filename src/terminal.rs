//! Line-oriented front-end for practice and test mode.
//!
//! Reads one command per line. End of input always counts as `q`.

use crate::quiz::{shuffle_for_display, Generator, QuestionStyle, ShownQuestion};
use crate::session::{ReviewEntry, Session};
use anyhow::Context;
use rand::Rng;
use std::io::{BufRead, Write};

enum Command {
    Choose(usize),
    Next,
    Prev,
    Skip,
    Hint,
    Quit,
    Unknown,
}

fn read_command<R: BufRead>(input: &mut R) -> anyhow::Result<Command> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(Command::Quit);
    }
    let command = match line.trim().to_lowercase().as_str() {
        "" | "n" => Command::Next,
        "p" => Command::Prev,
        "s" => Command::Skip,
        "h" => Command::Hint,
        "q" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Choose(n - 1),
            _ => Command::Unknown,
        },
    };
    Ok(command)
}

fn print_question<W: Write>(output: &mut W, heading: &str, shown: &ShownQuestion) -> anyhow::Result<()> {
    writeln!(output)?;
    writeln!(output, "{}", heading)?;
    if shown.question.degraded {
        writeln!(output, "(placeholder forms in use)")?;
    }
    writeln!(output, "{}", shown.question.prompt_text)?;
    for (i, option) in shown.order.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, option)?;
    }
    Ok(())
}

fn print_review_entry<W: Write>(output: &mut W, entry: &ReviewEntry<'_>) -> anyhow::Result<()> {
    let shown = &entry.record.shown;
    writeln!(output)?;
    writeln!(output, "Review {}/{}", entry.position + 1, entry.total)?;
    writeln!(output, "{}", shown.question.prompt_text)?;
    for (i, option) in shown.order.iter().enumerate() {
        let is_correct = shown.question.is_correct(option);
        let is_chosen = entry.record.chosen() == Some(option.as_str());
        let mark = match (is_chosen, is_correct) {
            (true, true) => "  <- your answer, correct",
            (true, false) => "  <- your answer",
            (false, true) => "  <- correct",
            (false, false) => "",
        };
        writeln!(output, "  {}) {}{}", i + 1, option, mark)?;
    }
    if entry.is_skipped() {
        writeln!(output, "Skipped")?;
    }
    writeln!(output, "Time: {}s", entry.record.elapsed.as_secs())?;
    writeln!(output, "[p] previous  [n] next  [q] done")?;
    Ok(())
}

/// Untimed practice until the user quits. Answers update the session's
/// practice score.
pub fn run_practice<R, W, G>(
    input: &mut R,
    output: &mut W,
    generator: &Generator<'_>,
    session: &mut Session,
    rng: &mut G,
    styles: &[QuestionStyle],
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    'questions: loop {
        let question = generator.random_question(rng, styles);
        let shown = shuffle_for_display(rng, question);
        print_question(output, &format!("[{}]", shown.question.style), &shown)?;

        loop {
            write!(output, "> ")?;
            output.flush()?;
            match read_command(input)? {
                Command::Choose(position) => {
                    let Some(choice) = shown.option_at(position) else {
                        writeln!(output, "Choose 1-{}.", shown.order.len())?;
                        continue;
                    };
                    if session.record_practice(&shown, choice) {
                        writeln!(output, "Correct!")?;
                    } else {
                        writeln!(output, "Wrong. Answer: {}", shown.question.correct_option)?;
                    }
                    writeln!(output, "Score: {}/{}", session.score(), session.total())?;
                    write!(output, "[enter] next  [q] quit > ")?;
                    output.flush()?;
                    match read_command(input)? {
                        Command::Quit => break 'questions,
                        _ => continue 'questions,
                    }
                }
                Command::Hint => writeln!(output, "{}", shown.question.hint_text)?,
                Command::Next | Command::Skip => continue 'questions,
                Command::Quit => break 'questions,
                Command::Prev | Command::Unknown => {
                    writeln!(output, "Enter 1-4, h for a hint, n for the next question, q to quit.")?
                }
            }
        }
    }
    writeln!(output, "Score: {}/{}", session.score(), session.total())?;
    Ok(())
}

/// One timed test of `length` questions followed by review. Returns the
/// score, or `None` when the test was quit before the end.
pub fn run_test<R, W, G>(
    input: &mut R,
    output: &mut W,
    generator: &Generator<'_>,
    session: &mut Session,
    rng: &mut G,
    styles: &[QuestionStyle],
    length: usize,
) -> anyhow::Result<Option<usize>>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    if !session.start_test(length) {
        writeln!(output, "A test is already running.")?;
        return Ok(None);
    }

    while let Some(run) = session.test_run() {
        let heading = format!(
            "Question {}/{}  [{}s]",
            run.question_number(),
            run.length(),
            run.elapsed().as_secs()
        );
        let question = generator.random_question(rng, styles);
        let shown = shuffle_for_display(rng, question);
        print_question(output, &heading, &shown)?;
        session.ask(shown.clone())?;

        loop {
            write!(output, "[1-4] answer  [s] skip  [h] hint  [q] quit > ")?;
            output.flush()?;
            match read_command(input)? {
                Command::Choose(position) => match shown.option_at(position) {
                    Some(choice) => {
                        session.answer(choice)?;
                        break;
                    }
                    None => writeln!(output, "Choose 1-{}.", shown.order.len())?,
                },
                Command::Skip => {
                    session.skip()?;
                    break;
                }
                Command::Hint => writeln!(output, "{}", shown.question.hint_text)?,
                Command::Quit => {
                    session.abandon_test();
                    writeln!(output, "Test abandoned.")?;
                    return Ok(None);
                }
                Command::Next | Command::Prev | Command::Unknown => {
                    writeln!(output, "Enter 1-4 to answer or s to skip.")?
                }
            }
        }
    }

    let Some(review) = session.review() else {
        return Ok(None);
    };
    let score = review.score();
    writeln!(output)?;
    writeln!(
        output,
        "Test finished in {}s. Score: {}/{} ({} skipped)",
        review.elapsed().as_secs(),
        score,
        review.len(),
        review.skipped()
    )?;

    let mut moved = true;
    while let Some(entry) = session.current_review() {
        if moved {
            print_review_entry(output, &entry)?;
        }
        write!(output, "> ")?;
        output.flush()?;
        match read_command(input)? {
            Command::Prev => moved = session.review_prev(),
            Command::Next => moved = session.review_next(),
            Command::Quit => break,
            _ => {
                moved = false;
                writeln!(output, "Enter p for the previous question, n for the next, q to finish.")?;
                continue;
            }
        }
        if !moved {
            writeln!(output, "No more questions in that direction.")?;
        }
    }
    session.exit_review();
    Ok(Some(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjugation::{Oracle, SoundVerbEngine};
    use crate::session::{Mode, TEST_LENGTH};
    use crate::vocabulary::sample_verbs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn run_with_input(
        script: &str,
        test_length: Option<usize>,
    ) -> (String, Session, Option<usize>) {
        let oracle = Oracle::new(Box::new(SoundVerbEngine::new()));
        let verbs = sample_verbs();
        let generator = Generator::new(&oracle, &verbs).expect("vocabulary is not empty");
        let mut session = Session::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let score = match test_length {
            Some(length) => run_test(
                &mut input,
                &mut output,
                &generator,
                &mut session,
                &mut rng,
                &QuestionStyle::ALL,
                length,
            )
            .expect("in-memory io does not fail"),
            None => {
                run_practice(
                    &mut input,
                    &mut output,
                    &generator,
                    &mut session,
                    &mut rng,
                    &QuestionStyle::ALL,
                )
                .expect("in-memory io does not fail");
                None
            }
        };
        let text = String::from_utf8(output).expect("output is utf-8");
        (text, session, score)
    }

    #[test]
    fn skipped_test_scores_zero_and_reviews() {
        let script = format!("{}p\nn\nq\n", "s\n".repeat(TEST_LENGTH));
        let (text, session, score) = run_with_input(&script, Some(TEST_LENGTH));
        assert_eq!(score, Some(0));
        assert!(text.contains("Score: 0/15 (15 skipped)"));
        assert!(text.contains("Review 1/15"));
        assert!(text.contains("Review 2/15"));
        assert!(text.contains("No more questions in that direction."));
        assert!(text.contains("Skipped"));
        assert!(matches!(session.mode(), Mode::Idle));
    }

    #[test]
    fn quitting_mid_test_abandons_it() {
        let (text, session, score) = run_with_input("1\nq\n", Some(TEST_LENGTH));
        assert_eq!(score, None);
        assert!(text.contains("Question 2/15"));
        assert!(text.contains("Test abandoned."));
        assert!(matches!(session.mode(), Mode::Idle));
    }

    #[test]
    fn review_explains_unknown_commands() {
        let script = format!("{}h\n3\nq\n", "s\n".repeat(2));
        let (text, _, score) = run_with_input(&script, Some(2));
        assert_eq!(score, Some(0));
        assert_eq!(
            text.matches("Enter p for the previous question, n for the next, q to finish.")
                .count(),
            2
        );
        assert!(text.contains("Time: 0s"));
        assert_eq!(text.matches("Review 1/2").count(), 1);
        assert!(!text.contains("No more questions in that direction."));
    }

    #[test]
    fn end_of_input_during_review_finishes() {
        let (text, _, score) = run_with_input("1\n2\n", Some(2));
        assert!(score.is_some_and(|s| s <= 2));
        assert!(text.contains("Review 1/2"));
    }

    #[test]
    fn practice_counts_answers_until_quit() {
        let (text, session, _) = run_with_input("h\nn\n9\n1\n\n2\nq\n", None);
        assert_eq!(session.total(), 2);
        assert!(text.contains("Choose 1-4."));
        assert!(text.contains(&format!("Score: {}/2", session.score())));
    }

    #[test]
    fn practice_stops_at_end_of_input() {
        let (text, session, _) = run_with_input("", None);
        assert_eq!(session.total(), 0);
        assert!(text.trim_end().ends_with("Score: 0/0"));
    }
}
