//*** START FILE: src/main.rs ***//
use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use sarf_quiz::config::{self, Config, EngineChoice};
use sarf_quiz::pronouns::PRONOUNS;
use sarf_quiz::terminal::{run_practice, run_test};
use sarf_quiz::{Generator, Oracle, Question, QuestionStyle, Session, SoundVerbEngine};

/// Multiple-choice drills on Arabic verb conjugation.
#[derive(Debug, Parser)]
#[command(name = "sarf_quiz", version)]
struct Cli {
    /// Configuration file (defaults to ./sarf_quiz.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible question sequences.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Run without a conjugation engine; every form is a placeholder.
    #[arg(long, global = true)]
    no_engine: bool,

    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Untimed practice with a running score.
    Practice {
        /// Restrict to these styles (number 1-5 or name). Repeatable.
        #[arg(long = "style")]
        styles: Vec<QuestionStyle>,
    },
    /// Timed test followed by review.
    Test {
        /// Number of questions (overrides the configuration).
        #[arg(long)]
        length: Option<usize>,
    },
    /// Print generated questions without asking them.
    Generate {
        #[arg(long, default_value_t = 5)]
        count: usize,
        #[arg(long = "style")]
        styles: Vec<QuestionStyle>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the pronoun table.
    Pronouns,
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SARF_QUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn build_oracle(config: &Config, no_engine: bool) -> Oracle {
    if no_engine || config.engine == EngineChoice::None {
        Oracle::unavailable()
    } else {
        Oracle::new(Box::new(SoundVerbEngine::new()))
    }
}

fn pick_styles(requested: Vec<QuestionStyle>, config: &Config) -> Vec<QuestionStyle> {
    if requested.is_empty() {
        config.styles.clone()
    } else {
        requested
    }
}

fn print_question(out: &mut impl Write, n: usize, question: &Question) -> io::Result<()> {
    writeln!(out, "#{} [{}]{}", n, question.style, if question.degraded { " (degraded)" } else { "" })?;
    writeln!(out, "{}", question.prompt_text)?;
    writeln!(out, "hint: {}", question.hint_text)?;
    for option in &question.options {
        let mark = if question.is_correct(option) { "*" } else { " " };
        writeln!(out, " {} {}", mark, option)?;
    }
    writeln!(out)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config_from_file(cli.config.as_deref())
        .context("failed to load configuration")?;
    let oracle = build_oracle(&config, cli.no_engine);
    let generator = Generator::new(&oracle, &config.verbs)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    match cli.command {
        Commands::Practice { styles } => {
            let styles = pick_styles(styles, &config);
            let mut session = Session::new();
            run_practice(&mut input, &mut output, &generator, &mut session, &mut rng, &styles)?;
        }
        Commands::Test { length } => {
            let length = length.unwrap_or(config.test_length);
            anyhow::ensure!(length > 0, "test length must be at least 1");
            let mut session = Session::new();
            run_test(
                &mut input,
                &mut output,
                &generator,
                &mut session,
                &mut rng,
                &config.styles,
                length,
            )?;
        }
        Commands::Generate { count, styles, json } => {
            let styles = pick_styles(styles, &config);
            let questions: Vec<Question> = (0..count)
                .map(|_| generator.random_question(&mut rng, &styles))
                .collect();
            if json {
                serde_json::to_writer_pretty(&mut output, &questions)
                    .context("failed to serialize questions")?;
                writeln!(output)?;
            } else {
                for (i, question) in questions.iter().enumerate() {
                    print_question(&mut output, i + 1, question)?;
                }
            }
        }
        Commands::Pronouns => {
            for slot in &PRONOUNS {
                writeln!(output, "{:>2}  {:<16} {}", slot.index, slot.label, slot.display_form)?;
            }
        }
    }

    if oracle.fallback_count() > 0 {
        tracing::warn!(fallbacks = oracle.fallback_count(), "some forms were placeholders");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("{error:#}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

//*** END FILE: src/main.rs ***//
