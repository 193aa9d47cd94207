//! Interactive workout recording loop.
//!
//! # Responsibility
//! - Ask for exercise name, weight and reps until the user stops.
//! - Validate names against `ALLOWED_EXERCISES`.
//!
//! # Invariants
//! - Empty input, the exact word `quit`, or end of input at the name prompt
//!   ends the loop.
//! - Strict mode: an unknown name ends the session with
//!   `SessionError::UnknownExercise`; nothing is retried.
//! - Abbreviated mode: unknown or ambiguous names are asked again.
//! - Weight/reps that do not parse end the session with an error.

use super::abbrev::prompt_abbreviated;
use super::prompt::Prompter;
use crate::model::logbook::{LogbookWorkout, LoggedExercise, ALLOWED_EXERCISES};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const NAME_PROMPT: &str = "exercise name? ";
const WEIGHT_PROMPT: &str = "weight? ";
const REPS_PROMPT: &str = "reps? ";
const STOP_WORDS: [&str; 2] = ["", "quit"];

/// How exercise names are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMode {
    /// Full name required; an unknown name aborts the session.
    #[default]
    Strict,
    /// Any unique prefix is accepted; otherwise the prompt repeats.
    Abbreviated,
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    /// Name is not in the allow-list (strict mode only).
    UnknownExercise(String),
    /// Numeric answer could not be parsed or is out of range.
    InvalidNumber {
        field: &'static str,
        input: String,
    },
    /// Input ended while a weight or reps answer was pending.
    UnexpectedEof {
        field: &'static str,
    },
    Io(io::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownExercise(name) => write!(
                f,
                "unknown exercise `{name}`; expected one of: {}",
                ALLOWED_EXERCISES.join(", ")
            ),
            Self::InvalidNumber { field, input } => write!(f, "invalid {field} `{input}`"),
            Self::UnexpectedEof { field } => write!(f, "input ended before {field} was given"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs one recording session and returns the collected workout.
pub fn record_workout<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    mode: NameMode,
) -> SessionResult<LogbookWorkout> {
    let mut workout = LogbookWorkout::start();

    while let Some(name) = read_exercise_name(prompter, mode)? {
        let weight: f64 = read_number(prompter, WEIGHT_PROMPT, "weight")?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(SessionError::InvalidNumber {
                field: "weight",
                input: weight.to_string(),
            });
        }
        let reps: u32 = read_number(prompter, REPS_PROMPT, "reps")?;

        info!(
            "event=logbook_entry module=logbook status=ok index={}",
            workout.exercises.len()
        );
        workout
            .exercises
            .push(LoggedExercise::new(name, weight, reps));
    }

    Ok(workout)
}

fn read_exercise_name<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    mode: NameMode,
) -> SessionResult<Option<&'static str>> {
    match mode {
        NameMode::Abbreviated => Ok(prompt_abbreviated(
            prompter,
            NAME_PROMPT,
            &ALLOWED_EXERCISES,
            &STOP_WORDS,
        )?),
        NameMode::Strict => {
            let Some(line) = prompter.ask(NAME_PROMPT)? else {
                return Ok(None);
            };
            let name = line.trim();
            if STOP_WORDS.iter().any(|word| *word == name) {
                return Ok(None);
            }
            ALLOWED_EXERCISES
                .iter()
                .copied()
                .find(|allowed| allowed.eq_ignore_ascii_case(name))
                .map(Some)
                .ok_or_else(|| SessionError::UnknownExercise(name.to_string()))
        }
    }
}

fn read_number<T: FromStr, R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    prompt: &str,
    field: &'static str,
) -> SessionResult<T> {
    let line = prompter
        .ask(prompt)?
        .ok_or(SessionError::UnexpectedEof { field })?;
    let trimmed = line.trim();
    trimmed.parse().map_err(|_| SessionError::InvalidNumber {
        field,
        input: trimmed.to_string(),
    })
}
