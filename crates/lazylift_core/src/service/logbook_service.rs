//! Logbook use-case service.
//!
//! # Responsibility
//! - Load the logbook aggregate from the shelf.
//! - Append finished workouts and write the aggregate back as one value.
//!
//! # Invariants
//! - The logbook lives under a single shelf key (`LOGBOOK_KEY`).
//! - Empty workouts are never persisted.
//! - Workouts keep insertion order.

use crate::model::logbook::{Logbook, LogbookWorkout};
use crate::model::ModelValidationError;
use crate::repo::shelf_repo::ShelfRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shelf key holding the whole logbook.
pub const LOGBOOK_KEY: &str = "logbook";

pub type LogbookServiceResult<T> = Result<T, LogbookServiceError>;

/// Service error for logbook use-cases.
#[derive(Debug)]
pub enum LogbookServiceError {
    /// Workout has no exercises to record.
    EmptyWorkout,
    /// One exercise failed validation.
    Validation(ModelValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for LogbookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkout => write!(f, "workout has no exercises"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LogbookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyWorkout => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for LogbookServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ModelValidationError> for LogbookServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Use-case service over a shelf-backed logbook.
pub struct LogbookService<S: ShelfRepository> {
    shelf: S,
}

impl<S: ShelfRepository> LogbookService<S> {
    pub fn new(shelf: S) -> Self {
        Self { shelf }
    }

    /// Loads the logbook; a shelf without one yields an empty logbook.
    pub fn load(&self) -> LogbookServiceResult<Logbook> {
        Ok(self
            .shelf
            .load::<Logbook>(LOGBOOK_KEY)?
            .unwrap_or_default())
    }

    /// Appends `workout` and writes the whole logbook back.
    ///
    /// Returns the number of workouts stored after the write.
    pub fn record_workout(&self, workout: LogbookWorkout) -> LogbookServiceResult<usize> {
        if workout.is_empty() {
            return Err(LogbookServiceError::EmptyWorkout);
        }
        for exercise in &workout.exercises {
            exercise.validate()?;
        }

        let mut logbook = self.load()?;
        let exercise_count = workout.exercises.len();
        logbook.workouts.push(workout);
        self.shelf.store(LOGBOOK_KEY, &logbook)?;

        info!(
            "event=logbook_save module=service status=ok workouts={} exercises={}",
            logbook.workouts.len(),
            exercise_count
        );
        Ok(logbook.workouts.len())
    }

    /// Lists stored workouts in recording order.
    pub fn list_workouts(&self) -> LogbookServiceResult<Vec<LogbookWorkout>> {
        Ok(self.load()?.workouts)
    }
}
