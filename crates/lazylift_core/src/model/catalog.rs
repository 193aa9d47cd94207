//! Exercise catalog records: named exercises referenced by logged sets.

use super::{format_weight, validate_text, ModelValidationError, RowId};
use std::fmt::{Display, Formatter};

pub const EXERCISE_NAME_MAX_CHARS: usize = 80;

/// Unique exercise name in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseName {
    pub id: RowId,
    pub name: String,
}

/// Workout holding the sets logged against catalog names.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogWorkout {
    pub id: RowId,
    pub started_at: i64,
    pub sets: Vec<LoggedSet>,
}

/// One `exercises` row joined with its catalog name.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub id: RowId,
    pub workout_id: RowId,
    pub exercise_name_id: RowId,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
}

pub fn validate_exercise_name(name: &str) -> Result<(), ModelValidationError> {
    validate_text("exercise_name.name", name, EXERCISE_NAME_MAX_CHARS)
}

impl Display for ExerciseName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ExerciseName id={} {}>", self.id, self.name)
    }
}

impl Display for CatalogWorkout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Workout id={} sets={}>", self.id, self.sets.len())
    }
}

impl Display for LoggedSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Exercise id={} {} {} × {}>",
            self.id,
            self.exercise_name,
            format_weight(self.weight),
            self.reps
        )
    }
}
