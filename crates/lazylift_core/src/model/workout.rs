//! Workout and exercise records.
//!
//! Shared by the one-to-many schema (each exercise belongs to exactly one
//! workout) and the many-to-many schema (exercises are linked to workouts
//! through a join table).

use super::{format_weight, validate_text, validate_weight, ModelValidationError, RowId};
use std::fmt::{Display, Formatter};

/// Column limit for workout and exercise names.
pub const NAME_MAX_CHARS: usize = 80;

/// Persisted workout with its loaded exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: RowId,
    pub name: String,
    /// Unix epoch milliseconds, defaulted by the database on insert.
    pub started_at: i64,
    /// Ordered by insertion.
    pub exercises: Vec<Exercise>,
}

/// Persisted exercise row.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: RowId,
    pub name: String,
    pub weight_kg: f64,
    pub reps: u32,
}

/// Exercise values before the row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub weight_kg: f64,
    pub reps: u32,
}

impl NewExercise {
    pub fn new(name: impl Into<String>, weight_kg: f64, reps: u32) -> Self {
        Self {
            name: name.into(),
            weight_kg,
            reps,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_text("exercise.name", &self.name, NAME_MAX_CHARS)?;
        validate_weight("exercise.weight_kg", self.weight_kg)
    }
}

/// Validates a workout name before insert.
pub fn validate_workout_name(name: &str) -> Result<(), ModelValidationError> {
    validate_text("workout.name", name, NAME_MAX_CHARS)
}

impl Display for Workout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Workout id={} name='{}' exercises={}>",
            self.id,
            self.name,
            self.exercises.len()
        )
    }
}

impl Display for Exercise {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Exercise id={} {} {} kg × {} reps>",
            self.id,
            self.name,
            format_weight(self.weight_kg),
            self.reps
        )
    }
}
