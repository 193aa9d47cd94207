//! Workout logbook records kept in memory and persisted to the shelf.
//!
//! # Invariants
//! - `LogbookWorkout::id` is stable once created and never reused.
//! - The whole `Logbook` is serialized as one aggregate value.

use super::{format_weight, validate_text, validate_weight, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Exercise names accepted by the interactive logbook.
pub const ALLOWED_EXERCISES: [&str; 3] = ["squat", "bench press", "deadlift"];

/// One exercise entered during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub name: String,
    pub weight: f64,
    pub reps: u32,
}

impl LoggedExercise {
    pub fn new(name: impl Into<String>, weight: f64, reps: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            reps,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_text("logged_exercise.name", &self.name, 80)?;
        validate_weight("logged_exercise.weight", self.weight)
    }
}

/// One interactive session's worth of exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookWorkout {
    pub id: Uuid,
    /// Unix epoch milliseconds.
    pub started_at: i64,
    #[serde(default)]
    pub exercises: Vec<LoggedExercise>,
}

impl LogbookWorkout {
    /// Starts an empty workout stamped with the current time.
    pub fn start() -> Self {
        Self::started_at(now_epoch_ms())
    }

    /// Starts an empty workout with a caller-provided start time.
    pub fn started_at(started_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            exercises: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Sum of `weight * reps` over all exercises.
    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .map(|exercise| exercise.weight * f64::from(exercise.reps))
            .sum()
    }
}

/// Aggregate written back to the shelf as a single value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logbook {
    #[serde(default)]
    pub workouts: Vec<LogbookWorkout>,
}

impl Display for LoggedExercise {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} × {}",
            self.name,
            format_weight(self.weight),
            self.reps
        )
    }
}

impl Display for LogbookWorkout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Workout(started={}, exercises=[", self.started_at)?;
        for (index, exercise) in self.exercises.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{exercise}")?;
        }
        write!(f, "])")
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch report `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Logbook, LogbookWorkout, LoggedExercise};

    #[test]
    fn logbook_survives_json_and_tolerates_missing_lists() {
        let mut workout = LogbookWorkout::started_at(1_700_000_000_000);
        workout
            .exercises
            .push(LoggedExercise::new("squat", 100.0, 5));
        let logbook = Logbook {
            workouts: vec![workout],
        };

        let json = serde_json::to_string(&logbook).expect("logbook should serialize");
        let decoded: Logbook = serde_json::from_str(&json).expect("logbook should parse");
        assert_eq!(decoded, logbook);

        let empty: Logbook = serde_json::from_str("{}").expect("empty object should parse");
        assert!(empty.workouts.is_empty());
    }

    #[test]
    fn display_lists_exercises_in_entry_order() {
        let mut workout = LogbookWorkout::started_at(42);
        workout
            .exercises
            .push(LoggedExercise::new("squat", 100.0, 5));
        workout
            .exercises
            .push(LoggedExercise::new("deadlift", 142.5, 3));

        assert_eq!(
            workout.to_string(),
            "Workout(started=42, exercises=[squat 100 × 5, deadlift 142.5 × 3])"
        );
        assert_eq!(workout.total_volume(), 100.0 * 5.0 + 142.5 * 3.0);
    }
}
