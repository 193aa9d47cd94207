//! One-to-many workout repository with cascade delete-orphan.
//!
//! # Responsibility
//! - Persist a workout together with the exercises it owns.
//! - Load both ends of the relationship in one call.
//!
//! # Invariants
//! - Every exercise row references exactly one workout (`NOT NULL` FK).
//! - Detaching an exercise from its workout deletes the row (orphan rule).
//! - Deleting a workout deletes its exercises (`ON DELETE CASCADE`).

use crate::db::migrations::Schema;
use crate::model::workout::{validate_workout_name, Exercise, NewExercise, Workout};
use crate::model::RowId;
use crate::repo::{ensure_schema_ready, reps_from_db, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for the one-to-many workout schema.
pub trait WorkoutRepository {
    /// Inserts a workout and all its exercises in one transaction.
    fn create_workout(&self, name: &str, exercises: &[NewExercise]) -> RepoResult<Workout>;
    /// Loads a workout and its exercises ordered by id.
    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<Workout>>;
    /// Appends one exercise to an existing workout.
    fn add_exercise(&self, workout_id: RowId, exercise: &NewExercise) -> RepoResult<Exercise>;
    /// Loads one exercise by id.
    fn get_exercise(&self, exercise_id: RowId) -> RepoResult<Option<Exercise>>;
    /// Removes an exercise from its workout; the orphaned row is deleted.
    fn detach_exercise(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<()>;
    /// Deletes a workout; its exercises cascade.
    fn delete_workout(&self, workout_id: RowId) -> RepoResult<()>;
    /// Counts exercise rows across all workouts.
    fn count_exercises(&self) -> RepoResult<u64>;
}

/// SQLite-backed one-to-many workout repository.
pub struct SqliteWorkoutRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkoutRepository<'conn> {
    /// Creates repository from a connection migrated to `Schema::OneToMany`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::OneToMany)?;
        Ok(Self { conn })
    }
}

impl WorkoutRepository for SqliteWorkoutRepository<'_> {
    fn create_workout(&self, name: &str, exercises: &[NewExercise]) -> RepoResult<Workout> {
        validate_workout_name(name)?;
        for exercise in exercises {
            exercise.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("INSERT INTO workouts (name) VALUES (?1);", [name])?;
        let workout_id = tx.last_insert_rowid();
        for exercise in exercises {
            insert_exercise(&tx, workout_id, exercise)?;
        }
        tx.commit()?;

        self.get_workout(workout_id)?.ok_or(RepoError::NotFound {
            entity: "workout",
            id: workout_id,
        })
    }

    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<Workout>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, name, started_at FROM workouts WHERE id = ?1;",
                [workout_id],
                |row| {
                    Ok((
                        row.get::<_, RowId>("id")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, i64>("started_at")?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, started_at)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, name, weight_kg, reps
             FROM exercises
             WHERE workout_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut exercises = Vec::new();
        while let Some(row) = rows.next()? {
            exercises.push(parse_exercise_row(row)?);
        }

        Ok(Some(Workout {
            id,
            name,
            started_at,
            exercises,
        }))
    }

    fn add_exercise(&self, workout_id: RowId, exercise: &NewExercise) -> RepoResult<Exercise> {
        exercise.validate()?;
        if !workout_exists(self.conn, workout_id)? {
            return Err(RepoError::NotFound {
                entity: "workout",
                id: workout_id,
            });
        }

        let exercise_id = insert_exercise(self.conn, workout_id, exercise)?;
        self.get_exercise(exercise_id)?.ok_or(RepoError::NotFound {
            entity: "exercise",
            id: exercise_id,
        })
    }

    fn get_exercise(&self, exercise_id: RowId) -> RepoResult<Option<Exercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, weight_kg, reps
             FROM exercises
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([exercise_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_exercise_row(row)?));
        }
        Ok(None)
    }

    fn detach_exercise(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM exercises WHERE id = ?1 AND workout_id = ?2;",
            params![exercise_id, workout_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "exercise",
                id: exercise_id,
            });
        }
        Ok(())
    }

    fn delete_workout(&self, workout_id: RowId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM workouts WHERE id = ?1;", [workout_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "workout",
                id: workout_id,
            });
        }
        Ok(())
    }

    fn count_exercises(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exercises;", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

fn insert_exercise(
    conn: &Connection,
    workout_id: RowId,
    exercise: &NewExercise,
) -> RepoResult<RowId> {
    conn.execute(
        "INSERT INTO exercises (name, weight_kg, reps, workout_id)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            exercise.name.as_str(),
            exercise.weight_kg,
            exercise.reps,
            workout_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn workout_exists(conn: &Connection, workout_id: RowId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = ?1);",
        [workout_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_exercise_row(row: &Row<'_>) -> RepoResult<Exercise> {
    Ok(Exercise {
        id: row.get("id")?,
        name: row.get("name")?,
        weight_kg: row.get("weight_kg")?,
        reps: reps_from_db(row.get("reps")?, "exercises.reps")?,
    })
}
