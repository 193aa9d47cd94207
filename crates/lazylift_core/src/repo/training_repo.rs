//! Many-to-many workout/exercise repository over the `workout_exercise`
//! join table.
//!
//! # Invariants
//! - A (workout, exercise) pair is linked at most once (composite key).
//! - Exercises of a workout are listed in link order (`position`, then id).
//! - Deleting a workout removes its links; linked exercises survive.

use crate::db::migrations::Schema;
use crate::model::workout::{validate_workout_name, Exercise, NewExercise, Workout};
use crate::model::RowId;
use crate::repo::{ensure_schema_ready, reps_from_db, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Workout header without its exercise list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub id: RowId,
    pub name: String,
    pub started_at: i64,
}

/// Repository interface for the many-to-many workout schema.
pub trait TrainingRepository {
    /// Creates a workout, inserts `exercises` and links them in order.
    fn create_workout(&self, name: &str, exercises: &[NewExercise]) -> RepoResult<Workout>;
    /// Creates an exercise not yet linked to any workout.
    fn create_exercise(&self, exercise: &NewExercise) -> RepoResult<Exercise>;
    /// Links an exercise to a workout; linking twice is a no-op.
    fn link(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<()>;
    /// Removes a link; returns whether one existed.
    fn unlink(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<bool>;
    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<Workout>>;
    fn list_exercises_for_workout(&self, workout_id: RowId) -> RepoResult<Vec<Exercise>>;
    fn list_workouts_for_exercise(&self, exercise_id: RowId) -> RepoResult<Vec<WorkoutSummary>>;
    /// Deletes a workout and its links; exercises are kept.
    fn delete_workout(&self, workout_id: RowId) -> RepoResult<()>;
}

/// SQLite-backed many-to-many repository.
pub struct SqliteTrainingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrainingRepository<'conn> {
    /// Creates repository from a connection migrated to `Schema::ManyToMany`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::ManyToMany)?;
        Ok(Self { conn })
    }
}

impl TrainingRepository for SqliteTrainingRepository<'_> {
    fn create_workout(&self, name: &str, exercises: &[NewExercise]) -> RepoResult<Workout> {
        validate_workout_name(name)?;
        for exercise in exercises {
            exercise.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("INSERT INTO workouts (name) VALUES (?1);", [name])?;
        let workout_id = tx.last_insert_rowid();
        for exercise in exercises {
            let exercise_id = insert_exercise(&tx, exercise)?;
            insert_link(&tx, workout_id, exercise_id)?;
        }
        tx.commit()?;

        self.get_workout(workout_id)?.ok_or(RepoError::NotFound {
            entity: "workout",
            id: workout_id,
        })
    }

    fn create_exercise(&self, exercise: &NewExercise) -> RepoResult<Exercise> {
        exercise.validate()?;
        let id = insert_exercise(self.conn, exercise)?;
        Ok(Exercise {
            id,
            name: exercise.name.clone(),
            weight_kg: exercise.weight_kg,
            reps: exercise.reps,
        })
    }

    fn link(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<()> {
        let already_linked: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM workout_exercise
                WHERE workout_id = ?1 AND exercise_id = ?2
            );",
            params![workout_id, exercise_id],
            |row| row.get(0),
        )?;
        if already_linked == 1 {
            return Ok(());
        }
        insert_link(self.conn, workout_id, exercise_id)
    }

    fn unlink(&self, workout_id: RowId, exercise_id: RowId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM workout_exercise WHERE workout_id = ?1 AND exercise_id = ?2;",
            params![workout_id, exercise_id],
        )?;
        Ok(changed > 0)
    }

    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<Workout>> {
        let summary = self
            .conn
            .query_row(
                "SELECT id, name, started_at FROM workouts WHERE id = ?1;",
                [workout_id],
                parse_summary_row,
            )
            .optional()?;

        let Some(summary) = summary else {
            return Ok(None);
        };
        let exercises = self.list_exercises_for_workout(summary.id)?;
        Ok(Some(Workout {
            id: summary.id,
            name: summary.name,
            started_at: summary.started_at,
            exercises,
        }))
    }

    fn list_exercises_for_workout(&self, workout_id: RowId) -> RepoResult<Vec<Exercise>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id AS id, e.name AS name, e.weight_kg AS weight_kg, e.reps AS reps
             FROM workout_exercise we
             INNER JOIN exercises e ON e.id = we.exercise_id
             WHERE we.workout_id = ?1
             ORDER BY we.position ASC, e.id ASC;",
        )?;
        let mut rows = stmt.query([workout_id])?;
        let mut exercises = Vec::new();
        while let Some(row) = rows.next()? {
            exercises.push(parse_exercise_row(row)?);
        }
        Ok(exercises)
    }

    fn list_workouts_for_exercise(&self, exercise_id: RowId) -> RepoResult<Vec<WorkoutSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.id AS id, w.name AS name, w.started_at AS started_at
             FROM workout_exercise we
             INNER JOIN workouts w ON w.id = we.workout_id
             WHERE we.exercise_id = ?1
             ORDER BY w.id ASC;",
        )?;
        let workouts = stmt
            .query_map([exercise_id], parse_summary_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(workouts)
    }

    fn delete_workout(&self, workout_id: RowId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM workout_exercise WHERE workout_id = ?1;",
            [workout_id],
        )?;
        let changed = tx.execute("DELETE FROM workouts WHERE id = ?1;", [workout_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "workout",
                id: workout_id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_exercise(conn: &Connection, exercise: &NewExercise) -> RepoResult<RowId> {
    conn.execute(
        "INSERT INTO exercises (name, weight_kg, reps) VALUES (?1, ?2, ?3);",
        params![exercise.name.as_str(), exercise.weight_kg, exercise.reps],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_link(conn: &Connection, workout_id: RowId, exercise_id: RowId) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO workout_exercise (workout_id, exercise_id, position)
         VALUES (
            ?1,
            ?2,
            (SELECT COALESCE(MAX(position) + 1, 0) FROM workout_exercise WHERE workout_id = ?1)
         );",
        params![workout_id, exercise_id],
    )?;
    Ok(())
}

fn parse_summary_row(row: &Row<'_>) -> rusqlite::Result<WorkoutSummary> {
    Ok(WorkoutSummary {
        id: row.get("id")?,
        name: row.get("name")?,
        started_at: row.get("started_at")?,
    })
}

fn parse_exercise_row(row: &Row<'_>) -> RepoResult<Exercise> {
    Ok(Exercise {
        id: row.get("id")?,
        name: row.get("name")?,
        weight_kg: row.get("weight_kg")?,
        reps: reps_from_db(row.get("reps")?, "exercises.reps")?,
    })
}
