//! Exercise catalog repository: unique exercise names, workouts, and the
//! sets that reference both.
//!
//! # Invariants
//! - `exercise_names.name` is unique; duplicates surface as constraint
//!   violations.
//! - A set requires an existing workout and an existing name (`NOT NULL`
//!   foreign keys). A name must be committed before a set can reference it.
//! - Deleting a workout deletes its sets; names are kept.

use crate::db::migrations::Schema;
use crate::model::catalog::{validate_exercise_name, CatalogWorkout, ExerciseName, LoggedSet};
use crate::model::{validate_weight, RowId};
use crate::repo::{ensure_schema_ready, reps_from_db, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for the exercise catalog schema.
pub trait CatalogRepository {
    /// Inserts all names in one transaction, in input order.
    fn add_exercise_names(&self, names: &[&str]) -> RepoResult<Vec<ExerciseName>>;
    fn find_exercise_name(&self, name: &str) -> RepoResult<Option<ExerciseName>>;
    fn list_exercise_names(&self) -> RepoResult<Vec<ExerciseName>>;
    /// Starts a workout; `None` lets the database stamp the current time.
    fn start_workout(&self, started_at: Option<i64>) -> RepoResult<CatalogWorkout>;
    fn log_set(
        &self,
        workout_id: RowId,
        exercise_name_id: RowId,
        weight: f64,
        reps: u32,
    ) -> RepoResult<LoggedSet>;
    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<CatalogWorkout>>;
    /// Deletes a workout; its sets cascade.
    fn delete_workout(&self, workout_id: RowId) -> RepoResult<()>;
}

/// SQLite-backed exercise catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Creates repository from a connection migrated to
    /// `Schema::ExerciseCatalog`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::ExerciseCatalog)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn add_exercise_names(&self, names: &[&str]) -> RepoResult<Vec<ExerciseName>> {
        for name in names {
            validate_exercise_name(name)?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            tx.execute("INSERT INTO exercise_names (name) VALUES (?1);", [name])?;
            created.push(ExerciseName {
                id: tx.last_insert_rowid(),
                name: (*name).to_string(),
            });
        }
        tx.commit()?;
        Ok(created)
    }

    fn find_exercise_name(&self, name: &str) -> RepoResult<Option<ExerciseName>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, name FROM exercise_names WHERE name = ?1;",
                [name],
                parse_name_row,
            )
            .optional()?;
        Ok(found)
    }

    fn list_exercise_names(&self) -> RepoResult<Vec<ExerciseName>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM exercise_names ORDER BY name ASC, id ASC;")?;
        let names = stmt
            .query_map([], parse_name_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn start_workout(&self, started_at: Option<i64>) -> RepoResult<CatalogWorkout> {
        match started_at {
            Some(started_at) => self.conn.execute(
                "INSERT INTO workouts (started_at) VALUES (?1);",
                [started_at],
            )?,
            None => self
                .conn
                .execute("INSERT INTO workouts DEFAULT VALUES;", [])?,
        };
        let workout_id = self.conn.last_insert_rowid();
        self.get_workout(workout_id)?.ok_or(RepoError::NotFound {
            entity: "workout",
            id: workout_id,
        })
    }

    fn log_set(
        &self,
        workout_id: RowId,
        exercise_name_id: RowId,
        weight: f64,
        reps: u32,
    ) -> RepoResult<LoggedSet> {
        validate_weight("exercise.weight", weight)?;
        self.conn.execute(
            "INSERT INTO exercises (weight, reps, workout_id, exercise_name_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![weight, reps, workout_id, exercise_name_id],
        )?;
        let set_id = self.conn.last_insert_rowid();

        let mut stmt = self
            .conn
            .prepare(&format!("{SET_SELECT_SQL} WHERE e.id = ?1;"))?;
        let mut rows = stmt.query([set_id])?;
        if let Some(row) = rows.next()? {
            return parse_set_row(row);
        }
        Err(RepoError::NotFound {
            entity: "exercise",
            id: set_id,
        })
    }

    fn get_workout(&self, workout_id: RowId) -> RepoResult<Option<CatalogWorkout>> {
        let started_at: Option<i64> = self
            .conn
            .query_row(
                "SELECT started_at FROM workouts WHERE id = ?1;",
                [workout_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(started_at) = started_at else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare(&format!("{SET_SELECT_SQL} WHERE e.workout_id = ?1 ORDER BY e.id ASC;"))?;
        let mut rows = stmt.query([workout_id])?;
        let mut sets = Vec::new();
        while let Some(row) = rows.next()? {
            sets.push(parse_set_row(row)?);
        }

        Ok(Some(CatalogWorkout {
            id: workout_id,
            started_at,
            sets,
        }))
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
}

const SET_SELECT_SQL: &str = "SELECT
    e.id AS id,
    e.workout_id AS workout_id,
    e.exercise_name_id AS exercise_name_id,
    n.name AS exercise_name,
    e.weight AS weight,
    e.reps AS reps
FROM exercises e
INNER JOIN exercise_names n ON n.id = e.exercise_name_id";

fn parse_name_row(row: &Row<'_>) -> rusqlite::Result<ExerciseName> {
    Ok(ExerciseName {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_set_row(row: &Row<'_>) -> RepoResult<LoggedSet> {
    Ok(LoggedSet {
        id: row.get("id")?,
        workout_id: row.get("workout_id")?,
        exercise_name_id: row.get("exercise_name_id")?,
        exercise_name: row.get("exercise_name")?,
        weight: row.get("weight")?,
        reps: reps_from_db(row.get("reps")?, "exercises.reps")?,
    })
}
