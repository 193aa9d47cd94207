//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data access contract per relationship family.
//! - Isolate SQLite query details from services and demos.
//!
//! # Invariants
//! - Write paths validate models before SQL mutations.
//! - Constraint violations raised by SQLite are propagated unchanged as
//!   `RepoError::Db`; repositories never swallow them.
//! - Repositories refuse connections not migrated to their schema.

use crate::db::migrations::{is_schema_ready, latest_version, Schema};
use crate::db::DbError;
use crate::model::{ModelValidationError, RowId};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog_repo;
pub mod family_repo;
pub mod shelf_repo;
pub mod student_repo;
pub mod training_repo;
pub mod variation_repo;
pub mod workout_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error shared by all relationship repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// Target row does not exist.
    NotFound {
        entity: &'static str,
        id: RowId,
    },
    /// A query that must return exactly one row returned none.
    NoResult {
        entity: &'static str,
    },
    /// A query that must return exactly one row returned several.
    MultipleResults {
        entity: &'static str,
        count: usize,
    },
    /// Connection is not migrated to the schema the repository needs.
    SchemaNotReady {
        expected: Schema,
    },
    InvalidData(String),
}

impl RepoError {
    /// Returns whether SQLite rejected the write because of a declared
    /// constraint (NOT NULL, UNIQUE, FOREIGN KEY, CHECK).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::NoResult { entity } => write!(f, "no {entity} row was found"),
            Self::MultipleResults { entity, count } => {
                write!(f, "expected one {entity} row, found {count}")
            }
            Self::SchemaNotReady { expected } => write!(
                f,
                "repository requires schema `{}` at version {}",
                expected.name(),
                latest_version(*expected)
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::NoResult { .. } => None,
            Self::MultipleResults { .. } => None,
            Self::SchemaNotReady { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_schema_ready(conn: &Connection, schema: Schema) -> RepoResult<()> {
    if is_schema_ready(conn, schema)? {
        return Ok(());
    }
    Err(RepoError::SchemaNotReady { expected: schema })
}

pub(crate) fn reps_from_db(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid reps value `{value}` in {column}")))
}
