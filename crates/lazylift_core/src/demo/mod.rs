//! Relationship demos.
//!
//! # Responsibility
//! - Run one self-contained walkthrough per relationship kind: open a fresh
//!   in-memory database, insert sample rows, query, and print.
//!
//! # Invariants
//! - Every demo owns its connection; nothing is shared between demos.
//! - Output is deterministic for a given demo.

use crate::db::{open_db_in_memory_with, DbError, DbOpenOptions, Schema};
use crate::repo::RepoError;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::time::Instant;

mod family;
mod students;
mod workouts;

pub use family::{nullable_many_to_one, parent_child};
pub use students::{one_to_one, one_to_one_linked};
pub use workouts::{exercise_catalog, many_to_many, one_to_many, self_referential};

pub type DemoResult<T> = Result<T, DemoError>;

#[derive(Debug)]
pub enum DemoError {
    Db(DbError),
    Repo(RepoError),
    Io(io::Error),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for DemoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for DemoError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for DemoError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Options shared by every demo run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoOptions {
    /// Log every SQL statement the demo executes.
    pub echo_sql: bool,
}

/// Available demos, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoKind {
    OneToMany,
    ParentChild,
    NullableManyToOne,
    OneToOne,
    OneToOneLinked,
    ManyToMany,
    ExerciseCatalog,
    SelfReferential,
}

impl DemoKind {
    pub const ALL: [DemoKind; 8] = [
        DemoKind::OneToMany,
        DemoKind::ParentChild,
        DemoKind::NullableManyToOne,
        DemoKind::OneToOne,
        DemoKind::OneToOneLinked,
        DemoKind::ManyToMany,
        DemoKind::ExerciseCatalog,
        DemoKind::SelfReferential,
    ];

    /// Schema the demo runs against.
    pub fn schema(self) -> Schema {
        match self {
            Self::OneToMany => Schema::OneToMany,
            Self::ParentChild => Schema::ParentChild,
            Self::NullableManyToOne => Schema::NullableManyToOne,
            Self::OneToOne => Schema::OneToOne,
            Self::OneToOneLinked => Schema::OneToOneLinked,
            Self::ManyToMany => Schema::ManyToMany,
            Self::ExerciseCatalog => Schema::ExerciseCatalog,
            Self::SelfReferential => Schema::SelfReferential,
        }
    }

    /// One-line description shown before the demo output.
    pub fn title(self) -> &'static str {
        match self {
            Self::OneToMany => "one-to-many: workout owns exercises (cascade delete-orphan)",
            Self::ParentChild => "one-to-many: parent with required child links",
            Self::NullableManyToOne => "many-to-one: parents with an optional shared child",
            Self::OneToOne => "one-to-one: address holds the student key",
            Self::OneToOneLinked => "one-to-one: student and address point at each other",
            Self::ManyToMany => "many-to-many: workouts and exercises via a join table",
            Self::ExerciseCatalog => "catalog: exercises reference a workout and a unique name",
            Self::SelfReferential => "self-referential: exercise variations form a tree",
        }
    }
}

/// Runs one demo, writing its output to `out`.
pub fn run_demo(kind: DemoKind, options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let started_at = Instant::now();
    let schema = kind.schema().name();
    info!("event=demo_run module=demo status=start demo={schema}");

    let result = match kind {
        DemoKind::OneToMany => one_to_many(options, out),
        DemoKind::ParentChild => parent_child(options, out),
        DemoKind::NullableManyToOne => nullable_many_to_one(options, out),
        DemoKind::OneToOne => one_to_one(options, out),
        DemoKind::OneToOneLinked => one_to_one_linked(options, out),
        DemoKind::ManyToMany => many_to_many(options, out),
        DemoKind::ExerciseCatalog => exercise_catalog(options, out),
        DemoKind::SelfReferential => self_referential(options, out),
    };

    match &result {
        Ok(()) => info!(
            "event=demo_run module=demo status=ok demo={schema} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=demo_run module=demo status=error demo={schema} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Runs every demo in presentation order, each under a `== title ==` header.
///
/// Stops at the first failing demo.
pub fn run_all(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    for (index, kind) in DemoKind::ALL.into_iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "== {} ==", kind.title())?;
        run_demo(kind, options, out)?;
    }
    Ok(())
}

fn open_demo_db(schema: Schema, options: DemoOptions) -> DemoResult<Connection> {
    let db_options = DbOpenOptions {
        echo_sql: options.echo_sql,
    };
    Ok(open_db_in_memory_with(schema, db_options)?)
}
