//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register one migration chain per relationship schema.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic within a chain.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A database is stamped with the `application_id` of its schema on first
//!   migration and never re-stamped.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const ONE_TO_MANY: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("one_to_many_0001.sql"),
}];

const PARENT_CHILD: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("parent_child_0001.sql"),
}];

const NULLABLE_MANY_TO_ONE: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("nullable_many_to_one_0001.sql"),
}];

const ONE_TO_ONE: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("one_to_one_0001.sql"),
}];

const ONE_TO_ONE_LINKED: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("one_to_one_linked_0001.sql"),
}];

const MANY_TO_MANY: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("many_to_many_0001.sql"),
}];

const EXERCISE_CATALOG: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("exercise_catalog_0001.sql"),
}];

const SELF_REFERENTIAL: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("self_referential_0001.sql"),
}];

const SHELF: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("shelf_0001.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("shelf_0002_updated_at.sql"),
    },
];

/// Table layout a connection is migrated to.
///
/// Each relationship demo owns its own tables, so one connection carries
/// exactly one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// `workouts` 1..n `exercises`, cascade delete-orphan.
    OneToMany,
    /// `parent_table` 1..n `child_table`, required link.
    ParentChild,
    /// `parent_table` n..1 `child_table`, optional link.
    NullableManyToOne,
    /// `students` 1..1 `addresses`, foreign key on the address side.
    OneToOne,
    /// `students` 1..1 `addresses`, foreign keys on both sides.
    OneToOneLinked,
    /// `workouts` n..m `exercises` through `workout_exercise`.
    ManyToMany,
    /// `exercise_names`, `workouts` and the `exercises` that join them.
    ExerciseCatalog,
    /// `exercise_variations` referencing themselves.
    SelfReferential,
    /// Key-value store for the workout logbook.
    Shelf,
}

impl Schema {
    /// All schemas known by this binary.
    pub const ALL: [Schema; 9] = [
        Schema::OneToMany,
        Schema::ParentChild,
        Schema::NullableManyToOne,
        Schema::OneToOne,
        Schema::OneToOneLinked,
        Schema::ManyToMany,
        Schema::ExerciseCatalog,
        Schema::SelfReferential,
        Schema::Shelf,
    ];

    /// Stable short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::OneToMany => "one_to_many",
            Self::ParentChild => "parent_child",
            Self::NullableManyToOne => "nullable_many_to_one",
            Self::OneToOne => "one_to_one",
            Self::OneToOneLinked => "one_to_one_linked",
            Self::ManyToMany => "many_to_many",
            Self::ExerciseCatalog => "exercise_catalog",
            Self::SelfReferential => "self_referential",
            Self::Shelf => "shelf",
        }
    }

    /// Value written to `PRAGMA application_id`.
    pub fn application_id(self) -> i32 {
        // "LL" prefix keeps ids out of the range other tools commonly use.
        0x4C4C_0000
            + match self {
                Self::OneToMany => 1,
                Self::ParentChild => 2,
                Self::NullableManyToOne => 3,
                Self::OneToOne => 4,
                Self::OneToOneLinked => 5,
                Self::ManyToMany => 6,
                Self::ExerciseCatalog => 7,
                Self::SelfReferential => 8,
                Self::Shelf => 9,
            }
    }

    fn migrations(self) -> &'static [Migration] {
        match self {
            Self::OneToMany => ONE_TO_MANY,
            Self::ParentChild => PARENT_CHILD,
            Self::NullableManyToOne => NULLABLE_MANY_TO_ONE,
            Self::OneToOne => ONE_TO_ONE,
            Self::OneToOneLinked => ONE_TO_ONE_LINKED,
            Self::ManyToMany => MANY_TO_MANY,
            Self::ExerciseCatalog => EXERCISE_CATALOG,
            Self::SelfReferential => SELF_REFERENTIAL,
            Self::Shelf => SHELF,
        }
    }
}

/// Returns the latest migration version known for `schema`.
pub fn latest_version(schema: Schema) -> u32 {
    schema
        .migrations()
        .last()
        .map_or(0, |migration| migration.version)
}

/// Applies all pending migrations of `schema` on the provided connection.
///
/// # Errors
/// - `SchemaMismatch` when the database is stamped for another schema.
/// - `UnsupportedSchemaVersion` when the database is newer than this binary.
pub fn apply_migrations(conn: &mut Connection, schema: Schema) -> DbResult<()> {
    let application_id = current_application_id(conn)?;
    if application_id != 0 && application_id != schema.application_id() {
        return Err(DbError::SchemaMismatch {
            expected: schema,
            found_application_id: application_id,
        });
    }

    let current_version = current_user_version(conn)?;
    let latest = latest_version(schema);

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in schema.migrations() {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=migration_apply module=db status=ok schema={} version={}",
            schema.name(),
            migration.version
        );
    }
    if application_id == 0 {
        tx.execute_batch(&format!("PRAGMA application_id = {};", schema.application_id()))?;
    }
    tx.commit()?;

    Ok(())
}

/// Returns whether `conn` is migrated to the latest version of `schema`.
pub fn is_schema_ready(conn: &Connection, schema: Schema) -> DbResult<bool> {
    Ok(current_application_id(conn)? == schema.application_id()
        && current_user_version(conn)? == latest_version(schema))
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn current_application_id(conn: &Connection) -> DbResult<i32> {
    let id = conn.query_row("PRAGMA application_id;", [], |row| row.get::<_, i32>(0))?;
    Ok(id)
}
