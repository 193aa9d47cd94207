//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for one `Schema`.
//! - Configure connection pragmas required by relationship semantics.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`; cascade and orphan rules
//!   depend on it.
//! - Returned connections have migrations of their schema fully applied.

use super::migrations::{apply_migrations, Schema};
use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Per-connection switches applied before any migration runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DbOpenOptions {
    /// Echo every executed statement, schema DDL included, to the log.
    pub echo_sql: bool,
}

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, schema: Schema) -> DbResult<Connection> {
    open_db_with(path, schema, DbOpenOptions::default())
}

/// Like [`open_db`], with explicit connection options.
pub fn open_db_with(
    path: impl AsRef<Path>,
    schema: Schema,
    options: DbOpenOptions,
) -> DbResult<Connection> {
    open_with("file", schema, options, || Connection::open(path))
}

/// Opens an existing SQLite database file; a missing file is an error.
///
/// Pending migrations are still applied to the existing file.
pub fn open_existing_db(
    path: impl AsRef<Path>,
    schema: Schema,
    options: DbOpenOptions,
) -> DbResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    open_with("existing", schema, options, || {
        Connection::open_with_flags(path, flags)
    })
}

/// Opens a fresh in-memory SQLite database and applies all migrations.
pub fn open_db_in_memory(schema: Schema) -> DbResult<Connection> {
    open_db_in_memory_with(schema, DbOpenOptions::default())
}

/// Like [`open_db_in_memory`], with explicit connection options.
pub fn open_db_in_memory_with(schema: Schema, options: DbOpenOptions) -> DbResult<Connection> {
    open_with("memory", schema, options, Connection::open_in_memory)
}

/// Routes every statement executed on `conn` to the log at `info` level.
///
/// Passing `false` removes a previously installed echo hook. Statements run
/// before the hook is installed are not echoed; use
/// [`DbOpenOptions::echo_sql`] to include the schema migrations.
pub fn set_sql_echo(conn: &mut Connection, enabled: bool) {
    if enabled {
        conn.trace(Some(echo_statement));
    } else {
        conn.trace(None);
    }
}

fn echo_statement(sql: &str) {
    info!(
        "event=sql_echo module=db sql={}",
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    );
}

fn open_with(
    mode: &'static str,
    schema: Schema,
    options: DbOpenOptions,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode={mode} schema={}",
        schema.name()
    );

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} schema={} duration_ms={} error_code=db_open_failed error={}",
                schema.name(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, schema, options) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} schema={} duration_ms={}",
                schema.name(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} schema={} duration_ms={} error_code=db_bootstrap_failed error={}",
                schema.name(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(
    conn: &mut Connection,
    schema: Schema,
    options: DbOpenOptions,
) -> DbResult<()> {
    set_sql_echo(conn, options.echo_sql);
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn, schema)?;
    Ok(())
}
