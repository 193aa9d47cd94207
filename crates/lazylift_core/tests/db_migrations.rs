use lazylift_core::db::migrations::{is_schema_ready, latest_version};
use lazylift_core::db::{
    open_db, open_db_in_memory, open_existing_db, DbError, DbOpenOptions, Schema,
};
use lazylift_core::repo::workout_repo::SqliteWorkoutRepository;
use lazylift_core::RepoError;
use rusqlite::Connection;

#[test]
fn every_schema_migrates_in_memory() {
    for schema in Schema::ALL {
        let conn = open_db_in_memory(schema).expect("in-memory db");
        assert_eq!(schema_version(&conn), latest_version(schema));
        assert_eq!(application_id(&conn), schema.application_id());
        assert!(is_schema_ready(&conn, schema).expect("readiness check"));
    }
}

#[test]
fn schemas_create_their_tables() {
    let conn = open_db_in_memory(Schema::ManyToMany).expect("in-memory db");
    assert_table_exists(&conn, "workouts");
    assert_table_exists(&conn, "exercises");
    assert_table_exists(&conn, "workout_exercise");

    let conn = open_db_in_memory(Schema::SelfReferential).expect("in-memory db");
    assert_table_exists(&conn, "exercise_variations");
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory(Schema::OneToMany).expect("in-memory db");
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .expect("row query");
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("lazylift.db");

    let conn_first = open_db(&path, Schema::Shelf).expect("shelf db");
    assert_eq!(schema_version(&conn_first), latest_version(Schema::Shelf));
    drop(conn_first);

    let conn_second = open_db(&path, Schema::Shelf).expect("shelf db");
    assert_eq!(schema_version(&conn_second), latest_version(Schema::Shelf));
    assert_table_exists(&conn_second, "shelf_entries");
}

#[test]
fn open_existing_refuses_missing_files_without_creating_them() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("typo").join("logbok.db");

    let result = open_existing_db(&path, Schema::Shelf, DbOpenOptions::default());
    assert!(matches!(result, Err(DbError::Sqlite(_))));
    assert!(!path.exists());
    assert!(!dir.path().join("typo").exists());

    let path = dir.path().join("logbook.db");
    drop(open_db(&path, Schema::Shelf).expect("create shelf"));
    let conn = open_existing_db(&path, Schema::Shelf, DbOpenOptions::default())
        .expect("existing shelf should open");
    assert_table_exists(&conn, "shelf_entries");
}

#[test]
fn shelf_upgrade_keeps_existing_entries() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("old-shelf.db");

    let conn = Connection::open(&path).expect("raw connection");
    conn.execute_batch(&format!(
        "CREATE TABLE shelf_entries (
            key TEXT PRIMARY KEY NOT NULL CHECK (length(key) > 0),
            value TEXT NOT NULL
        );
        INSERT INTO shelf_entries (key, value) VALUES ('logbook', '{{\"workouts\":[]}}');
        PRAGMA user_version = 1;
        PRAGMA application_id = {};",
        Schema::Shelf.application_id()
    ))
    .expect("legacy shelf setup");
    drop(conn);

    let conn = open_db(&path, Schema::Shelf).expect("shelf db");
    assert_eq!(schema_version(&conn), 2);
    let (value, updated_at): (String, i64) = conn
        .query_row(
            "SELECT value, updated_at FROM shelf_entries WHERE key = 'logbook';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("migrated row");
    assert_eq!(value, "{\"workouts\":[]}");
    assert_eq!(updated_at, 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("raw connection");
    conn.execute_batch("PRAGMA user_version = 999;")
        .expect("pragma write");
    drop(conn);

    let err = open_db(&path, Schema::OneToMany).expect_err("open fails");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version(Schema::OneToMany));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_database_for_another_schema_returns_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("students.db");
    drop(open_db(&path, Schema::OneToOne).expect("shelf db"));

    let err = open_db(&path, Schema::Shelf).expect_err("open fails");
    match err {
        DbError::SchemaMismatch {
            expected,
            found_application_id,
        } => {
            assert_eq!(expected, Schema::Shelf);
            assert_eq!(found_application_id, Schema::OneToOne.application_id());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_connection_for_another_schema() {
    let conn = open_db_in_memory(Schema::ParentChild).expect("in-memory db");
    match SqliteWorkoutRepository::try_new(&conn) {
        Err(RepoError::SchemaNotReady { expected }) => assert_eq!(expected, Schema::OneToMany),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("repository accepted a parent/child connection"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("row query")
}

fn application_id(conn: &Connection) -> i32 {
    conn.query_row("PRAGMA application_id;", [], |row| row.get(0))
        .expect("row query")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("row query");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
