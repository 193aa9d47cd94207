//! Key-value shelf repository used to persist the workout logbook.
//!
//! # Responsibility
//! - Store arbitrary serde values as JSON text under string keys.
//! - Keep the whole value under one key so callers write aggregates back
//!   atomically.
//!
//! # Invariants
//! - Keys are non-empty.
//! - `put` replaces the previous value in full (upsert).
//! - Values that no longer decode are reported as `InvalidData`, never
//!   silently dropped.

use crate::db::migrations::Schema;
use crate::model::logbook::now_epoch_ms;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Repository interface for the key-value shelf.
pub trait ShelfRepository {
    /// Returns the raw JSON text stored under `key`.
    fn get_json(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores raw JSON text under `key`, replacing any previous value.
    fn put_json(&self, key: &str, json: &str) -> RepoResult<()>;
    /// Removes `key`; returns whether it existed.
    fn remove(&self, key: &str) -> RepoResult<bool>;
    /// Lists keys in ascending order.
    fn keys(&self) -> RepoResult<Vec<String>>;

    /// Loads and decodes the value stored under `key`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_json(key)? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|err| {
                RepoError::InvalidData(format!("shelf value under `{key}` does not decode: {err}"))
            }),
            None => Ok(None),
        }
    }

    /// Encodes and stores `value` under `key`.
    fn store<T: Serialize>(&self, key: &str, value: &T) -> RepoResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value).map_err(|err| {
            RepoError::InvalidData(format!("shelf value for `{key}` does not encode: {err}"))
        })?;
        self.put_json(key, &json)
    }
}

/// SQLite-backed shelf.
pub struct SqliteShelfRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShelfRepository<'conn> {
    /// Creates repository from a connection migrated to `Schema::Shelf`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::Shelf)?;
        Ok(Self { conn })
    }
}

impl ShelfRepository for SqliteShelfRepository<'_> {
    fn get_json(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM shelf_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_json(&self, key: &str, json: &str) -> RepoResult<()> {
        if key.is_empty() {
            return Err(RepoError::InvalidData("shelf key cannot be empty".to_string()));
        }
        self.conn.execute(
            "INSERT INTO shelf_entries (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, json, now_epoch_ms()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM shelf_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM shelf_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::{ShelfRepository, SqliteShelfRepository};
    use crate::db::{open_db_in_memory, Schema};
    use crate::repo::RepoError;
    use std::collections::BTreeMap;

    #[test]
    fn store_and_load_replace_whole_value() {
        let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
        let shelf = SqliteShelfRepository::try_new(&conn).expect("schema ready");

        let mut first = BTreeMap::new();
        first.insert("squat".to_string(), 100);
        shelf.store("maxes", &first).expect("store");

        let mut second = BTreeMap::new();
        second.insert("deadlift".to_string(), 180);
        shelf.store("maxes", &second).expect("store");

        let loaded: Option<BTreeMap<String, i32>> = shelf.load("maxes").expect("load");
        assert_eq!(loaded, Some(second));
        assert_eq!(shelf.keys().expect("keys"), vec!["maxes".to_string()]);
    }

    #[test]
    fn load_reports_undecodable_values() {
        let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
        let shelf = SqliteShelfRepository::try_new(&conn).expect("schema ready");
        shelf.put_json("broken", "{not json").expect("put json");

        let err = shelf.load::<Vec<i32>>("broken").expect_err("broken json");
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn remove_reports_whether_key_existed() {
        let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
        let shelf = SqliteShelfRepository::try_new(&conn).expect("schema ready");
        shelf.store("k", &1).expect("store");

        assert!(shelf.remove("k").expect("remove"));
        assert!(!shelf.remove("k").expect("remove"));
        assert!(shelf.load::<i32>("k").expect("load").is_none());
    }
}
