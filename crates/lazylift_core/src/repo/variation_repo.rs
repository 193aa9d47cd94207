//! Self-referential exercise variation repository.
//!
//! # Responsibility
//! - Persist a tree of exercise variations (`parent_id` points at the same
//!   table).
//! - Walk the tree up (lineage) and down (subtree) with recursive CTEs.
//!
//! # Invariants
//! - Child listing is deterministic: `name ASC, id ASC`.
//! - Deleting a variation deletes its whole subtree (`ON DELETE CASCADE`).
//! - A variation cannot be re-parented under itself or its descendants.

use crate::db::migrations::Schema;
use crate::model::variation::ExerciseVariation;
use crate::model::workout::NAME_MAX_CHARS;
use crate::model::{validate_text, RowId};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for the self-referential variation schema.
pub trait VariationRepository {
    /// Creates a variation under `parent_id`, or a root when `None`.
    fn create_variation(&self, name: &str, parent_id: Option<RowId>)
        -> RepoResult<ExerciseVariation>;
    fn get_variation(&self, variation_id: RowId) -> RepoResult<Option<ExerciseVariation>>;
    /// Lists direct children, or roots when `parent_id` is `None`.
    fn list_children(&self, parent_id: Option<RowId>) -> RepoResult<Vec<ExerciseVariation>>;
    /// Returns the path from the root down to `variation_id`, inclusive.
    fn lineage(&self, variation_id: RowId) -> RepoResult<Vec<ExerciseVariation>>;
    /// Moves a variation under another parent (or to the root).
    fn reparent(&self, variation_id: RowId, new_parent_id: Option<RowId>) -> RepoResult<()>;
    /// Deletes a variation and all its descendants; returns rows removed.
    fn delete_variation(&self, variation_id: RowId) -> RepoResult<u64>;
}

/// SQLite-backed variation repository.
pub struct SqliteVariationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVariationRepository<'conn> {
    /// Creates repository from a connection migrated to
    /// `Schema::SelfReferential`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::SelfReferential)?;
        Ok(Self { conn })
    }
}

impl VariationRepository for SqliteVariationRepository<'_> {
    fn create_variation(
        &self,
        name: &str,
        parent_id: Option<RowId>,
    ) -> RepoResult<ExerciseVariation> {
        validate_text("variation.name", name, NAME_MAX_CHARS)?;
        self.conn.execute(
            "INSERT INTO exercise_variations (name, parent_id) VALUES (?1, ?2);",
            params![name, parent_id],
        )?;
        Ok(ExerciseVariation {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            parent_id,
        })
    }

    fn get_variation(&self, variation_id: RowId) -> RepoResult<Option<ExerciseVariation>> {
        let variation = self
            .conn
            .query_row(
                "SELECT id, name, parent_id FROM exercise_variations WHERE id = ?1;",
                [variation_id],
                parse_variation_row,
            )
            .optional()?;
        Ok(variation)
    }

    fn list_children(&self, parent_id: Option<RowId>) -> RepoResult<Vec<ExerciseVariation>> {
        let sql = match parent_id {
            Some(_) => {
                "SELECT id, name, parent_id
                 FROM exercise_variations
                 WHERE parent_id = ?1
                 ORDER BY name ASC, id ASC;"
            }
            None => {
                "SELECT id, name, parent_id
                 FROM exercise_variations
                 WHERE parent_id IS NULL
                 ORDER BY name ASC, id ASC;"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match parent_id {
            Some(parent_id) => stmt.query_map([parent_id], parse_variation_row)?,
            None => stmt.query_map([], parse_variation_row)?,
        };
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn lineage(&self, variation_id: RowId) -> RepoResult<Vec<ExerciseVariation>> {
        let mut stmt = self.conn.prepare(
            "WITH RECURSIVE ancestors(id, name, parent_id, depth) AS (
                SELECT id, name, parent_id, 0
                FROM exercise_variations
                WHERE id = ?1
                UNION ALL
                SELECT v.id, v.name, v.parent_id, a.depth + 1
                FROM exercise_variations v
                INNER JOIN ancestors a ON v.id = a.parent_id
            )
            SELECT id, name, parent_id
            FROM ancestors
            ORDER BY depth DESC;",
        )?;
        let path = stmt
            .query_map([variation_id], parse_variation_row)?
            .collect::<Result<Vec<_>, _>>()?;
        if path.is_empty() {
            return Err(RepoError::NotFound {
                entity: "variation",
                id: variation_id,
            });
        }
        Ok(path)
    }

    fn reparent(&self, variation_id: RowId, new_parent_id: Option<RowId>) -> RepoResult<()> {
        if let Some(new_parent_id) = new_parent_id {
            let lineage = self.lineage(new_parent_id)?;
            if lineage.iter().any(|variation| variation.id == variation_id) {
                return Err(RepoError::InvalidData(format!(
                    "variation {variation_id} cannot be moved under its own descendant {new_parent_id}"
                )));
            }
        }

        let changed = self.conn.execute(
            "UPDATE exercise_variations SET parent_id = ?2 WHERE id = ?1;",
            params![variation_id, new_parent_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "variation",
                id: variation_id,
            });
        }
        Ok(())
    }

    fn delete_variation(&self, variation_id: RowId) -> RepoResult<u64> {
        let subtree_size: i64 = self.conn.query_row(
            "WITH RECURSIVE subtree(id) AS (
                SELECT id FROM exercise_variations WHERE id = ?1
                UNION ALL
                SELECT v.id
                FROM exercise_variations v
                INNER JOIN subtree s ON v.parent_id = s.id
            )
            SELECT COUNT(*) FROM subtree;",
            [variation_id],
            |row| row.get(0),
        )?;
        if subtree_size == 0 {
            return Err(RepoError::NotFound {
                entity: "variation",
                id: variation_id,
            });
        }

        self.conn.execute(
            "DELETE FROM exercise_variations WHERE id = ?1;",
            [variation_id],
        )?;
        Ok(subtree_size.unsigned_abs())
    }
}

fn parse_variation_row(row: &Row<'_>) -> rusqlite::Result<ExerciseVariation> {
    Ok(ExerciseVariation {
        id: row.get("id")?,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
    })
}
