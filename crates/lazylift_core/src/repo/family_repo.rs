//! Parent/child repositories for the required and optional link schemas.
//!
//! # Responsibility
//! - `ParentChildRepository`: parent owns many children; the child row
//!   carries a required `parent_id`.
//! - `ParentLinkRepository`: many parents may point at one child; the parent
//!   row carries an optional `child_id`.
//!
//! # Invariants
//! - Foreign keys are enforced by SQLite; inserting a child for a missing
//!   parent surfaces as a constraint violation.
//! - Listing is deterministic: ascending row id.

use crate::db::migrations::Schema;
use crate::model::family::{Child, LinkedParent, Parent, SharedChild};
use crate::model::RowId;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for the required one-to-many link.
pub trait ParentChildRepository {
    /// Creates one parent and `child_count` children in one transaction.
    fn create_parent_with_children(&self, child_count: usize) -> RepoResult<Parent>;
    /// Creates a child for an existing parent.
    fn create_child(&self, parent_id: RowId) -> RepoResult<Child>;
    fn get_parent(&self, parent_id: RowId) -> RepoResult<Option<Parent>>;
    fn get_child(&self, child_id: RowId) -> RepoResult<Option<Child>>;
}

/// Repository interface for the optional many-to-one link.
pub trait ParentLinkRepository {
    fn create_child(&self) -> RepoResult<SharedChild>;
    /// Creates a parent, optionally pointing at an existing child.
    fn create_parent(&self, child_id: Option<RowId>) -> RepoResult<LinkedParent>;
    /// Points a parent at `child_id`, or clears the link with `None`.
    fn set_child(&self, parent_id: RowId, child_id: Option<RowId>) -> RepoResult<LinkedParent>;
    fn get_parent(&self, parent_id: RowId) -> RepoResult<Option<LinkedParent>>;
    /// Loads a child together with every parent pointing at it.
    fn get_child(&self, child_id: RowId) -> RepoResult<Option<SharedChild>>;
}

/// SQLite-backed required-link repository.
pub struct SqliteParentChildRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParentChildRepository<'conn> {
    /// Creates repository from a connection migrated to `Schema::ParentChild`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::ParentChild)?;
        Ok(Self { conn })
    }
}

impl ParentChildRepository for SqliteParentChildRepository<'_> {
    fn create_parent_with_children(&self, child_count: usize) -> RepoResult<Parent> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("INSERT INTO parent_table DEFAULT VALUES;", [])?;
        let parent_id = tx.last_insert_rowid();
        for _ in 0..child_count {
            tx.execute(
                "INSERT INTO child_table (parent_id) VALUES (?1);",
                [parent_id],
            )?;
        }
        tx.commit()?;

        self.get_parent(parent_id)?.ok_or(RepoError::NotFound {
            entity: "parent",
            id: parent_id,
        })
    }

    fn create_child(&self, parent_id: RowId) -> RepoResult<Child> {
        self.conn.execute(
            "INSERT INTO child_table (parent_id) VALUES (?1);",
            [parent_id],
        )?;
        Ok(Child {
            id: self.conn.last_insert_rowid(),
            parent_id,
        })
    }

    fn get_parent(&self, parent_id: RowId) -> RepoResult<Option<Parent>> {
        let exists: Option<RowId> = self
            .conn
            .query_row(
                "SELECT id FROM parent_table WHERE id = ?1;",
                [parent_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, parent_id
             FROM child_table
             WHERE parent_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([parent_id])?;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            children.push(Child {
                id: row.get("id")?,
                parent_id: row.get("parent_id")?,
            });
        }

        Ok(Some(Parent {
            id: parent_id,
            children,
        }))
    }

    fn get_child(&self, child_id: RowId) -> RepoResult<Option<Child>> {
        let child = self
            .conn
            .query_row(
                "SELECT id, parent_id FROM child_table WHERE id = ?1;",
                [child_id],
                |row| {
                    Ok(Child {
                        id: row.get("id")?,
                        parent_id: row.get("parent_id")?,
                    })
                },
            )
            .optional()?;
        Ok(child)
    }
}

/// SQLite-backed optional-link repository.
pub struct SqliteParentLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParentLinkRepository<'conn> {
    /// Creates repository from a connection migrated to
    /// `Schema::NullableManyToOne`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::NullableManyToOne)?;
        Ok(Self { conn })
    }
}

impl ParentLinkRepository for SqliteParentLinkRepository<'_> {
    fn create_child(&self) -> RepoResult<SharedChild> {
        self.conn
            .execute("INSERT INTO child_table DEFAULT VALUES;", [])?;
        Ok(SharedChild {
            id: self.conn.last_insert_rowid(),
            parent_ids: Vec::new(),
        })
    }

    fn create_parent(&self, child_id: Option<RowId>) -> RepoResult<LinkedParent> {
        self.conn.execute(
            "INSERT INTO parent_table (child_id) VALUES (?1);",
            [child_id],
        )?;
        Ok(LinkedParent {
            id: self.conn.last_insert_rowid(),
            child_id,
        })
    }

    fn set_child(&self, parent_id: RowId, child_id: Option<RowId>) -> RepoResult<LinkedParent> {
        let changed = self.conn.execute(
            "UPDATE parent_table SET child_id = ?2 WHERE id = ?1;",
            params![parent_id, child_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "parent",
                id: parent_id,
            });
        }
        Ok(LinkedParent {
            id: parent_id,
            child_id,
        })
    }

    fn get_parent(&self, parent_id: RowId) -> RepoResult<Option<LinkedParent>> {
        let parent = self
            .conn
            .query_row(
                "SELECT id, child_id FROM parent_table WHERE id = ?1;",
                [parent_id],
                |row| {
                    Ok(LinkedParent {
                        id: row.get("id")?,
                        child_id: row.get("child_id")?,
                    })
                },
            )
            .optional()?;
        Ok(parent)
    }

    fn get_child(&self, child_id: RowId) -> RepoResult<Option<SharedChild>> {
        let exists: Option<RowId> = self
            .conn
            .query_row(
                "SELECT id FROM child_table WHERE id = ?1;",
                [child_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id
             FROM parent_table
             WHERE child_id = ?1
             ORDER BY id ASC;",
        )?;
        let parent_ids = stmt
            .query_map([child_id], |row| row.get::<_, RowId>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SharedChild {
            id: child_id,
            parent_ids,
        }))
    }
}
