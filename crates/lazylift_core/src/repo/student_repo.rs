//! One-to-one student/address repositories.
//!
//! # Responsibility
//! - Provide one `StudentRepository` contract over two table layouts:
//!   - `SqliteStudentRepository`: the address row carries a unique, required
//!     `student_id` with `ON DELETE CASCADE`.
//!   - `SqliteLinkedStudentRepository`: both rows carry a unique, nullable
//!     pointer to each other.
//!
//! # Invariants
//! - A student has at most one address (UNIQUE foreign key).
//! - Replacing or clearing an address deletes the previous row (orphan rule).
//! - Deleting a student deletes its address.

use crate::db::migrations::Schema;
use crate::model::student::{validate_student_name, Address, NewAddress, Student};
use crate::model::RowId;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for the one-to-one student/address relationship.
pub trait StudentRepository {
    /// Creates a student and, when given, its address in one transaction.
    fn create_student(
        &self,
        first_name: &str,
        last_name: &str,
        address: Option<&NewAddress>,
    ) -> RepoResult<Student>;
    fn get_student(&self, student_id: RowId) -> RepoResult<Option<Student>>;
    /// Returns the single student with `last_name`.
    ///
    /// Fails with `NoResult` or `MultipleResults` unless exactly one matches.
    fn find_one_by_last_name(&self, last_name: &str) -> RepoResult<Student>;
    /// Replaces (`Some`) or clears (`None`) the student's address.
    fn set_address(&self, student_id: RowId, address: Option<&NewAddress>)
        -> RepoResult<Student>;
    fn delete_student(&self, student_id: RowId) -> RepoResult<()>;
    fn count_addresses(&self) -> RepoResult<u64>;
}

/// SQLite-backed repository with the foreign key on the address side.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a connection migrated to `Schema::OneToOne`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::OneToOne)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(
        &self,
        first_name: &str,
        last_name: &str,
        address: Option<&NewAddress>,
    ) -> RepoResult<Student> {
        validate_student_name(first_name, last_name)?;
        if let Some(address) = address {
            address.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO students (first_name, last_name) VALUES (?1, ?2);",
            params![first_name, last_name],
        )?;
        let student_id = tx.last_insert_rowid();
        if let Some(address) = address {
            insert_owned_address(&tx, student_id, address)?;
        }
        tx.commit()?;

        load_required_student(self, student_id)
    }

    fn get_student(&self, student_id: RowId) -> RepoResult<Option<Student>> {
        load_student(
            self.conn,
            "SELECT
                s.student_id AS student_id,
                s.first_name AS first_name,
                s.last_name AS last_name,
                a.address_id AS address_id,
                a.address AS address,
                a.city AS city,
                a.zipcode AS zipcode
             FROM students s
             LEFT JOIN addresses a ON a.student_id = s.student_id
             WHERE s.student_id = ?1;",
            student_id,
        )
    }

    fn find_one_by_last_name(&self, last_name: &str) -> RepoResult<Student> {
        let student_id = find_single_student_id(self.conn, last_name)?;
        load_required_student(self, student_id)
    }

    fn set_address(
        &self,
        student_id: RowId,
        address: Option<&NewAddress>,
    ) -> RepoResult<Student> {
        if let Some(address) = address {
            address.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        tx.execute("DELETE FROM addresses WHERE student_id = ?1;", [student_id])?;
        if let Some(address) = address {
            insert_owned_address(&tx, student_id, address)?;
        }
        tx.commit()?;

        load_required_student(self, student_id)
    }

    fn delete_student(&self, student_id: RowId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE student_id = ?1;", [student_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "student",
                id: student_id,
            });
        }
        Ok(())
    }

    fn count_addresses(&self) -> RepoResult<u64> {
        count_addresses(self.conn)
    }
}

/// SQLite-backed repository with foreign keys on both sides.
pub struct SqliteLinkedStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkedStudentRepository<'conn> {
    /// Creates repository from a connection migrated to
    /// `Schema::OneToOneLinked`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, Schema::OneToOneLinked)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteLinkedStudentRepository<'_> {
    fn create_student(
        &self,
        first_name: &str,
        last_name: &str,
        address: Option<&NewAddress>,
    ) -> RepoResult<Student> {
        validate_student_name(first_name, last_name)?;
        if let Some(address) = address {
            address.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO students (first_name, last_name) VALUES (?1, ?2);",
            params![first_name, last_name],
        )?;
        let student_id = tx.last_insert_rowid();
        if let Some(address) = address {
            attach_linked_address(&tx, student_id, address)?;
        }
        tx.commit()?;

        load_required_student(self, student_id)
    }

    fn get_student(&self, student_id: RowId) -> RepoResult<Option<Student>> {
        load_student(
            self.conn,
            "SELECT
                s.student_id AS student_id,
                s.first_name AS first_name,
                s.last_name AS last_name,
                a.address_id AS address_id,
                a.address AS address,
                a.city AS city,
                a.zipcode AS zipcode
             FROM students s
             LEFT JOIN addresses a ON a.address_id = s.address_id
             WHERE s.student_id = ?1;",
            student_id,
        )
    }

    fn find_one_by_last_name(&self, last_name: &str) -> RepoResult<Student> {
        let student_id = find_single_student_id(self.conn, last_name)?;
        load_required_student(self, student_id)
    }

    fn set_address(
        &self,
        student_id: RowId,
        address: Option<&NewAddress>,
    ) -> RepoResult<Student> {
        if let Some(address) = address {
            address.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        detach_linked_address(&tx, student_id)?;
        if let Some(address) = address {
            attach_linked_address(&tx, student_id, address)?;
        }
        tx.commit()?;

        load_required_student(self, student_id)
    }

    fn delete_student(&self, student_id: RowId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        detach_linked_address(&tx, student_id)?;
        tx.execute("DELETE FROM students WHERE student_id = ?1;", [student_id])?;
        tx.commit()?;
        Ok(())
    }

    fn count_addresses(&self) -> RepoResult<u64> {
        count_addresses(self.conn)
    }
}

fn insert_owned_address(
    conn: &Connection,
    student_id: RowId,
    address: &NewAddress,
) -> RepoResult<RowId> {
    conn.execute(
        "INSERT INTO addresses (address, city, zipcode, student_id)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            address.address.as_str(),
            address.city.as_str(),
            address.zipcode.as_str(),
            student_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn attach_linked_address(
    conn: &Connection,
    student_id: RowId,
    address: &NewAddress,
) -> RepoResult<RowId> {
    let address_id = insert_owned_address(conn, student_id, address)?;
    conn.execute(
        "UPDATE students SET address_id = ?2 WHERE student_id = ?1;",
        params![student_id, address_id],
    )?;
    Ok(address_id)
}

/// Clears both pointers and deletes the orphaned address row, if any.
fn detach_linked_address(conn: &Connection, student_id: RowId) -> RepoResult<()> {
    let address_id: Option<RowId> = conn.query_row(
        "SELECT address_id FROM students WHERE student_id = ?1;",
        [student_id],
        |row| row.get(0),
    )?;
    let Some(address_id) = address_id else {
        return Ok(());
    };

    conn.execute(
        "UPDATE students SET address_id = NULL WHERE student_id = ?1;",
        [student_id],
    )?;
    conn.execute("DELETE FROM addresses WHERE address_id = ?1;", [address_id])?;
    Ok(())
}

fn ensure_student_exists(conn: &Connection, student_id: RowId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = ?1);",
        [student_id],
        |row| row.get(0),
    )?;
    if exists == 1 {
        return Ok(());
    }
    Err(RepoError::NotFound {
        entity: "student",
        id: student_id,
    })
}

fn find_single_student_id(conn: &Connection, last_name: &str) -> RepoResult<RowId> {
    let mut stmt = conn.prepare(
        "SELECT student_id
         FROM students
         WHERE last_name = ?1
         ORDER BY student_id ASC;",
    )?;
    let ids = stmt
        .query_map([last_name], |row| row.get::<_, RowId>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    match ids.as_slice() {
        [] => Err(RepoError::NoResult { entity: "student" }),
        [id] => Ok(*id),
        many => Err(RepoError::MultipleResults {
            entity: "student",
            count: many.len(),
        }),
    }
}

fn load_required_student<R: StudentRepository>(
    repo: &R,
    student_id: RowId,
) -> RepoResult<Student> {
    repo.get_student(student_id)?.ok_or(RepoError::NotFound {
        entity: "student",
        id: student_id,
    })
}

fn load_student(conn: &Connection, sql: &str, student_id: RowId) -> RepoResult<Option<Student>> {
    let student = conn
        .query_row(sql, [student_id], parse_student_row)
        .optional()?;
    Ok(student)
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let address = match row.get::<_, Option<RowId>>("address_id")? {
        Some(address_id) => Some(Address {
            address_id,
            address: row.get("address")?,
            city: row.get("city")?,
            zipcode: row.get("zipcode")?,
        }),
        None => None,
    };

    Ok(Student {
        student_id: row.get("student_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        address,
    })
}

fn count_addresses(conn: &Connection) -> RepoResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))?;
    Ok(count.unsigned_abs())
}
