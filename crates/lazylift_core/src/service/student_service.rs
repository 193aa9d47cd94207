//! Student use-case service.
//!
//! # Responsibility
//! - Provide the one-to-one enrollment use cases independently of which
//!   side of the relationship holds the foreign key.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Lookups by last name require exactly one match.

use crate::model::student::{NewAddress, Student};
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoResult;
use log::info;

/// Use-case service wrapper for student/address operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a student with an address.
    pub fn enroll(
        &self,
        first_name: &str,
        last_name: &str,
        address: &NewAddress,
    ) -> RepoResult<Student> {
        let student = self
            .repo
            .create_student(first_name, last_name, Some(address))?;
        info!(
            "event=student_enroll module=service status=ok student_id={}",
            student.student_id
        );
        Ok(student)
    }

    /// Returns the city of the only student named `last_name`, if that
    /// student has an address.
    pub fn city_of(&self, last_name: &str) -> RepoResult<Option<String>> {
        let student = self.repo.find_one_by_last_name(last_name)?;
        Ok(student.address.map(|address| address.city))
    }

    /// Replaces the address of the only student named `last_name`.
    pub fn relocate(&self, last_name: &str, address: &NewAddress) -> RepoResult<Student> {
        let student = self.repo.find_one_by_last_name(last_name)?;
        self.repo.set_address(student.student_id, Some(address))
    }

    /// Clears the address of the only student named `last_name`; the
    /// orphaned address row is deleted.
    pub fn clear_address(&self, last_name: &str) -> RepoResult<Student> {
        let student = self.repo.find_one_by_last_name(last_name)?;
        let updated = self.repo.set_address(student.student_id, None)?;
        info!(
            "event=address_orphan_delete module=service status=ok student_id={}",
            updated.student_id
        );
        Ok(updated)
    }

    /// Deletes the only student named `last_name` together with the address.
    pub fn withdraw(&self, last_name: &str) -> RepoResult<()> {
        let student = self.repo.find_one_by_last_name(last_name)?;
        self.repo.delete_student(student.student_id)
    }

    /// Counts stored address rows.
    pub fn address_count(&self) -> RepoResult<u64> {
        self.repo.count_addresses()
    }
}
