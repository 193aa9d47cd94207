//! Student and address records for the one-to-one schemas.
//!
//! # Invariants
//! - A student has at most one address and an address belongs to exactly one
//!   student; uniqueness is enforced by the schema, not by these types.

use super::{validate_text, ModelValidationError, RowId};
use std::fmt::{Display, Formatter};

pub const PERSON_NAME_MAX_CHARS: usize = 40;
pub const STREET_MAX_CHARS: usize = 120;
pub const CITY_MAX_CHARS: usize = 60;
pub const ZIPCODE_MAX_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub student_id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub address_id: RowId,
    /// Street line.
    pub address: String,
    pub city: String,
    pub zipcode: String,
}

/// Address values before the row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub address: String,
    pub city: String,
    pub zipcode: String,
}

impl NewAddress {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            zipcode: zipcode.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_text("address.address", &self.address, STREET_MAX_CHARS)?;
        validate_text("address.city", &self.city, CITY_MAX_CHARS)?;
        validate_text("address.zipcode", &self.zipcode, ZIPCODE_MAX_CHARS)
    }
}

/// Validates the name pair of a new student.
pub fn validate_student_name(
    first_name: &str,
    last_name: &str,
) -> Result<(), ModelValidationError> {
    validate_text("student.first_name", first_name, PERSON_NAME_MAX_CHARS)?;
    validate_text("student.last_name", last_name, PERSON_NAME_MAX_CHARS)
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Student {} {} {}>",
            self.student_id, self.first_name, self.last_name
        )
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Address {} {} {}>",
            self.address_id, self.city, self.zipcode
        )
    }
}
