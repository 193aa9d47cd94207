//! Record shapes for every relationship schema and the workout logbook.
//!
//! # Responsibility
//! - Define the typed rows repositories read and write.
//! - Own field-level validation shared by all write paths.
//!
//! # Invariants
//! - Text columns are required (non-blank) and length-bounded.
//! - Weights are finite and non-negative.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catalog;
pub mod family;
pub mod logbook;
pub mod student;
pub mod variation;
pub mod workout;

/// Integer primary key used by every relational schema.
pub type RowId = i64;

/// Field-level validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Required text field is empty or whitespace.
    Blank {
        field: &'static str,
    },
    /// Text field exceeds its column limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Weight is NaN, infinite or negative.
    InvalidWeight {
        field: &'static str,
        value: f64,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "`{field}` must not be blank"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` is {actual_chars} characters long; at most {max_chars} allowed"
            ),
            Self::InvalidWeight { field, value } => write!(
                f,
                "`{field}` must be a finite non-negative number, got {value}"
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn validate_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::Blank { field });
    }
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ModelValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

pub(crate) fn validate_weight(field: &'static str, value: f64) -> Result<(), ModelValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ModelValidationError::InvalidWeight { field, value });
    }
    Ok(())
}

/// Formats a weight without a trailing `.0` for whole numbers.
pub(crate) fn format_weight(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
