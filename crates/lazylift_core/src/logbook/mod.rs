//! Interactive workout logbook.
//!
//! # Responsibility
//! - Drive the prompt/validate/append loop over any terminal-like streams.
//! - Provide the abbreviation helper used by the prefix-matching variant.
//!
//! Persistence lives in `service::logbook_service`; this module never touches
//! storage.

pub mod abbrev;
pub mod prompt;
pub mod session;
