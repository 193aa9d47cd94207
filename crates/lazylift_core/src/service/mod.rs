//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and demo layers decoupled from storage details.

pub mod logbook_service;
pub mod student_service;
