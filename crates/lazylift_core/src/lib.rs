//! Core domain logic for LazyLift.
//! Relationship walkthroughs over SQLite plus an interactive workout logbook.

pub mod db;
pub mod demo;
pub mod logbook;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    open_db, open_db_in_memory, open_db_in_memory_with, open_db_with, open_existing_db,
    set_sql_echo, DbError, DbOpenOptions, DbResult, Schema,
};
pub use demo::{run_all, run_demo, DemoError, DemoKind, DemoOptions, DemoResult};
pub use logbook::prompt::Prompter;
pub use logbook::session::{record_workout, NameMode, SessionError, SessionResult};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingOptions,
};
pub use model::logbook::{Logbook, LogbookWorkout, LoggedExercise, ALLOWED_EXERCISES};
pub use model::{ModelValidationError, RowId};
pub use repo::shelf_repo::{ShelfRepository, SqliteShelfRepository};
pub use repo::{RepoError, RepoResult};
pub use service::logbook_service::{LogbookService, LogbookServiceError, LOGBOOK_KEY};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
