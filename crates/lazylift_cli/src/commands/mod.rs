pub mod demo;
pub mod history;
pub mod logbook;

use crate::config::AppConfig;
use lazylift_core::{open_db_with, open_existing_db, DbOpenOptions, Schema};
use rusqlite::Connection;
use std::error::Error;
use std::path::Path;

pub type CommandResult = Result<(), Box<dyn Error>>;

type ShelfResult = Result<Connection, Box<dyn Error>>;

/// Opens (creating if needed) the logbook shelf at `path`.
fn open_shelf(path: &Path, config: &AppConfig) -> ShelfResult {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(open_db_with(path, Schema::Shelf, shelf_options(config))?)
}

/// Opens the logbook shelf at `path`; nothing is created when it is missing.
fn open_existing_shelf(path: &Path, config: &AppConfig) -> ShelfResult {
    if !path.is_file() {
        return Err(format!("logbook shelf `{}` does not exist", path.display()).into());
    }
    Ok(open_existing_db(path, Schema::Shelf, shelf_options(config))?)
}

fn shelf_options(config: &AppConfig) -> DbOpenOptions {
    DbOpenOptions {
        echo_sql: config.echo_sql,
    }
}
