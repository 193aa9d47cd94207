//! Logbook history command

use super::{open_existing_shelf, CommandResult};
use crate::config::AppConfig;
use clap::Args;
use lazylift_core::{LogbookService, SqliteShelfRepository};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Logbook shelf to read; it must already exist
    #[arg(long, env = "LAZYLIFT_SHELF")]
    pub shelf: PathBuf,
}

pub fn execute(args: HistoryArgs, config: &AppConfig, out: &mut dyn Write) -> CommandResult {
    let conn = open_existing_shelf(&args.shelf, config)?;
    let service = LogbookService::new(SqliteShelfRepository::try_new(&conn)?);
    let workouts = service.list_workouts()?;

    if workouts.is_empty() {
        writeln!(out, "no workouts recorded in {}", args.shelf.display())?;
        return Ok(());
    }
    for (index, workout) in workouts.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {workout} volume={}",
            index + 1,
            workout.total_volume()
        )?;
    }
    Ok(())
}
