//! Interactive workout recording command

use super::{open_shelf, CommandResult};
use crate::config::AppConfig;
use clap::Args;
use lazylift_core::{record_workout, LogbookService, NameMode, Prompter, SqliteShelfRepository};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Accept any unique prefix of an exercise name
    #[arg(long)]
    pub abbrev: bool,

    /// Logbook shelf to append the workout to
    #[arg(long, env = "LAZYLIFT_SHELF")]
    pub shelf: Option<PathBuf>,
}

pub fn execute<R: BufRead>(
    args: LogArgs,
    config: &AppConfig,
    input: R,
    out: &mut dyn Write,
) -> CommandResult {
    let mode = if args.abbrev {
        NameMode::Abbreviated
    } else {
        NameMode::Strict
    };

    let mut prompter = Prompter::new(input, &mut *out);
    let workout = record_workout(&mut prompter, mode)?;
    drop(prompter);
    writeln!(out, "{workout}")?;

    let Some(path) = args.shelf else {
        return Ok(());
    };
    if workout.is_empty() {
        writeln!(out, "nothing recorded; {} left unchanged", path.display())?;
        return Ok(());
    }

    let conn = open_shelf(&path, config)?;
    let service = LogbookService::new(SqliteShelfRepository::try_new(&conn)?);
    let stored = service.record_workout(workout)?;
    info!(
        "event=logbook_append module=cli status=ok shelf={} workouts={stored}",
        path.display()
    );
    writeln!(out, "saved; {stored} workout(s) in {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, LogArgs};
    use crate::config::AppConfig;
    use lazylift_core::{open_db, LogbookService, Schema, SqliteShelfRepository};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            log_level: "info".to_string(),
            log_dir: PathBuf::from("/tmp/lazylift-test-logs"),
            echo_sql: false,
        }
    }

    #[test]
    fn prints_workout_without_shelf() {
        let input = Cursor::new("squat\n100\n5\n\n");
        let mut out = Vec::new();
        execute(
            LogArgs {
                abbrev: false,
                shelf: None,
            },
            &config(),
            input,
            &mut out,
        )
        .expect("session without shelf");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert!(text.contains("exercises=[squat 100 × 5]"));
        assert!(!text.contains("saved"));
    }

    #[test]
    fn appends_to_shelf_across_runs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let shelf = dir.path().join("nested").join("logbook.db");

        for script in ["de\n180\n3\nquit\n", "b\n80\n8\n"] {
            let mut out = Vec::new();
            execute(
                LogArgs {
                    abbrev: true,
                    shelf: Some(shelf.clone()),
                },
                &config(),
                Cursor::new(script),
                &mut out,
            )
            .expect("session with shelf");
            let text = String::from_utf8(out).expect("utf-8 output");
            assert!(text.contains("saved;"));
        }

        let conn = open_db(&shelf, Schema::Shelf).expect("reopen shelf");
        let repo = SqliteShelfRepository::try_new(&conn).expect("shelf schema");
        let workouts = LogbookService::new(repo)
            .list_workouts()
            .expect("stored workouts");
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].exercises[0].name, "deadlift");
        assert_eq!(workouts[1].exercises[0].name, "bench press");
    }

    #[test]
    fn unknown_exercise_in_strict_mode_is_an_error() {
        let mut out = Vec::new();
        let err = execute(
            LogArgs {
                abbrev: false,
                shelf: None,
            },
            &config(),
            Cursor::new("curls\n"),
            &mut out,
        )
        .expect_err("unknown exercise should fail");
        assert!(err.to_string().contains("unknown exercise `curls`"));
    }
}
