use lazylift_core::{
    open_db, open_db_in_memory, record_workout, LogbookService, LogbookServiceError,
    LogbookWorkout, LoggedExercise, NameMode, Prompter, RepoError, Schema, ShelfRepository,
    SqliteShelfRepository, LOGBOOK_KEY,
};
use rusqlite::Connection;
use std::io::Cursor;

fn shelf_repo(conn: &Connection) -> SqliteShelfRepository<'_> {
    SqliteShelfRepository::try_new(conn).expect("schema ready")
}

fn workout(started_at: i64, entries: &[(&str, f64, u32)]) -> LogbookWorkout {
    let mut workout = LogbookWorkout::started_at(started_at);
    for (name, weight, reps) in entries {
        workout
            .exercises
            .push(LoggedExercise::new(*name, *weight, *reps));
    }
    workout
}

#[test]
fn missing_logbook_loads_empty() {
    let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
    let service = LogbookService::new(shelf_repo(&conn));

    assert!(service.load().expect("load").workouts.is_empty());
    assert!(service.list_workouts().expect("list workouts").is_empty());
}

#[test]
fn workouts_persist_across_reopen_in_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("logbook.db");

    {
        let conn = open_db(&path, Schema::Shelf).expect("shelf db");
        let service = LogbookService::new(shelf_repo(&conn));
        assert_eq!(
            service
                .record_workout(workout(1, &[("squat", 100.0, 5)]))
                .expect("workout recorded"),
            1
        );
    }

    let conn = open_db(&path, Schema::Shelf).expect("shelf db");
    let service = LogbookService::new(shelf_repo(&conn));
    let second = workout(2, &[("deadlift", 180.0, 3), ("bench press", 80.0, 8)]);
    let second_id = second.id;
    assert_eq!(service.record_workout(second).expect("record workout"), 2);

    let stored = service.list_workouts().expect("list workouts");
    assert_eq!(
        stored
            .iter()
            .map(|workout| workout.started_at)
            .collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(stored[1].id, second_id);
    assert_eq!(stored[1].total_volume(), 180.0 * 3.0 + 80.0 * 8.0);
}

#[test]
fn logbook_is_stored_under_a_single_key() {
    let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
    let shelf = SqliteShelfRepository::try_new(&conn).expect("schema ready");
    let service = LogbookService::new(shelf_repo(&conn));

    service
        .record_workout(workout(1, &[("squat", 100.0, 5)]))
        .expect("workout recorded");
    service
        .record_workout(workout(2, &[("squat", 105.0, 5)]))
        .expect("workout recorded");

    assert_eq!(shelf.keys().expect("keys"), vec![LOGBOOK_KEY.to_string()]);
    let json = shelf
        .get_json(LOGBOOK_KEY)
        .expect("raw logbook")
        .expect("logbook stored");
    assert!(json.starts_with("{\"workouts\":["));
}

#[test]
fn empty_workouts_are_not_persisted() {
    let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
    let service = LogbookService::new(shelf_repo(&conn));

    let empty = service.record_workout(workout(1, &[]));
    assert!(matches!(empty, Err(LogbookServiceError::EmptyWorkout)));
    assert!(matches!(
        service
            .record_workout(workout(1, &[("squat", f64::INFINITY, 5)]))
            .expect_err("infinite weight"),
        LogbookServiceError::Validation(_)
    ));
    assert!(service.list_workouts().expect("list workouts").is_empty());
}

#[test]
fn corrupted_logbook_is_reported() {
    let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
    let shelf = SqliteShelfRepository::try_new(&conn).expect("schema ready");
    shelf.put_json(LOGBOOK_KEY, "[1, 2, 3]").expect("put json");
    let service = LogbookService::new(shelf);

    assert!(matches!(
        service.load().expect_err("load fails"),
        LogbookServiceError::Repo(RepoError::InvalidData(_))
    ));
}

#[test]
fn recorded_session_lands_in_the_logbook() {
    let conn = open_db_in_memory(Schema::Shelf).expect("in-memory db");
    let service = LogbookService::new(shelf_repo(&conn));

    let mut prompter = Prompter::new(Cursor::new("sq\n120\n2\n"), Vec::new());
    let recorded = record_workout(&mut prompter, NameMode::Abbreviated).expect("record workout");
    service
        .record_workout(recorded.clone())
        .expect("workout stored");

    let stored = service.list_workouts().expect("stored workouts");
    assert_eq!(stored, vec![recorded]);
}
