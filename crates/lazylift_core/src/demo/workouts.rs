use super::{open_demo_db, DemoOptions, DemoResult};
use crate::db::Schema;
use crate::model::workout::NewExercise;
use crate::repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
use crate::repo::training_repo::{SqliteTrainingRepository, TrainingRepository};
use crate::repo::variation_repo::{SqliteVariationRepository, VariationRepository};
use crate::repo::workout_repo::{SqliteWorkoutRepository, WorkoutRepository};
use crate::repo::RepoError;
use std::io::Write;

const WORKOUT_NAME: &str = "Monday Heavy Squat Day";

fn squat_day() -> [NewExercise; 3] {
    [
        NewExercise::new("Squat", 110.0, 5),
        NewExercise::new("Paused Squat", 100.0, 3),
        NewExercise::new("Front Squat", 80.0, 3),
    ]
}

/// Workout owning three exercises; detaching one deletes it and deleting
/// the workout takes the rest along.
pub fn one_to_many(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::OneToMany, options)?;
    let repo = SqliteWorkoutRepository::try_new(&conn)?;

    let created = repo.create_workout(WORKOUT_NAME, &squat_day())?;
    let loaded = repo.get_workout(created.id)?.ok_or(RepoError::NotFound {
        entity: "workout",
        id: created.id,
    })?;
    writeln!(out, "{loaded}")?;
    if let Some(first) = loaded.exercises.first() {
        writeln!(out, "{first}")?;
    }

    if let Some(last) = loaded.exercises.last() {
        repo.detach_exercise(loaded.id, last.id)?;
        writeln!(
            out,
            "detached {}; exercise rows left: {}",
            last.name,
            repo.count_exercises()?
        )?;
    }

    repo.delete_workout(loaded.id)?;
    writeln!(
        out,
        "deleted workout; exercise rows left: {}",
        repo.count_exercises()?
    )?;
    Ok(())
}

/// Same workout through a join table, plus a second workout sharing Squat.
pub fn many_to_many(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::ManyToMany, options)?;
    let repo = SqliteTrainingRepository::try_new(&conn)?;

    let monday = repo.create_workout(WORKOUT_NAME, &squat_day())?;
    writeln!(out, "{monday}")?;
    let Some(squat) = monday.exercises.first() else {
        return Ok(());
    };
    writeln!(out, "{squat}")?;

    let thursday = repo.create_workout(
        "Thursday Volume",
        &[NewExercise::new("Bench Press", 80.0, 8)],
    )?;
    repo.link(thursday.id, squat.id)?;
    let thursday = repo.get_workout(thursday.id)?.ok_or(RepoError::NotFound {
        entity: "workout",
        id: thursday.id,
    })?;
    writeln!(out, "{thursday}")?;

    let shared_by = repo.list_workouts_for_exercise(squat.id)?;
    let names = shared_by
        .iter()
        .map(|workout| format!("'{}'", workout.name))
        .collect::<Vec<_>>();
    writeln!(out, "{} appears in: {}", squat.name, names.join(", "))?;

    repo.delete_workout(monday.id)?;
    writeln!(
        out,
        "deleted '{}'; {} still appears in {} workout(s)",
        monday.name,
        squat.name,
        repo.list_workouts_for_exercise(squat.id)?.len()
    )?;
    Ok(())
}

/// Names must exist before a set can reference them.
pub fn exercise_catalog(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::ExerciseCatalog, options)?;
    let repo = SqliteCatalogRepository::try_new(&conn)?;

    let names = repo.add_exercise_names(&["Squat", "Bench Press"])?;
    for name in &names {
        writeln!(out, "{name}")?;
    }

    let workout = repo.start_workout(None)?;
    if let Some(squat) = names.first() {
        repo.log_set(workout.id, squat.id, 100.0, 5)?;
    }

    let loaded = repo.get_workout(workout.id)?.ok_or(RepoError::NotFound {
        entity: "workout",
        id: workout.id,
    })?;
    writeln!(out, "{loaded}")?;
    for set in &loaded.sets {
        writeln!(out, "{set}")?;
    }
    Ok(())
}

/// Variation tree under Squat, printed as lineages.
pub fn self_referential(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::SelfReferential, options)?;
    let repo = SqliteVariationRepository::try_new(&conn)?;

    let squat = repo.create_variation("Squat", None)?;
    let paused = repo.create_variation("Paused Squat", Some(squat.id))?;
    repo.create_variation("Front Squat", Some(squat.id))?;
    let tempo = repo.create_variation("Tempo Paused Squat", Some(paused.id))?;

    let children = repo
        .list_children(Some(squat.id))?
        .into_iter()
        .map(|variation| variation.name)
        .collect::<Vec<_>>();
    writeln!(out, "{squat}")?;
    writeln!(out, "variations of {}: {}", squat.name, children.join(", "))?;

    let lineage = repo
        .lineage(tempo.id)?
        .into_iter()
        .map(|variation| variation.name)
        .collect::<Vec<_>>();
    writeln!(out, "lineage: {}", lineage.join(" > "))?;

    let removed = repo.delete_variation(paused.id)?;
    writeln!(
        out,
        "deleted {} and {} descendant(s)",
        paused.name,
        removed - 1
    )?;
    Ok(())
}
