use lazylift_core::db::{open_db_in_memory, Schema};
use lazylift_core::repo::variation_repo::{SqliteVariationRepository, VariationRepository};
use lazylift_core::RepoError;

fn names(variations: Vec<lazylift_core::model::variation::ExerciseVariation>) -> Vec<String> {
    variations
        .into_iter()
        .map(|variation| variation.name)
        .collect()
}

#[test]
fn children_and_lineage_follow_parent_links() {
    let conn = open_db_in_memory(Schema::SelfReferential).expect("in-memory db");
    let repo = SqliteVariationRepository::try_new(&conn).expect("schema ready");

    let squat = repo.create_variation("Squat", None).expect("squat");
    let paused = repo
        .create_variation("Paused Squat", Some(squat.id))
        .expect("paused squat");
    repo.create_variation("Front Squat", Some(squat.id))
        .expect("front squat");
    let tempo = repo
        .create_variation("Tempo Paused Squat", Some(paused.id))
        .expect("tempo paused squat");
    let bench = repo.create_variation("Bench Press", None).expect("bench");

    assert!(squat.is_root());
    assert_eq!(
        paused.to_string(),
        "<Variation id=2 Paused Squat parent_id=1>"
    );
    assert_eq!(
        names(repo.list_children(Some(squat.id)).expect("children")),
        vec!["Front Squat", "Paused Squat"]
    );
    assert_eq!(
        names(repo.list_children(None).expect("children")),
        vec!["Bench Press", "Squat"]
    );
    assert_eq!(
        names(repo.lineage(tempo.id).expect("lineage")),
        vec!["Squat", "Paused Squat", "Tempo Paused Squat"]
    );
    let bench_lineage = repo.lineage(bench.id).expect("bench lineage");
    assert_eq!(names(bench_lineage), vec!["Bench Press"]);
}

#[test]
fn deleting_a_variation_removes_its_subtree() {
    let conn = open_db_in_memory(Schema::SelfReferential).expect("in-memory db");
    let repo = SqliteVariationRepository::try_new(&conn).expect("schema ready");
    let squat = repo.create_variation("Squat", None).expect("squat");
    let paused = repo
        .create_variation("Paused Squat", Some(squat.id))
        .expect("paused squat");
    let tempo = repo
        .create_variation("Tempo Paused Squat", Some(paused.id))
        .expect("tempo paused squat");
    let front = repo
        .create_variation("Front Squat", Some(squat.id))
        .expect("front squat");

    let removed = repo.delete_variation(paused.id).expect("subtree delete");
    assert_eq!(removed, 2);

    let tempo = repo.get_variation(tempo.id).expect("tempo lookup");
    assert!(tempo.is_none());
    let kept = repo.get_variation(front.id).expect("front lookup");
    assert_eq!(kept, Some(front));
    assert!(matches!(
        repo.delete_variation(paused.id).expect_err("delete fails"),
        RepoError::NotFound {
            entity: "variation",
            ..
        }
    ));
}

#[test]
fn reparent_moves_subtree_and_rejects_cycles() {
    let conn = open_db_in_memory(Schema::SelfReferential).expect("in-memory db");
    let repo = SqliteVariationRepository::try_new(&conn).expect("schema ready");
    let squat = repo.create_variation("Squat", None).expect("squat");
    let paused = repo
        .create_variation("Paused Squat", Some(squat.id))
        .expect("paused squat");
    let tempo = repo
        .create_variation("Tempo Paused Squat", Some(paused.id))
        .expect("tempo paused squat");

    let under_descendant = repo.reparent(squat.id, Some(tempo.id));
    assert!(matches!(under_descendant, Err(RepoError::InvalidData(_))));
    let under_itself = repo.reparent(squat.id, Some(squat.id));
    assert!(matches!(under_itself, Err(RepoError::InvalidData(_))));

    repo.reparent(tempo.id, None).expect("move to root");
    assert_eq!(
        names(repo.lineage(tempo.id).expect("lineage")),
        vec!["Tempo Paused Squat"]
    );
    let orphaned = repo
        .list_children(Some(paused.id))
        .expect("children of paused");
    assert!(orphaned.is_empty());
}

#[test]
fn names_are_unique_and_parents_must_exist() {
    let conn = open_db_in_memory(Schema::SelfReferential).expect("in-memory db");
    let repo = SqliteVariationRepository::try_new(&conn).expect("schema ready");
    repo.create_variation("Squat", None).expect("squat");

    assert!(repo
        .create_variation("Squat", None)
        .expect_err("create fails")
        .is_constraint_violation());
    assert!(repo
        .create_variation("Box Squat", Some(99))
        .expect_err("create fails")
        .is_constraint_violation());
    assert!(matches!(
        repo.lineage(99).expect_err("lineage fails"),
        RepoError::NotFound { id: 99, .. }
    ));
}
