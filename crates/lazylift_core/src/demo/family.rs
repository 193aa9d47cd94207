use super::{open_demo_db, DemoOptions, DemoResult};
use crate::db::Schema;
use crate::model::family::SharedChild;
use crate::model::RowId;
use crate::repo::family_repo::{
    ParentChildRepository, ParentLinkRepository, SqliteParentChildRepository,
    SqliteParentLinkRepository,
};
use crate::repo::RepoError;
use std::io::Write;

/// Parent with two children; prints the child list and both children.
pub fn parent_child(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::ParentChild, options)?;
    let repo = SqliteParentChildRepository::try_new(&conn)?;

    let parent = repo.create_parent_with_children(2)?;
    let listed = parent
        .children
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    writeln!(out, "{parent}")?;
    writeln!(out, "[{}]", listed.join(", "))?;
    writeln!(out, "{}", listed.join(" "))?;
    Ok(())
}

/// Two parents share one child, a third has none; then one link is cleared.
pub fn nullable_many_to_one(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::NullableManyToOne, options)?;
    let repo = SqliteParentLinkRepository::try_new(&conn)?;

    let child = repo.create_child()?;
    let first = repo.create_parent(Some(child.id))?;
    let second = repo.create_parent(Some(child.id))?;
    let orphan = repo.create_parent(None)?;
    for parent in [first, second, orphan] {
        writeln!(out, "{parent}")?;
    }
    writeln!(out, "{}", load_child(&repo, child.id)?)?;

    let cleared = repo.set_child(second.id, None)?;
    writeln!(out, "{cleared}")?;
    writeln!(out, "{}", load_child(&repo, child.id)?)?;
    Ok(())
}

fn load_child(repo: &SqliteParentLinkRepository<'_>, child_id: RowId) -> DemoResult<SharedChild> {
    let child = repo.get_child(child_id)?.ok_or(RepoError::NotFound {
        entity: "child",
        id: child_id,
    })?;
    Ok(child)
}
