//! Self-referential exercise variation records.

use super::RowId;
use std::fmt::{Display, Formatter};

/// Exercise variation; `parent_id = None` marks a base movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseVariation {
    pub id: RowId,
    pub name: String,
    pub parent_id: Option<RowId>,
}

impl ExerciseVariation {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Display for ExerciseVariation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.parent_id {
            Some(parent_id) => write!(
                f,
                "<Variation id={} {} parent_id={parent_id}>",
                self.id, self.name
            ),
            None => write!(f, "<Variation id={} {}>", self.id, self.name),
        }
    }
}
