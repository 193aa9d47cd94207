//! Parent/child records for the required and optional link schemas.

use super::RowId;
use std::fmt::{Display, Formatter};

/// Parent owning a list of children (required link lives on the child).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub id: RowId,
    pub children: Vec<Child>,
}

/// Child row pointing at exactly one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child {
    pub id: RowId,
    pub parent_id: RowId,
}

/// Parent holding an optional pointer to a shared child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedParent {
    pub id: RowId,
    pub child_id: Option<RowId>,
}

/// Child referenced by zero or more parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedChild {
    pub id: RowId,
    /// Ascending by parent id.
    pub parent_ids: Vec<RowId>,
}

impl Display for Parent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Parent id={} children={}>",
            self.id,
            self.children.len()
        )
    }
}

impl Display for Child {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Child id={} parent_id={}>", self.id, self.parent_id)
    }
}

impl Display for LinkedParent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.child_id {
            Some(child_id) => write!(f, "<Parent id={} child_id={child_id}>", self.id),
            None => write!(f, "<Parent id={} child_id=None>", self.id),
        }
    }
}

impl Display for SharedChild {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Child id={} parents={}>",
            self.id,
            self.parent_ids.len()
        )
    }
}
