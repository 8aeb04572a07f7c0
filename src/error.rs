use crate::model::{PersonKey, Quadrant};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Father,
    Mother,
    Spouse,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Father => f.write_str("father"),
            Relation::Mother => f.write_str("mother"),
            Relation::Spouse => f.write_str("spouse"),
        }
    }
}

/// Mutations and imports rejected at the store boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("person {0} does not exist")]
    UnknownPerson(PersonKey),
    #[error("person key {0} is used more than once")]
    DuplicateKey(PersonKey),
    #[error("person {key} cannot be their own {relation}")]
    SelfReference { key: PersonKey, relation: Relation },
    #[error("person {parent} is a descendant of {key} and cannot be recorded as their parent")]
    CircularParent { key: PersonKey, parent: PersonKey },
    #[error("parent {parent} of person {key} does not exist")]
    MissingParent { key: PersonKey, parent: PersonKey },
    #[error("person {key} has more than one marker in the {quadrant} quadrant")]
    QuadrantConflict { key: PersonKey, quadrant: Quadrant },
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid genogram document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] StoreError),
}
