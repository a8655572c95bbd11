//! Author record.

use serde::{Deserialize, Serialize};

/// Surrogate key of an `authors` row.
pub type AuthorId = i64;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    /// At most 25 characters once stored; longer values are rejected on write.
    pub name: Option<String>,
}

/// Insert draft for an author.
///
/// `id` is normally left to the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub id: Option<AuthorId>,
    pub name: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Requests an explicit surrogate key instead of a generated one.
    pub fn with_id(mut self, id: AuthorId) -> Self {
        self.id = Some(id);
        self
    }
}
