//! Book record.

use serde::{Deserialize, Serialize};

/// Surrogate key of a `books` row.
pub type BookId = i64;

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: Option<String>,
    pub publication_year: Option<i64>,
}

/// Insert draft for a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub id: Option<BookId>,
    pub title: Option<String>,
    pub publication_year: Option<i64>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, publication_year: Option<i64>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            publication_year,
        }
    }

    /// Requests an explicit surrogate key instead of a generated one.
    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }
}
