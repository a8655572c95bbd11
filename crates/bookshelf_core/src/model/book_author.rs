//! Join-table row linking a book to one of its authors.

use crate::model::author::AuthorId;
use crate::model::book::BookId;
use serde::{Deserialize, Serialize};

/// One `book_author` row. The pair is not unique; the same link may be
/// stored more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookAuthorLink {
    pub book_id: BookId,
    pub author_id: AuthorId,
}
