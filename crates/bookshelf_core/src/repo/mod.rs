//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Expose explicit CRUD and relationship accessors per mapped table.
//! - Translate SQLite failures into semantic repository errors.
//!
//! # Invariants
//! - Constraint enforcement stays in SQLite; repositories only classify the
//!   resulting failures and never pre-validate record contents.
//! - Relationship navigation is always an explicit call, never a lazy field.

use crate::db::DbError;
use crate::model::author::AuthorId;
use crate::model::book::BookId;
use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_author_repo;
pub mod book_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Category of a constraint rejected by the database engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A `CHECK` expression failed, e.g. an author name over 25 characters.
    Check,
    /// A referenced row does not exist, or a referenced row is still in use.
    ForeignKey,
    NotNull,
    PrimaryKey,
    Unique,
    Other,
}

impl ConstraintKind {
    /// Maps a SQLite extended result code to a constraint category.
    pub fn from_extended_code(extended_code: i32) -> Self {
        match extended_code {
            ffi::SQLITE_CONSTRAINT_CHECK => Self::Check,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_ROWID => Self::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_UNIQUE => Self::Unique,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::ForeignKey => "foreign_key",
            Self::NotNull => "not_null",
            Self::PrimaryKey => "primary_key",
            Self::Unique => "unique",
            Self::Other => "other",
        }
    }
}

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    AuthorNotFound(AuthorId),
    BookNotFound(BookId),
}

impl RepoError {
    /// Returns the constraint category when this error is a constraint rejection.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Constraint { kind, message } => {
                write!(f, "{} constraint violated: {message}", kind.as_str())
            }
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint {
                    kind: ConstraintKind::from_extended_code(failure.extended_code),
                    message: message.unwrap_or_else(|| failure.to_string()),
                }
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConstraintKind, RepoError};
    use rusqlite::{ffi, Connection};

    #[test]
    fn extended_codes_map_to_constraint_kinds() {
        assert_eq!(
            ConstraintKind::from_extended_code(ffi::SQLITE_CONSTRAINT_CHECK),
            ConstraintKind::Check
        );
        assert_eq!(
            ConstraintKind::from_extended_code(ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            ConstraintKind::ForeignKey
        );
        assert_eq!(
            ConstraintKind::from_extended_code(ffi::SQLITE_CONSTRAINT_ROWID),
            ConstraintKind::PrimaryKey
        );
        assert_eq!(ConstraintKind::from_extended_code(-1), ConstraintKind::Other);
    }

    #[test]
    fn sqlite_check_failure_becomes_constraint_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT CHECK (length(v) <= 2));")
            .unwrap();
        let err: RepoError = conn
            .execute("INSERT INTO t (v) VALUES ('abc');", [])
            .unwrap_err()
            .into();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    }

    #[test]
    fn non_constraint_failure_stays_db_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepoError = conn
            .execute("INSERT INTO missing_table (v) VALUES (1);", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepoError::Db(_)));
        assert_eq!(err.constraint_kind(), None);
    }
}
