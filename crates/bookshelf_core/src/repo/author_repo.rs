//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting an author also removes every `book_author` row naming it, in
//!   the same transaction. The author owns the association.

use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::repo::{RepoError, RepoResult};
use crate::schema::{verify_table, AUTHORS, BOOK_AUTHOR};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";

/// Repository interface for `authors` rows.
pub trait AuthorRepository {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    /// Lists all authors ordered by id.
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    /// Deletes an author together with its book links.
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// SQLite-backed author repository.
#[derive(Clone, Copy)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_table(conn, &AUTHORS)?;
        verify_table(conn, &BOOK_AUTHOR)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        self.conn.execute(
            "INSERT INTO authors (id, name) VALUES (?1, ?2);",
            params![author.id, author.name.as_deref()],
        )?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: author.name.clone(),
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let authors = stmt
            .query_map([], parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE authors SET name = ?2 WHERE id = ?1;",
            params![author.id, author.name.as_deref()],
        )?;

        if changed == 0 {
            return Err(RepoError::AuthorNotFound(author.id));
        }

        Ok(())
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM book_author WHERE author_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::AuthorNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
