//! Book/author association repository and SQLite implementation.
//!
//! # Responsibility
//! - Write and remove `book_author` rows.
//! - Provide explicit navigation between authors and books through the join table.
//!
//! # Invariants
//! - Duplicate `(book_id, author_id)` pairs are accepted; the table has no
//!   uniqueness constraint.
//! - Navigation returns distinct records ordered by id. Callers must not rely
//!   on that order as a relationship property.
//! - `set_books_for_author` replaces the full collection in one transaction.

use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use crate::model::book_author::BookAuthorLink;
use crate::repo::author_repo::parse_author_row;
use crate::repo::book_repo::parse_book_row;
use crate::repo::{RepoError, RepoResult};
use crate::schema::{verify_table, AUTHORS, BOOKS, BOOK_AUTHOR};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

/// Repository interface for the `book_author` association.
pub trait BookAuthorRepository {
    /// Inserts one join row. Repeating an existing pair stores another row.
    fn link(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<BookAuthorLink>;
    /// Removes every row for the pair and returns how many were removed.
    fn unlink(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<usize>;
    /// Counts stored rows for the pair.
    fn count_links(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<usize>;
    /// Returns raw join rows, duplicates included.
    ///
    /// Rows with a NULL key are skipped; the columns are nullable but this
    /// repository never writes such rows.
    fn list_links(&self) -> RepoResult<Vec<BookAuthorLink>>;
    /// Books associated with `author_id`.
    fn get_books_for_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>>;
    /// Authors associated with `book_id`.
    fn get_authors_for_book(&self, book_id: BookId) -> RepoResult<Vec<Author>>;
    /// Replaces the whole book collection of an author.
    fn set_books_for_author(&self, author_id: AuthorId, book_ids: &[BookId]) -> RepoResult<()>;
}

/// SQLite-backed association repository.
#[derive(Clone, Copy)]
pub struct SqliteBookAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookAuthorRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in [&AUTHORS, &BOOKS, &BOOK_AUTHOR] {
            verify_table(conn, table)?;
        }
        Ok(Self { conn })
    }
}

impl BookAuthorRepository for SqliteBookAuthorRepository<'_> {
    fn link(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<BookAuthorLink> {
        self.conn.execute(
            "INSERT INTO book_author (book_id, author_id) VALUES (?1, ?2);",
            params![book_id, author_id],
        )?;
        Ok(BookAuthorLink { book_id, author_id })
    }

    fn unlink(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM book_author WHERE book_id = ?1 AND author_id = ?2;",
            params![book_id, author_id],
        )?;
        Ok(removed)
    }

    fn count_links(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM book_author WHERE book_id = ?1 AND author_id = ?2;",
            params![book_id, author_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn list_links(&self) -> RepoResult<Vec<BookAuthorLink>> {
        let mut stmt = self.conn.prepare(
            "SELECT book_id, author_id
             FROM book_author
             WHERE book_id IS NOT NULL
               AND author_id IS NOT NULL
             ORDER BY rowid ASC;",
        )?;
        let links = stmt
            .query_map([], |row| {
                Ok(BookAuthorLink {
                    book_id: row.get("book_id")?,
                    author_id: row.get("author_id")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn get_books_for_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, publication_year
             FROM books
             WHERE id IN (
                SELECT book_id FROM book_author WHERE author_id = ?1
             )
             ORDER BY id ASC;",
        )?;
        let books = stmt
            .query_map([author_id], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn get_authors_for_book(&self, book_id: BookId) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM authors
             WHERE id IN (
                SELECT author_id FROM book_author WHERE book_id = ?1
             )
             ORDER BY id ASC;",
        )?;
        let authors = stmt
            .query_map([book_id], parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn set_books_for_author(&self, author_id: AuthorId, book_ids: &[BookId]) -> RepoResult<()> {
        let unique = book_ids.iter().copied().collect::<BTreeSet<_>>();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !author_exists_in_tx(&tx, author_id)? {
            return Err(RepoError::AuthorNotFound(author_id));
        }

        tx.execute("DELETE FROM book_author WHERE author_id = ?1;", [author_id])?;
        for book_id in unique {
            tx.execute(
                "INSERT INTO book_author (book_id, author_id) VALUES (?1, ?2);",
                params![book_id, author_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn author_exists_in_tx(tx: &Transaction<'_>, author_id: AuthorId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);",
        [author_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
