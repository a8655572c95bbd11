//! Book repository contract and SQLite implementation.
//!
//! # Invariants
//! - `Book` declares no relationship, so deleting a book never touches
//!   `book_author`. A linked book cannot be deleted until its links are gone.

use crate::model::book::{Book, BookId, NewBook};
use crate::repo::{RepoError, RepoResult};
use crate::schema::{verify_table, BOOKS};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT id, title, publication_year FROM books";

/// Repository interface for `books` rows.
pub trait BookRepository {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists all books ordered by id.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
}

/// SQLite-backed book repository.
#[derive(Clone, Copy)]
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_table(conn, &BOOKS)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        self.conn.execute(
            "INSERT INTO books (id, title, publication_year) VALUES (?1, ?2, ?3);",
            params![book.id, book.title.as_deref(), book.publication_year],
        )?;

        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title: book.title.clone(),
            publication_year: book.publication_year,
        })
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let books = stmt
            .query_map([], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books SET title = ?2, publication_year = ?3 WHERE id = ?1;",
            params![book.id, book.title.as_deref(), book.publication_year],
        )?;

        if changed == 0 {
            return Err(RepoError::BookNotFound(book.id));
        }

        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::BookNotFound(id));
        }
        Ok(())
    }
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        publication_year: row.get("publication_year")?,
    })
}
