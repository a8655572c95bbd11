//! Catalog use-case service.
//!
//! # Responsibility
//! - Register authors and books, credit authors on books.
//! - Load an author together with its books (and the reverse) in one call.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::model::book::{Book, BookId, NewBook};
use crate::model::book_author::BookAuthorLink;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_author_repo::BookAuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::RepoResult;
use log::{info, warn};
use serde::Serialize;

/// An author with its associated books loaded eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub author: Author,
    pub books: Vec<Book>,
}

/// A book with the authors credited on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCredits {
    pub book: Book,
    pub authors: Vec<Author>,
}

/// Use-case service over the three catalog repositories.
pub struct CatalogService<A, B, L>
where
    A: AuthorRepository,
    B: BookRepository,
    L: BookAuthorRepository,
{
    authors: A,
    books: B,
    links: L,
}

impl<A, B, L> CatalogService<A, B, L>
where
    A: AuthorRepository,
    B: BookRepository,
    L: BookAuthorRepository,
{
    pub fn new(authors: A, books: B, links: L) -> Self {
        Self {
            authors,
            books,
            links,
        }
    }

    /// Creates an author. Over-long names are rejected by the database.
    pub fn register_author(&self, name: impl Into<String>) -> RepoResult<Author> {
        let author = self.authors.create_author(&NewAuthor::new(name))?;
        info!(
            "event=register_author module=service status=ok author_id={}",
            author.id
        );
        Ok(author)
    }

    pub fn register_book(
        &self,
        title: impl Into<String>,
        publication_year: Option<i64>,
    ) -> RepoResult<Book> {
        let book = self.books.create_book(&NewBook::new(title, publication_year))?;
        info!(
            "event=register_book module=service status=ok book_id={}",
            book.id
        );
        Ok(book)
    }

    /// Credits `author_id` on `book_id`.
    ///
    /// Crediting the same pair twice stores two association rows.
    pub fn credit_author(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<BookAuthorLink> {
        match self.links.link(book_id, author_id) {
            Ok(link) => {
                info!(
                    "event=credit_author module=service status=ok book_id={} author_id={}",
                    book_id, author_id
                );
                Ok(link)
            }
            Err(err) => {
                warn!(
                    "event=credit_author module=service status=error book_id={} author_id={} error={}",
                    book_id, author_id, err
                );
                Err(err)
            }
        }
    }

    /// Removes every credit for the pair and returns how many rows went away.
    pub fn withdraw_credit(&self, book_id: BookId, author_id: AuthorId) -> RepoResult<usize> {
        self.links.unlink(book_id, author_id)
    }

    /// Loads an author and its books, or `None` when the author does not exist.
    pub fn author_profile(&self, author_id: AuthorId) -> RepoResult<Option<AuthorProfile>> {
        let Some(author) = self.authors.get_author(author_id)? else {
            return Ok(None);
        };
        let books = self.links.get_books_for_author(author_id)?;
        Ok(Some(AuthorProfile { author, books }))
    }

    /// Loads a book and its credited authors, or `None` when the book does not exist.
    pub fn book_credits(&self, book_id: BookId) -> RepoResult<Option<BookCredits>> {
        let Some(book) = self.books.get_book(book_id)? else {
            return Ok(None);
        };
        let authors = self.links.get_authors_for_book(book_id)?;
        Ok(Some(BookCredits { book, authors }))
    }

    pub fn list_authors(&self) -> RepoResult<Vec<Author>> {
        self.authors.list_authors()
    }

    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.books.list_books()
    }

    /// Deletes an author and its credits.
    pub fn retire_author(&self, author_id: AuthorId) -> RepoResult<()> {
        self.authors.delete_author(author_id)?;
        info!(
            "event=retire_author module=service status=ok author_id={}",
            author_id
        );
        Ok(())
    }

    /// Deletes a book. Fails while any author is still credited on it.
    pub fn retire_book(&self, book_id: BookId) -> RepoResult<()> {
        self.books.delete_book(book_id)?;
        info!(
            "event=retire_book module=service status=ok book_id={}",
            book_id
        );
        Ok(())
    }
}
