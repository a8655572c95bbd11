//! Record types for the bookshelf catalog.
//!
//! # Responsibility
//! - Define plain data records mirroring the `authors`, `books` and
//!   `book_author` tables.
//! - Carry no validation: constraint enforcement belongs to the database.

pub mod author;
pub mod book;
pub mod book_author;
