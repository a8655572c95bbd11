//! Core catalog model for bookshelf: authors, books and their association.
//! Persistence is delegated to SQLite; this crate declares the mapping and
//! exposes explicit repository accessors over it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use logging::{
    default_log_level, init_logging, logging_status, parse_log_level, LoggingError,
};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use model::book::{Book, BookId, NewBook};
pub use model::book_author::BookAuthorLink;
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_author_repo::{BookAuthorRepository, SqliteBookAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::{ConstraintKind, RepoError, RepoResult};
pub use schema::{render_schema, TableDef, AUTHOR_NAME_MAX_CHARS};
pub use service::catalog_service::{AuthorProfile, BookCredits, CatalogService};

/// SQLite-backed catalog service over one connection.
pub type SqliteCatalogService<'conn> = CatalogService<
    SqliteAuthorRepository<'conn>,
    SqliteBookRepository<'conn>,
    SqliteBookAuthorRepository<'conn>,
>;

/// Builds a catalog service whose repositories share `conn`.
pub fn sqlite_catalog(conn: &rusqlite::Connection) -> RepoResult<SqliteCatalogService<'_>> {
    Ok(CatalogService::new(
        SqliteAuthorRepository::try_new(conn)?,
        SqliteBookRepository::try_new(conn)?,
        SqliteBookAuthorRepository::try_new(conn)?,
    ))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
