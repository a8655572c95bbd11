//! Command-line front end for the bookshelf catalog.
//!
//! Opens (and migrates) a SQLite file, then runs one catalog operation and
//! prints the result as JSON.

use anyhow::{anyhow, bail, Context, Result};
use bookshelf_core::db::open_db;
use bookshelf_core::{
    default_log_level, init_logging, parse_log_level, render_schema, sqlite_catalog, AuthorId,
    BookId,
};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;

/// Bookshelf - authors, books and who wrote what
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file (created and migrated on first use)
    #[arg(long, env = "BOOKSHELF_DB", default_value = "bookshelf.sqlite3", global = true)]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error; takes effect with --log-dir
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "BOOKSHELF_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Print the DDL of every mapped table
    Schema,

    #[command(flatten)]
    Catalog(CatalogCommand),
}

/// Subcommands that read or write the database.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum CatalogCommand {
    /// Add an author
    AddAuthor {
        /// Author name (at most 25 characters)
        name: String,
    },

    /// Add a book
    AddBook {
        title: String,

        /// Year of first publication
        #[arg(short, long)]
        year: Option<i64>,
    },

    /// Credit an author on a book
    Credit { book_id: BookId, author_id: AuthorId },

    /// Remove every credit of an author on a book
    Uncredit { book_id: BookId, author_id: AuthorId },

    /// Show an author with their books
    Author { id: AuthorId },

    /// Show a book with its authors
    Book { id: BookId },

    /// List all authors
    Authors,

    /// List all books
    Books,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = resolve_log_level(cli.log_level.as_deref())?;
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(level, log_dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    match cli.command {
        Commands::Schema => {
            println!("{}", render_schema());
            Ok(())
        }
        Commands::Catalog(command) => {
            let conn = open_db(&cli.db)
                .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
            run(&conn, command)
        }
    }
}

/// Validates the requested level, falling back to the build default.
fn resolve_log_level(requested: Option<&str>) -> Result<&'static str> {
    match requested {
        Some(level) => parse_log_level(level).map_err(|err| anyhow!("{err}")),
        None => Ok(default_log_level()),
    }
}

fn run(conn: &Connection, command: CatalogCommand) -> Result<()> {
    let catalog = sqlite_catalog(conn)?;

    match command {
        CatalogCommand::AddAuthor { name } => print_json(&catalog.register_author(name)?)?,
        CatalogCommand::AddBook { title, year } => {
            print_json(&catalog.register_book(title, year)?)?
        }
        CatalogCommand::Credit { book_id, author_id } => {
            print_json(&catalog.credit_author(book_id, author_id)?)?
        }
        CatalogCommand::Uncredit { book_id, author_id } => {
            let removed = catalog.withdraw_credit(book_id, author_id)?;
            println!("removed {removed} credit row(s)");
        }
        CatalogCommand::Author { id } => match catalog.author_profile(id)? {
            Some(profile) => print_json(&profile)?,
            None => bail!("author {id} not found"),
        },
        CatalogCommand::Book { id } => match catalog.book_credits(id)? {
            Some(credits) => print_json(&credits)?,
            None => bail!("book {id} not found"),
        },
        CatalogCommand::Authors => print_json(&catalog.list_authors()?)?,
        CatalogCommand::Books => print_json(&catalog.list_books()?)?,
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{resolve_log_level, CatalogCommand, Cli, Commands};
    use bookshelf_core::default_log_level;
    use clap::Parser;

    #[test]
    fn log_level_is_validated_without_log_dir() {
        assert_eq!(resolve_log_level(Some("WARNING")).unwrap(), "warn");
        assert_eq!(resolve_log_level(None).unwrap(), default_log_level());

        let err = resolve_log_level(Some("loud")).unwrap_err();
        assert!(err.to_string().contains("unsupported log level"));
    }

    #[test]
    fn schema_parses_as_its_own_command() {
        let cli = Cli::try_parse_from(["bookshelf", "schema"]).unwrap();
        assert_eq!(cli.command, Commands::Schema);
    }

    #[test]
    fn catalog_subcommands_parse_at_top_level() {
        let cli = Cli::try_parse_from(["bookshelf", "credit", "3", "7"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Catalog(CatalogCommand::Credit {
                book_id: 3,
                author_id: 7,
            })
        );

        let cli = Cli::try_parse_from(["bookshelf", "add-book", "Dune", "--year", "1965"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Catalog(CatalogCommand::AddBook {
                title: "Dune".to_string(),
                year: Some(1965),
            })
        );
    }
}
