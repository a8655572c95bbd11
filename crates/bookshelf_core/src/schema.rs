//! Declarative table mapping for the bookshelf schema.
//!
//! # Responsibility
//! - Describe the persisted record shapes as static descriptors.
//! - Render DDL from those descriptors and verify live connections against them.
//!
//! # Invariants
//! - `book_author` carries no primary key, unique constraint or ordering
//!   column. Duplicate pairs are storable and iteration order is undefined.
//! - Bounded text columns are enforced by the engine through `CHECK`, since
//!   SQLite ignores `VARCHAR(N)` lengths. NULs are replaced before counting
//!   because `length()` stops at the first NUL.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Maximum number of characters allowed in `authors.name`.
pub const AUTHOR_NAME_MAX_CHARS: usize = 25;

/// Column storage class as declared to SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    /// Declared type name used in DDL and reported by `PRAGMA table_info`.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// Target of a foreign-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: &'static str,
    pub column: &'static str,
}

/// One column of a mapped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    /// Upper bound on text length in characters, if any.
    pub max_chars: Option<usize>,
    pub references: Option<ForeignKeyRef>,
}

impl ColumnDef {
    const fn plain(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            max_chars: None,
            references: None,
        }
    }

    const fn key(name: &'static str) -> Self {
        Self {
            primary_key: true,
            ..Self::plain(name, SqlType::Integer)
        }
    }

    const fn bounded_text(name: &'static str, max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Self::plain(name, SqlType::Text)
        }
    }

    const fn foreign_key(name: &'static str, table: &'static str, column: &'static str) -> Self {
        Self {
            references: Some(ForeignKeyRef { table, column }),
            ..Self::plain(name, SqlType::Integer)
        }
    }

    fn render(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if let Some(max_chars) = self.max_chars {
            sql.push_str(&format!(
                " CHECK ({name} IS NULL OR length(replace({name}, char(0), ' ')) <= {max_chars})",
                name = self.name
            ));
        }
        if let Some(target) = self.references {
            sql.push_str(&format!(" REFERENCES {}({})", target.table, target.column));
        }
        sql
    }
}

/// A mapped table: name plus ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` DDL for this table.
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("    {}", column.render()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE IF NOT EXISTS {} (\n{columns}\n);", self.name)
    }
}

pub const AUTHORS: TableDef = TableDef {
    name: "authors",
    columns: &[
        ColumnDef::key("id"),
        ColumnDef::bounded_text("name", AUTHOR_NAME_MAX_CHARS),
    ],
};

pub const BOOKS: TableDef = TableDef {
    name: "books",
    columns: &[
        ColumnDef::key("id"),
        ColumnDef::plain("title", SqlType::Text),
        ColumnDef::plain("publication_year", SqlType::Integer),
    ],
};

pub const BOOK_AUTHOR: TableDef = TableDef {
    name: "book_author",
    columns: &[
        ColumnDef::foreign_key("book_id", "books", "id"),
        ColumnDef::foreign_key("author_id", "authors", "id"),
    ],
};

/// All mapped tables in dependency order.
pub const TABLES: &[TableDef] = &[AUTHORS, BOOKS, BOOK_AUTHOR];

/// Renders DDL for every mapped table.
pub fn render_schema() -> String {
    TABLES
        .iter()
        .map(TableDef::create_table_sql)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Checks that `conn` holds every mapped table, column and foreign key.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    for table in TABLES {
        verify_table(conn, table)?;
    }
    Ok(())
}

/// Checks a single mapped table against `conn`.
pub fn verify_table(conn: &Connection, table: &TableDef) -> DbResult<()> {
    if !table_exists(conn, table.name)? {
        return Err(mismatch(table, "table is missing".to_string()));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
    let live_columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in table.columns {
        let declared = live_columns
            .iter()
            .find(|(name, _)| name == column.name)
            .map(|(_, declared)| declared.as_str());
        match declared {
            None => {
                return Err(mismatch(
                    table,
                    format!("column `{}` is missing", column.name),
                ))
            }
            Some(declared) if !declared.eq_ignore_ascii_case(column.sql_type.as_sql()) => {
                return Err(mismatch(
                    table,
                    format!(
                        "column `{}` declared as `{declared}`, expected `{}`",
                        column.name,
                        column.sql_type.as_sql()
                    ),
                ))
            }
            Some(_) => {}
        }
    }

    let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({});", table.name))?;
    let live_keys = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>("from")?,
                row.get::<_, String>("table")?,
                row.get::<_, String>("to")?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for column in table.columns {
        let Some(target) = column.references else {
            continue;
        };
        let present = live_keys.iter().any(|(from, to_table, to_column)| {
            from == column.name && to_table == target.table && to_column == target.column
        });
        if !present {
            return Err(mismatch(
                table,
                format!(
                    "foreign key `{}` -> `{}.{}` is missing",
                    column.name, target.table, target.column
                ),
            ));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn mismatch(table: &TableDef, detail: String) -> DbError {
    DbError::SchemaMismatch {
        table: table.name,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::{render_schema, verify_schema, AUTHORS, BOOK_AUTHOR, BOOKS, TABLES};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn authors_ddl_bounds_name_length() {
        let sql = AUTHORS.create_table_sql();
        assert!(sql.contains("id INTEGER PRIMARY KEY"));
        assert!(sql.contains(
            "CHECK (name IS NULL OR length(replace(name, char(0), ' ')) <= 25)"
        ));
    }

    #[test]
    fn join_table_ddl_declares_references_without_keys() {
        let sql = BOOK_AUTHOR.create_table_sql();
        assert!(sql.contains("book_id INTEGER REFERENCES books(id)"));
        assert!(sql.contains("author_id INTEGER REFERENCES authors(id)"));
        assert!(!sql.contains("PRIMARY KEY"));
        assert!(!sql.contains("UNIQUE"));
    }

    #[test]
    fn column_lookup_finds_declared_columns() {
        assert!(BOOKS.column("publication_year").is_some());
        assert!(BOOKS.column("isbn").is_none());
        assert_eq!(AUTHORS.column("name").and_then(|c| c.max_chars), Some(25));
    }

    #[test]
    fn rendered_schema_passes_verification() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&render_schema()).unwrap();
        verify_schema(&conn).unwrap();
    }

    #[test]
    fn verification_reports_missing_foreign_key() {
        let conn = Connection::open_in_memory().unwrap();
        for table in &TABLES[..2] {
            conn.execute_batch(&table.create_table_sql()).unwrap();
        }
        conn.execute_batch("CREATE TABLE book_author (book_id INTEGER, author_id INTEGER);")
            .unwrap();

        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(
            err,
            DbError::SchemaMismatch { table: "book_author", .. }
        ));
    }

    #[test]
    fn verification_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = verify_schema(&conn).unwrap_err();
        assert!(matches!(err, DbError::SchemaMismatch { table: "authors", .. }));
    }
}
