use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{sqlite_catalog, ConstraintKind};
use std::collections::HashSet;

#[test]
fn author_profile_loads_books_eagerly() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();

    let author = catalog.register_author("Frank Herbert").unwrap();
    let dune = catalog.register_book("Dune", Some(1965)).unwrap();
    let messiah = catalog.register_book("Dune Messiah", Some(1969)).unwrap();
    catalog.credit_author(dune.id, author.id).unwrap();
    catalog.credit_author(messiah.id, author.id).unwrap();

    let profile = catalog.author_profile(author.id).unwrap().unwrap();
    assert_eq!(profile.author, author);
    let titles = profile
        .books
        .into_iter()
        .filter_map(|book| book.title)
        .collect::<HashSet<_>>();
    assert_eq!(
        titles,
        HashSet::from(["Dune".to_string(), "Dune Messiah".to_string()])
    );
}

#[test]
fn missing_records_yield_none() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();

    assert!(catalog.author_profile(1).unwrap().is_none());
    assert!(catalog.book_credits(1).unwrap().is_none());
}

#[test]
fn book_credits_list_every_author() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();

    let book = catalog.register_book("Good Omens", Some(1990)).unwrap();
    let first = catalog.register_author("Terry Pratchett").unwrap();
    let second = catalog.register_author("Neil Gaiman").unwrap();
    catalog.credit_author(book.id, first.id).unwrap();
    catalog.credit_author(book.id, second.id).unwrap();

    let credits = catalog.book_credits(book.id).unwrap().unwrap();
    assert_eq!(credits.book, book);
    assert_eq!(credits.authors.len(), 2);
}

#[test]
fn register_author_surfaces_database_rejection() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();

    let err = catalog
        .register_author("An Author Name Far Too Long")
        .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
}

#[test]
fn credit_author_surfaces_dangling_reference() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();
    let author = catalog.register_author("Frank Herbert").unwrap();

    let err = catalog.credit_author(12, author.id).unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
}

#[test]
fn retire_author_then_book() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();
    let author = catalog.register_author("Frank Herbert").unwrap();
    let book = catalog.register_book("Dune", Some(1965)).unwrap();
    catalog.credit_author(book.id, author.id).unwrap();

    catalog.retire_author(author.id).unwrap();
    catalog.retire_book(book.id).unwrap();

    assert!(catalog.list_authors().unwrap().is_empty());
    assert!(catalog.list_books().unwrap().is_empty());
}

#[test]
fn withdraw_credit_reports_removed_rows() {
    let conn = open_db_in_memory().unwrap();
    let catalog = sqlite_catalog(&conn).unwrap();
    let author = catalog.register_author("Frank Herbert").unwrap();
    let book = catalog.register_book("Dune", Some(1965)).unwrap();
    catalog.credit_author(book.id, author.id).unwrap();
    catalog.credit_author(book.id, author.id).unwrap();

    assert_eq!(catalog.withdraw_credit(book.id, author.id).unwrap(), 2);
    assert!(catalog
        .author_profile(author.id)
        .unwrap()
        .unwrap()
        .books
        .is_empty());
}
