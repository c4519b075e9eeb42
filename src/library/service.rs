// MyLibrary - Personal Book Tracking Service
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Library service: the sole authority for book lifecycle rules
//!
//! All callers (the HTTP mapping layer, CLI, tests) go through this service
//! rather than touching storage directly. It validates and normalizes input,
//! enforces the duplicate policy, and decodes the authors column before
//! anything leaves the crate.
//!
//! # Duplicate policy
//! Title is the service-level de-duplication key: a case-insensitive exact
//! title match is checked before every insert and rejected as
//! `DuplicateBook`. ISBN is the store-level physical key; a collision there
//! surfaces as `DuplicateIsbn` from the adapter. Both are enforced.
//!
//! The title check and the insert are not atomic. Two concurrent adds of the
//! same title can both pass the check; the guard is best-effort, and only an
//! ISBN collision is rejected deterministically by the store.

use tracing::{debug, info};

use crate::error::{LibraryError, Result};
use crate::library::throttle::RateLimiter;
use crate::storage::models::{encode_authors, Book, NewBook, NewBookRow, ReadingStatus};
use crate::storage::{queries, Database};

const MAX_TITLE_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Library service over a single database
///
/// Stateless between calls apart from the pooled store connection, which is
/// acquired per-statement and released on every exit path.
#[derive(Debug)]
pub struct LibraryService {
    db: Database,
    throttle: Option<RateLimiter>,
}

impl LibraryService {
    pub fn new(db: Database) -> Self {
        Self { db, throttle: None }
    }

    /// Attach a call-throttling policy
    ///
    /// Every service operation then counts against the limiter under its
    /// operation name.
    pub fn with_throttle(db: Database, throttle: RateLimiter) -> Self {
        Self {
            db,
            throttle: Some(throttle),
        }
    }

    /// Add a book to the library
    ///
    /// Validates and normalizes the input, rejects duplicates by
    /// case-insensitive title (`DuplicateBook`) and by ISBN
    /// (`DuplicateIsbn`), and returns the created book with its
    /// store-assigned id. Status defaults to `unread`.
    pub async fn add_book(&self, new_book: NewBook) -> Result<Book> {
        self.check_throttle("add_book")?;

        let status = match new_book.status.as_deref() {
            Some(raw) => raw.parse::<ReadingStatus>()?,
            None => ReadingStatus::default(),
        };

        let title = new_book.title.trim().to_string();
        validate_title(&title)?;

        if let Some(description) = new_book.description.as_deref() {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(LibraryError::InvalidInput(format!(
                    "Description must not exceed {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }

        let authors = new_book.authors.into_names();
        if authors.is_empty() {
            return Err(LibraryError::InvalidInput(
                "At least one author is required".to_string(),
            ));
        }

        // Empty ISBN strings from form-shaped callers mean "no ISBN"
        let isbn = new_book
            .isbn
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        // Title-level guard; the ISBN unique constraint backstops at insert
        if queries::find_book_by_title(self.db.pool(), &title).await?.is_some() {
            debug!(%title, "rejected duplicate title");
            return Err(LibraryError::DuplicateBook(title));
        }

        let row = NewBookRow {
            isbn,
            title,
            authors: encode_authors(&authors)?,
            description: new_book.description,
            cover_art: new_book.cover_art,
            status,
        };

        let id = queries::insert_book(self.db.pool(), &row).await?;

        let inserted = queries::find_book_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| LibraryError::NotFound(format!("Book id {id} vanished after insert")))?;

        let book = Book::from_row(inserted)?;
        info!(id = book.id, title = %book.title, status = %book.status, "book added to library");
        Ok(book)
    }

    /// Retrieve all books, decoded and sorted for display
    ///
    /// Ascending by the case-insensitive last token of the first author's
    /// name; books with no authors sort first. The sort is stable, so equal
    /// keys keep store retrieval order. Never fails on an empty library.
    pub async fn get_all_books(&self) -> Result<Vec<Book>> {
        self.check_throttle("get_books")?;

        let rows = queries::list_books(self.db.pool()).await?;

        let mut books = rows
            .into_iter()
            .map(Book::from_row)
            .collect::<Result<Vec<_>>>()?;

        books.sort_by_cached_key(Book::author_sort_key);

        debug!(count = books.len(), "listed library");
        Ok(books)
    }

    /// Find a book by case-insensitive exact title match
    ///
    /// Titles that could never have been stored simply come back as `None`.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Book>> {
        self.check_throttle("find_by_title")?;

        match queries::find_book_by_title(self.db.pool(), title).await? {
            Some(row) => Ok(Some(Book::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Update the reading status of the book with the given title
    ///
    /// The status string is validated against the closed enum before any
    /// store access. Matches the title case-insensitively; zero matching
    /// rows fail with `NotFound` rather than silently succeeding.
    pub async fn update_status(&self, title: &str, status: &str) -> Result<ReadingStatus> {
        self.check_throttle("update_status")?;

        let status = status.parse::<ReadingStatus>()?;

        let affected =
            queries::update_status_by_title(self.db.pool(), title, status.as_str()).await?;
        if affected == 0 {
            return Err(LibraryError::NotFound(format!(
                "No book found with the title '{title}'"
            )));
        }

        info!(%title, status = %status, "updated reading status");
        Ok(status)
    }

    /// Remove the book with the given exact ISBN
    pub async fn delete_book(&self, isbn: &str) -> Result<()> {
        self.check_throttle("delete_book")?;

        let affected = queries::delete_book_by_isbn(self.db.pool(), isbn).await?;
        if affected == 0 {
            return Err(LibraryError::NotFound(format!(
                "No book found with ISBN '{isbn}'"
            )));
        }

        info!(%isbn, "deleted book");
        Ok(())
    }

    /// The database this service operates on
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn check_throttle(&self, operation: &str) -> Result<()> {
        if let Some(throttle) = &self.throttle {
            throttle.check(operation)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(LibraryError::InvalidInput(
            "Title is required and must be a non-empty string".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(LibraryError::InvalidInput(format!(
            "Title must not exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::models::AuthorsInput;

    async fn service() -> LibraryService {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        LibraryService::new(db)
    }

    fn book(title: &str, authors: &[&str]) -> NewBook {
        NewBook::new(
            title,
            AuthorsInput::List(authors.iter().map(|a| a.to_string()).collect()),
        )
    }

    #[tokio::test]
    async fn test_add_book_defaults_to_unread() {
        let service = service().await;

        let added = service
            .add_book(book("The Hobbit", &["J.R.R. Tolkien"]))
            .await
            .expect("Failed to add book");

        assert!(added.id > 0);
        assert_eq!(added.status, ReadingStatus::Unread);
        assert_eq!(added.authors, vec!["J.R.R. Tolkien".to_string()]);
    }

    #[tokio::test]
    async fn test_add_book_authors_round_trip_through_find() {
        let service = service().await;

        let authors = vec![
            "Terry Pratchett".to_string(),
            "Neil Gaiman".to_string(),
        ];
        let mut new_book = book("Good Omens", &[]);
        new_book.authors = AuthorsInput::List(authors.clone());
        service.add_book(new_book).await.expect("Failed to add book");

        // Different casing than submitted
        let found = service
            .find_by_title("GOOD OMENS")
            .await
            .expect("Failed to find book")
            .expect("Book not found");

        assert_eq!(found.authors, authors);
    }

    #[tokio::test]
    async fn test_add_book_normalizes_joined_authors() {
        let service = service().await;

        let added = service
            .add_book(NewBook::new("Dune", "By Frank Herbert, Brian Herbert"))
            .await
            .expect("Failed to add book");

        assert_eq!(
            added.authors,
            vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_duplicate_title_rejected_and_store_unchanged() {
        let service = service().await;

        service
            .add_book(book("The Hobbit", &["J.R.R. Tolkien"]))
            .await
            .expect("Failed to add book");

        let mut second = book("the hobbit", &["Somebody Else"]);
        second.isbn = Some("9780000000009".to_string());
        let err = service.add_book(second).await.expect_err("Duplicate title must fail");
        assert!(matches!(err, LibraryError::DuplicateBook(title) if title == "the hobbit"));

        let count = queries::count_books(service.database().pool()).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_isbn_rejected() {
        let service = service().await;

        let mut first = book("Dune", &["Frank Herbert"]);
        first.isbn = Some("9780441013593".to_string());
        service.add_book(first).await.expect("Failed to add book");

        let mut second = book("Dune Messiah", &["Frank Herbert"]);
        second.isbn = Some("9780441013593".to_string());
        let err = service.add_book(second).await.expect_err("Duplicate ISBN must fail");
        assert!(matches!(err, LibraryError::DuplicateIsbn(isbn) if isbn == "9780441013593"));
    }

    #[tokio::test]
    async fn test_add_book_invalid_status_rejected_before_insert() {
        let service = service().await;

        let mut new_book = book("The Hobbit", &["J.R.R. Tolkien"]);
        new_book.status = Some("finished".to_string());
        let err = service.add_book(new_book).await.expect_err("Invalid status must fail");
        assert!(matches!(err, LibraryError::InvalidStatus(s) if s == "finished"));

        let count = queries::count_books(service.database().pool()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_add_book_validation_errors() {
        let service = service().await;

        let err = service
            .add_book(book("   ", &["Someone"]))
            .await
            .expect_err("Empty title must fail");
        assert!(matches!(err, LibraryError::InvalidInput(_)));

        let err = service
            .add_book(book(&"x".repeat(256), &["Someone"]))
            .await
            .expect_err("Overlong title must fail");
        assert!(matches!(err, LibraryError::InvalidInput(_)));

        let mut no_authors = book("Nameless", &[]);
        no_authors.authors = AuthorsInput::Joined(", ,".to_string());
        let err = service
            .add_book(no_authors)
            .await
            .expect_err("Empty author list must fail");
        assert!(matches!(err, LibraryError::InvalidInput(_)));

        let mut long_description = book("Long", &["Someone"]);
        long_description.description = Some("d".repeat(1001));
        let err = service
            .add_book(long_description)
            .await
            .expect_err("Overlong description must fail");
        assert!(matches!(err, LibraryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_all_books_sorted_by_first_author_surname() {
        let service = service().await;

        service.add_book(book("The Hobbit", &["J.R.R. Tolkien"])).await.unwrap();
        service.add_book(book("Dune", &["Frank Herbert"])).await.unwrap();
        service.add_book(book("1984", &["George Orwell"])).await.unwrap();

        let books = service.get_all_books().await.expect("Failed to list books");
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        // herbert < orwell < tolkien
        assert_eq!(titles, vec!["Dune", "1984", "The Hobbit"]);
    }

    #[tokio::test]
    async fn test_get_all_books_empty_library() {
        let service = service().await;
        let books = service.get_all_books().await.expect("Empty library must not fail");
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_update_status_unknown_title_is_not_found() {
        let service = service().await;

        let err = service
            .update_status("The Hobbit", "read")
            .await
            .expect_err("Unknown title must fail");
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_status_changes_only_status() {
        let service = service().await;

        let mut new_book = book("The Hobbit", &["J.R.R. Tolkien"]);
        new_book.isbn = Some("9780547928227".to_string());
        new_book.description = Some("A fantasy novel".to_string());
        let added = service.add_book(new_book).await.unwrap();

        let status = service
            .update_status("the hobbit", "read")
            .await
            .expect("Failed to update status");
        assert_eq!(status, ReadingStatus::Read);

        let updated = service
            .find_by_title("The Hobbit")
            .await
            .unwrap()
            .expect("Book not found after update");
        assert_eq!(updated.status, ReadingStatus::Read);
        assert_eq!(updated.id, added.id);
        assert_eq!(updated.isbn, added.isbn);
        assert_eq!(updated.authors, added.authors);
        assert_eq!(updated.description, added.description);
    }

    #[tokio::test]
    async fn test_update_status_invalid_status_before_storage() {
        let service = service().await;

        let err = service
            .update_status("The Hobbit", "finished")
            .await
            .expect_err("Invalid status must fail");
        assert!(matches!(err, LibraryError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn test_delete_book_by_isbn() {
        let service = service().await;

        let mut new_book = book("Dune", &["Frank Herbert"]);
        new_book.isbn = Some("9780441013593".to_string());
        service.add_book(new_book).await.unwrap();

        let err = service
            .delete_book("0000000000000")
            .await
            .expect_err("Unknown ISBN must fail");
        assert!(matches!(err, LibraryError::NotFound(_)));

        service.delete_book("9780441013593").await.expect("Failed to delete book");

        let found = service.find_by_title("Dune").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_throttled_service_rejects_rapid_calls() {
        let db = Database::new_in_memory().await.unwrap();
        let service = LibraryService::with_throttle(db, RateLimiter::new(Duration::from_secs(60)));

        service.get_all_books().await.expect("First call must pass");
        let err = service
            .get_all_books()
            .await
            .expect_err("Second call must be throttled");
        assert!(matches!(err, LibraryError::RateLimitExceeded { .. }));

        // Other operations are keyed independently
        service
            .add_book(book("The Hobbit", &["J.R.R. Tolkien"]))
            .await
            .expect("Different operation must pass");
    }
}
