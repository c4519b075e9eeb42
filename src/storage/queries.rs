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


//! Store adapter: raw CRUD against the `library` table
//!
//! No business rules live here; the library service has already validated
//! and encoded everything. The schema-level constraints (non-null title,
//! unique isbn) remain as a backstop, and constraint violations are
//! translated into domain errors at this boundary so raw driver error text
//! never reaches callers.
//!
//! Each function is a single atomic statement. Update and delete return the
//! affected row count and leave the not-found decision to the service.

use sqlx::SqlitePool;

use crate::error::{LibraryError, Result};
use crate::storage::models::{BookRow, NewBookRow};

/// Insert a new book row
///
/// Returns the store-assigned id. An ISBN collision trips the unique
/// constraint and comes back as `DuplicateIsbn`.
pub async fn insert_book(pool: &SqlitePool, book: &NewBookRow) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO library (isbn, title, authors, description, cover_art, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.authors)
    .bind(&book.description)
    .bind(&book.cover_art)
    .bind(book.status.as_str())
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .map_err(|e| classify_insert_error(e, book.isbn.as_deref()))?;

    Ok(result.last_insert_rowid())
}

/// Translate a failed insert into a domain error
///
/// A unique violation on the isbn column becomes `DuplicateIsbn`; everything
/// else passes through as a store error.
fn classify_insert_error(err: sqlx::Error, isbn: Option<&str>) -> LibraryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() && db_err.message().contains("library.isbn") {
            return LibraryError::DuplicateIsbn(isbn.unwrap_or_default().to_string());
        }
    }
    err.into()
}

/// Find book by exact ISBN
pub async fn find_book_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<Option<BookRow>> {
    let row = sqlx::query_as::<_, BookRow>("SELECT * FROM library WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Find book by case-insensitive exact title match
///
/// At most one row: title is the service-level dedup key even though the
/// schema doesn't constrain it.
pub async fn find_book_by_title(pool: &SqlitePool, title: &str) -> Result<Option<BookRow>> {
    let row = sqlx::query_as::<_, BookRow>(
        "SELECT * FROM library WHERE LOWER(title) = LOWER(?)",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Find book by store-assigned id
pub async fn find_book_by_id(pool: &SqlitePool, id: i64) -> Result<Option<BookRow>> {
    let row = sqlx::query_as::<_, BookRow>("SELECT * FROM library WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// List all book rows in store retrieval order
///
/// Ordered by id so ties in the service-side author sort stay stable across
/// calls. Returns an empty list for an empty library.
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<BookRow>> {
    let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM library ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Update the status column for a case-insensitive title match
///
/// Returns the number of rows affected; zero means no such title.
pub async fn update_status_by_title(
    pool: &SqlitePool,
    title: &str,
    status: &str,
) -> Result<u64> {
    let result = sqlx::query("UPDATE library SET status = ? WHERE LOWER(title) = LOWER(?)")
        .bind(status)
        .bind(title)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete the row with the given exact ISBN
///
/// Returns the number of rows affected; zero means no such ISBN.
pub async fn delete_book_by_isbn(pool: &SqlitePool, isbn: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM library WHERE isbn = ?")
        .bind(isbn)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
