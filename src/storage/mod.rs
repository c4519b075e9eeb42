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


//! Database storage and models
//!
//! Owns the physical schema and raw persistence for the `library` table.
//! Business rules live in [`crate::library`]; this layer only defends its
//! own schema-level invariants (non-null title, unique isbn) and translates
//! constraint violations into domain errors.
//!
//! # Usage Example
//! ```no_run
//! use mylibrary_core::storage::{queries, Database};
//! use mylibrary_core::storage::models::{encode_authors, NewBookRow, ReadingStatus};
//!
//! # async fn example() -> mylibrary_core::Result<()> {
//! let db = Database::new("./library.db").await?;
//!
//! let row = NewBookRow {
//!     isbn: Some("9780547928227".to_string()),
//!     title: "The Hobbit".to_string(),
//!     authors: encode_authors(&["J.R.R. Tolkien".to_string()])?,
//!     description: None,
//!     cover_art: None,
//!     status: ReadingStatus::Unread,
//! };
//! let id = queries::insert_book(db.pool(), &row).await?;
//! let found = queries::find_book_by_title(db.pool(), "the hobbit").await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

// Re-export commonly used types
pub use database::Database;
pub use models::{AuthorsInput, Book, BookRow, NewBook, NewBookRow, ReadingStatus};
