//! MyLibrary core: persistence and reconciliation for a personal book tracker
//!
//! This crate owns the canonical book record. It enforces identity rules
//! across two candidate keys (case-insensitive title at the service level,
//! ISBN at the store level), normalizes variant input shapes (author lists
//! vs. comma-joined strings, status defaults, leading "By " tokens), and
//! round-trips the ordered author list through a scalar SQLite column.
//!
//! The HTTP routing layer, the external book search/scrape adapters, and
//! process bootstrapping are external collaborators; they call into
//! [`library::LibraryService`] and never touch [`storage`] directly.
//!
//! ```no_run
//! use mylibrary_core::library::LibraryService;
//! use mylibrary_core::storage::{Database, NewBook};
//!
//! # async fn example() -> mylibrary_core::Result<()> {
//! let db = Database::new(Database::default_path()).await?;
//! let library = LibraryService::new(db);
//!
//! let added = library
//!     .add_book(NewBook::new("The Hobbit", "By J.R.R. Tolkien"))
//!     .await?;
//! library.update_status(&added.title, "currently reading").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod library;
pub mod storage;

pub use error::{LibraryError, Result};
pub use library::{LibraryService, RateLimiter};
pub use storage::{AuthorsInput, Book, Database, NewBook, ReadingStatus};
