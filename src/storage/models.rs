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


//! Database entity models
//!
//! Row and domain shapes for the single `library` table, plus the input
//! shapes accepted from callers.
//!
//! # SQLite Adaptations
//! - `authors` is an ordered list of names stored as a JSON array in a TEXT
//!   column. Encoding is strictly reversible: decoding reproduces the exact
//!   sequence, order included (first author drives the display sort).
//! - `status` is stored as its canonical lowercase string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{LibraryError, Result};

// ============================================================================
// ENUMS
// ============================================================================

/// Reading status of a book
///
/// Closed set; no other string is ever persisted. The canonical string for
/// `CurrentlyReading` is `"currently reading"` (space-separated, as persisted
/// by every upstream revision), but `"currently_reading"` is accepted on
/// input. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[default]
    #[serde(rename = "unread")]
    Unread,
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "currently reading")]
    CurrentlyReading,
}

impl ReadingStatus {
    /// Canonical string persisted in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Unread => "unread",
            ReadingStatus::Read => "read",
            ReadingStatus::CurrentlyReading => "currently reading",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unread" => Ok(ReadingStatus::Unread),
            "read" => Ok(ReadingStatus::Read),
            "currently reading" | "currently_reading" => Ok(ReadingStatus::CurrentlyReading),
            _ => Err(LibraryError::InvalidStatus(s.to_string())),
        }
    }
}

// ============================================================================
// AUTHORS ENCODING
// ============================================================================

/// Encode an ordered author list for the TEXT `authors` column
///
/// JSON array form; `decode_authors` reproduces the exact input sequence.
pub fn encode_authors(authors: &[String]) -> Result<String> {
    Ok(serde_json::to_string(authors)?)
}

/// Decode the `authors` column back to the original ordered list
pub fn decode_authors(encoded: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(encoded)?)
}

/// Authors as supplied by callers
///
/// Upstream sources disagree on shape: the search adapter hands over a list,
/// older clients a single comma-joined string. Resolved to one canonical
/// ordered list by [`AuthorsInput::into_names`] at the service boundary,
/// never downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorsInput {
    List(Vec<String>),
    Joined(String),
}

impl AuthorsInput {
    /// Normalize to an ordered list of author names
    ///
    /// Splits the joined form on commas, trims whitespace, strips a leading
    /// `"By "` token from each entry, and drops entries left empty. Order is
    /// preserved.
    pub fn into_names(self) -> Vec<String> {
        let raw = match self {
            AuthorsInput::List(names) => names,
            AuthorsInput::Joined(joined) => {
                joined.split(',').map(str::to_string).collect()
            }
        };

        raw.iter()
            .map(|name| {
                let name = name.trim();
                name.strip_prefix("By ").unwrap_or(name).trim().to_string()
            })
            .filter(|name| !name.is_empty())
            .collect()
    }
}

impl From<Vec<String>> for AuthorsInput {
    fn from(names: Vec<String>) -> Self {
        AuthorsInput::List(names)
    }
}

impl From<&str> for AuthorsInput {
    fn from(joined: &str) -> Self {
        AuthorsInput::Joined(joined.to_string())
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Physical row of the `library` table
///
/// `authors` is still JSON-encoded here; the library service decodes it
/// before anything leaves the crate.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    /// Primary key (auto-increment, store-assigned, immutable)
    pub id: i64,
    /// Unique when present; null for records without a known ISBN
    pub isbn: Option<String>,
    pub title: String,
    /// JSON-encoded ordered author list
    pub authors: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub cover_art: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Book as returned to callers, with the authors column decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub title: String,
    /// Ordered; first author drives the library sort
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub cover_art: Option<String>,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Decode a physical row into the domain shape
    ///
    /// Fails if the authors column does not decode or the status column holds
    /// a string outside the enum; both indicate a row this crate did not
    /// write.
    pub fn from_row(row: BookRow) -> Result<Self> {
        let authors = decode_authors(&row.authors)?;
        let status = row.status.parse()?;

        Ok(Book {
            id: row.id,
            isbn: row.isbn,
            title: row.title,
            authors,
            description: row.description,
            cover_art: row.cover_art,
            status,
            created_at: row.created_at,
        })
    }

    /// Sort key for the library listing: the last whitespace-delimited token
    /// of the first author's name, lowercased. Empty when there is no author,
    /// which sorts first.
    pub fn author_sort_key(&self) -> String {
        self.authors
            .first()
            .and_then(|name| name.split_whitespace().last())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// Insert shape accepted from callers
///
/// `status` stays a raw string here so values outside the enum surface as
/// `InvalidStatus` from the service rather than a deserialization failure at
/// the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub isbn: Option<String>,
    pub title: String,
    pub authors: AuthorsInput,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_art: Option<String>,
    /// Defaults to `unread` when absent
    #[serde(default)]
    pub status: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, authors: impl Into<AuthorsInput>) -> Self {
        Self {
            isbn: None,
            title: title.into(),
            authors: authors.into(),
            description: None,
            cover_art: None,
            status: None,
        }
    }
}

/// Validated, encoded row ready for `queries::insert_book`
///
/// Only the library service constructs these; the store adapter trusts the
/// contents apart from its own schema-level constraints.
#[derive(Debug, Clone)]
pub struct NewBookRow {
    pub isbn: Option<String>,
    pub title: String,
    /// JSON-encoded ordered author list
    pub authors: String,
    pub description: Option<String>,
    pub cover_art: Option<String>,
    pub status: ReadingStatus,
}
