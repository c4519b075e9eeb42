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


//! Database migrations
//!
//! Schema creation and upgrades, implemented as runtime SQL execution and
//! tracked in the `_migrations` table. sqlx's compile-time migration system
//! needs a build-time database connection, which this crate avoids.

use sqlx::{Executor, SqlitePool};

use crate::error::Result;

/// Run all database migrations
///
/// Creates the schema and applies any pending migrations in order.
/// Called automatically when a new database connection is created.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create initial database schema
///
/// One table. The ISBN unique constraint is the store's physical identity
/// key; title uniqueness is a service-level policy and deliberately not
/// constrained here (two books with the same title but different ISBNs stay
/// store-legal).
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- library table: one row per book in the personal library
CREATE TABLE IF NOT EXISTS library (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn TEXT UNIQUE,                        -- nullable; unique when present
    title TEXT NOT NULL,
    authors TEXT NOT NULL,                   -- JSON-encoded ordered author list
    description TEXT,
    cover_art TEXT,                          -- cover image URL
    status TEXT NOT NULL DEFAULT 'unread',   -- unread, read, currently reading
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Case-insensitive title lookups back the duplicate check and FindByTitle
CREATE INDEX IF NOT EXISTS idx_library_title ON library (title COLLATE NOCASE);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::storage::database::Database;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        // Running again must be a no-op, not a failure
        db.migrate().await.expect("Second migration run failed");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .expect("Failed to count migrations");
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn test_schema_has_library_table() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let name: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'library'",
        )
        .fetch_optional(db.pool())
        .await
        .expect("Failed to query sqlite_master");

        assert_eq!(name.as_deref(), Some("library"));
    }
}
