//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and bootstrap the schema.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes if they don't exist.
async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            location TEXT NOT NULL,
            url TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opportunities (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            content TEXT NOT NULL,
            related_url TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            id TEXT PRIMARY KEY,
            opportunity_id TEXT NOT NULL,
            name TEXT NOT NULL,
            discord_id TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the foreign keys and orderings the views lean on
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_opportunities_event_id ON opportunities(event_id);
        CREATE INDEX IF NOT EXISTS idx_opportunities_date ON opportunities(date);
        CREATE INDEX IF NOT EXISTS idx_participants_opportunity_id ON participants(opportunity_id);
        CREATE INDEX IF NOT EXISTS idx_participants_name ON participants(name);
        CREATE INDEX IF NOT EXISTS idx_events_start_date ON events(start_date);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
