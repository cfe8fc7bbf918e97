//! Durable retention of the cart identifier.
//!
//! Only the identifier survives a restart; cart contents can change
//! server-side between sessions and are always re-fetched from the
//! commerce platform.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
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

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Single-row table: the persisted cart identifier is the only durable state.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cart_session (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            cart_id TEXT,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO cart_session (id, cart_id, updated_at)
        VALUES (1, NULL, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
