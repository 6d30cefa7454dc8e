//! Database initialization
//!
//! Creates the database on first run with the default schema. Every
//! statement here is idempotent so startup can run them unconditionally.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Interim busy timeout until the settings table exists
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent, safe to call multiple times)
    create_schema_version_table(&pool).await?;
    create_users_table(&pool).await?;
    create_swipes_table(&pool).await?;
    create_matches_table(&pool).await?;
    create_settings_table(&pool).await?;

    // Initialize default settings
    init_default_settings(&pool).await?;

    // Apply configurable busy timeout from settings
    let timeout_ms: i64 = sqlx::query_scalar(
        "SELECT CAST(value AS INTEGER) FROM settings WHERE key = 'database_busy_timeout_ms'",
    )
    .fetch_optional(&pool)
    .await?
    .unwrap_or(5000);

    let pragma_sql = format!("PRAGMA busy_timeout = {}", timeout_ms);
    sqlx::query(&pragma_sql).execute(&pool).await?;

    info!("Database busy timeout set to {} ms", timeout_ms);

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Baseline schema version; bumped when migrations are introduced
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (1)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the users table
///
/// The list columns (`skills`, `interests`, `experience`) are plain TEXT
/// with no format constraint. Historical writers stored JSON arrays,
/// JSON-encoded strings, and raw comma-joined text in them, which is why
/// every read goes through the profile normalizer.
pub async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            bio TEXT,
            skills TEXT,
            interests TEXT,
            experience TEXT,
            education TEXT,
            profile_image_url TEXT,
            looking_for TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Candidate queries order by newest first
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the swipes table
///
/// One row per (swiper, swiped) pair. A repeated decision on the same
/// pair overwrites the direction rather than adding a row.
pub async fn create_swipes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS swipes (
            id TEXT PRIMARY KEY,
            swiper_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            swiped_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            direction TEXT NOT NULL CHECK (direction IN ('pass', 'connect')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (swiper_id, swiped_id),
            CHECK (swiper_id <> swiped_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_swipes_swiper ON swipes(swiper_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_swipes_swiped ON swipes(swiped_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the matches table
///
/// The pair is stored in canonical order (user1_id < user2_id) so the
/// UNIQUE constraint makes match creation idempotent regardless of
/// which side swiped last.
pub async fn create_matches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            id TEXT PRIMARY KEY,
            user1_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            user2_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            matched_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user1_id, user2_id),
            CHECK (user1_id < user2_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_matches_user1 ON matches(user1_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_matches_user2 ON matches(user2_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// Ensures all required settings exist with default values. NULL values
/// are reset to their defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Discovery settings
    ensure_setting(pool, "discovery_exhaustion_policy", "reshuffle").await?;

    // Event system settings
    ensure_setting(pool, "event_bus_capacity", "100").await?;

    // Database settings
    ensure_setting(pool, "database_busy_timeout_ms", "5000").await?;

    info!("Default settings initialized");
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // Use INSERT OR IGNORE to handle concurrent initialization race
        // conditions; multiple tasks may pass the exists check simultaneously
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;

        info!(
            "Initialized setting '{}' with default value: {}",
            key, default_value
        );
        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;

        warn!(
            "Setting '{}' was NULL, reset to default: {}",
            key, default_value
        );
    }

    Ok(())
}
