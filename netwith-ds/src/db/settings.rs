//! Settings persistence
//!
//! Typed accessors over the settings key/value table. Values are stored
//! as strings and parsed on read.

use crate::discovery::ExhaustionPolicy;
use netwith_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::warn;

/// Load the discovery exhaustion policy
///
/// Unknown stored values fall back to the default policy rather than
/// failing startup.
pub async fn load_exhaustion_policy(db: &Pool<Sqlite>) -> Result<ExhaustionPolicy> {
    match get_setting::<String>(db, "discovery_exhaustion_policy").await? {
        Some(value) => match ExhaustionPolicy::from_str(&value) {
            Some(policy) => Ok(policy),
            None => {
                warn!(
                    "Unknown discovery_exhaustion_policy '{}', using {}",
                    value,
                    ExhaustionPolicy::default()
                );
                Ok(ExhaustionPolicy::default())
            }
        },
        None => Ok(ExhaustionPolicy::default()),
    }
}

/// Persist the discovery exhaustion policy
pub async fn save_exhaustion_policy(db: &Pool<Sqlite>, policy: ExhaustionPolicy) -> Result<()> {
    set_setting(db, "discovery_exhaustion_policy", policy.to_db_string()).await
}

/// Load the event bus channel capacity
///
/// # Returns
/// Capacity in events (default: 100 if not set)
pub async fn load_event_bus_capacity(db: &Pool<Sqlite>) -> Result<usize> {
    match get_setting::<usize>(db, "event_bus_capacity").await? {
        Some(capacity) => {
            // Clamp to valid range: 16-10000 events
            Ok(capacity.clamp(16, 10000))
        }
        None => Ok(100),
    }
}

/// Generic setting getter
///
/// Returns None if key doesn't exist in database.
/// Parses value from string using FromStr trait.
pub async fn get_setting<T: FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match value {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}
