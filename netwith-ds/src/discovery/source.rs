//! Candidate sourcing
//!
//! Abstracts where a session's candidate pool comes from. The production
//! source reads the users table; tests substitute fixed pools.

use crate::db::users;
use async_trait::async_trait;
use netwith_common::normalize::normalize_record;
use netwith_common::{Error, Profile, Result};
use sqlx::{Pool, Sqlite};
use tracing::warn;
use uuid::Uuid;

/// Source of candidate profiles for a viewer's discovery session
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetch the candidate pool for a viewer
    ///
    /// Returns normalized profiles, excluding the viewer and anyone they
    /// have already swiped on. Failures surface as `Error::Fetch`.
    async fn candidates_for(&self, viewer_id: Uuid) -> Result<Vec<Profile>>;
}

/// Candidate source backed by the users table
pub struct SqliteCandidateSource {
    db: Pool<Sqlite>,
}

impl SqliteCandidateSource {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CandidateSource for SqliteCandidateSource {
    async fn candidates_for(&self, viewer_id: Uuid) -> Result<Vec<Profile>> {
        let rows = users::discovery_candidates(&self.db, viewer_id)
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_raw_record() {
                Ok(record) => profiles.push(normalize_record(&record)),
                Err(e) => warn!("Skipping candidate row with invalid ID: {}", e),
            }
        }

        Ok(profiles)
    }
}
