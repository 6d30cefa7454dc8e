//! Database models

use crate::profile::RawProfileRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A row from the users table, exactly as stored
///
/// The list columns stay as their raw TEXT so the profile normalizer can
/// apply its fallback chain to whatever encoding the writer used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub profile_image_url: Option<String>,
    pub looking_for: Option<String>,
}

impl UserRow {
    /// Convert the row into a raw record ready for normalization.
    ///
    /// The only thing that can fail here is a malformed id column, which
    /// means the row itself is corrupt.
    pub fn into_raw_record(self) -> Result<RawProfileRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Internal(format!("Malformed user id {:?}: {}", self.id, e)))?;

        Ok(RawProfileRecord {
            id,
            email: self.email,
            name: self.name,
            bio: self.bio,
            skills: self.skills.map(Value::String),
            interests: self.interests.map(Value::String),
            experience: self.experience.map(Value::String),
            education: self.education,
            profile_image_url: self.profile_image_url,
            looking_for: self.looking_for,
        })
    }
}

/// A row from the matches table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub matched_at: String,
}

impl MatchRow {
    /// The other member of the pair, from `viewer`'s perspective
    pub fn other_user_id(&self, viewer: &str) -> &str {
        if self.user1_id == viewer {
            &self.user2_id
        } else {
            &self.user1_id
        }
    }
}
