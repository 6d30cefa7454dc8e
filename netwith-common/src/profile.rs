//! Canonical profile types
//!
//! `RawProfileRecord` is a profile as it sits in storage, where the list
//! fields may be JSON arrays, JSON-encoded strings, comma-joined strings,
//! or plain strings depending on which writer produced them.
//! `Profile` is the canonical shape every consumer sees after
//! normalization (see [`crate::normalize`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Image path served when a user never uploaded a photo
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/200/200";

/// What a user is on the platform to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookingFor {
    Mentor,
    Partner,
    Network,
}

impl LookingFor {
    /// Parse a stored value. Unknown or empty strings are treated as unset.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" => Some(LookingFor::Mentor),
            "partner" => Some(LookingFor::Partner),
            "network" => Some(LookingFor::Network),
            _ => None,
        }
    }

    /// String form used in the database
    pub fn to_db_string(&self) -> &'static str {
        match self {
            LookingFor::Mentor => "mentor",
            LookingFor::Partner => "partner",
            LookingFor::Network => "network",
        }
    }
}

impl std::fmt::Display for LookingFor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// One work-history entry on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

impl ExperienceEntry {
    /// Wrap free text as a minimal entry.
    ///
    /// Early signup forms stored a single free-text line for experience,
    /// so only the title is known.
    pub fn from_free_text(text: impl Into<String>) -> Self {
        ExperienceEntry {
            title: text.into(),
            company: "Not specified".to_string(),
            period: "Current".to_string(),
            description: String::new(),
        }
    }
}

/// A profile as stored, before normalization
///
/// The three list fields are kept as raw [`serde_json::Value`] because
/// historical writers disagreed on their encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfileRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Value>,
    pub interests: Option<Value>,
    pub experience: Option<Value>,
    pub education: Option<String>,
    pub profile_image_url: Option<String>,
    pub looking_for: Option<String>,
}

/// Canonical profile shape produced by normalization
///
/// Every field is present. Missing source data is replaced by the
/// documented placeholder values, never by an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: String,
    pub profile_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looking_for: Option<LookingFor>,
    /// Headline lifted from the first experience entry for card display
    pub title: String,
    pub company: String,
}
