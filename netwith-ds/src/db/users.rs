//! User profile queries
//!
//! Rows come back as [`UserRow`] with list fields still in whatever
//! encoding the writer used; normalization happens in the caller via
//! `netwith_common::normalize`.

use netwith_common::db::UserRow;
use netwith_common::profile::{ExperienceEntry, LookingFor};
use netwith_common::{Error, Result};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// Partial profile update
///
/// Absent fields leave the stored column untouched. List fields are
/// re-encoded as canonical JSON arrays on write, so updated rows never
/// carry the legacy encodings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<String>,
    pub profile_image_url: Option<String>,
    pub looking_for: Option<LookingFor>,
}

const USER_COLUMNS: &str = "id, email, name, bio, skills, interests, experience, \
     education, profile_image_url, looking_for";

pub(crate) fn user_from_row(row: &SqliteRow) -> UserRow {
    UserRow {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        bio: row.get("bio"),
        skills: row.get("skills"),
        interests: row.get("interests"),
        experience: row.get("experience"),
        education: row.get("education"),
        profile_image_url: row.get("profile_image_url"),
        looking_for: row.get("looking_for"),
    }
}

/// Get a single user by ID
pub async fn get_user(db: &Pool<Sqlite>, user_id: Uuid) -> Result<UserRow> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(user_id.to_string())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

    Ok(user_from_row(&row))
}

/// Candidate rows for a viewer's discovery session
///
/// Excludes the viewer themselves and every user the viewer has already
/// swiped on, pass or connect. Newest profiles first; the session
/// shuffles, so the order here only affects which rows are in the pool,
/// not presentation order.
pub async fn discovery_candidates(db: &Pool<Sqlite>, viewer_id: Uuid) -> Result<Vec<UserRow>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM users
        WHERE id != ?
          AND id NOT IN (SELECT swiped_id FROM swipes WHERE swiper_id = ?)
        ORDER BY created_at DESC
        "#,
        USER_COLUMNS
    ))
    .bind(viewer_id.to_string())
    .bind(viewer_id.to_string())
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Apply a partial update to a user's profile
///
/// Returns `NotFound` if the user does not exist.
pub async fn update_profile(
    db: &Pool<Sqlite>,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<()> {
    let skills = encode_list(update.skills.as_ref())?;
    let interests = encode_list(update.interests.as_ref())?;
    let experience = encode_list(update.experience.as_ref())?;
    let looking_for = update.looking_for.as_ref().map(|l| l.to_db_string());

    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            bio = COALESCE(?, bio),
            skills = COALESCE(?, skills),
            interests = COALESCE(?, interests),
            experience = COALESCE(?, experience),
            education = COALESCE(?, education),
            profile_image_url = COALESCE(?, profile_image_url),
            looking_for = COALESCE(?, looking_for),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.bio)
    .bind(skills)
    .bind(interests)
    .bind(experience)
    .bind(&update.education)
    .bind(&update.profile_image_url)
    .bind(looking_for)
    .bind(user_id.to_string())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("user {}", user_id)));
    }

    Ok(())
}

fn encode_list<T: serde::Serialize>(list: Option<&Vec<T>>) -> Result<Option<String>> {
    list.map(|l| serde_json::to_string(l))
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to encode list field: {}", e)))
}
