//! Swipe recording and mutual-match detection

use netwith_common::db::MatchRow;
use netwith_common::events::SwipeDirection;
use netwith_common::{Error, Result};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// Record a swipe and detect a mutual connect
///
/// Re-swiping the same target overwrites the stored direction rather than
/// erroring, so a pass can later become a connect. Returns the newly
/// created match when this swipe completes a mutual connect; a match that
/// already exists is never returned again.
pub async fn record_swipe(
    db: &Pool<Sqlite>,
    swiper_id: Uuid,
    swiped_id: Uuid,
    direction: SwipeDirection,
) -> Result<Option<MatchRow>> {
    if swiper_id == swiped_id {
        return Err(Error::InvalidInput(
            "cannot swipe on your own profile".to_string(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO swipes (id, swiper_id, swiped_id, direction)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (swiper_id, swiped_id)
        DO UPDATE SET direction = excluded.direction, created_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(swiper_id.to_string())
    .bind(swiped_id.to_string())
    .bind(direction.to_db_string())
    .execute(db)
    .await?;

    if direction != SwipeDirection::Connect {
        return Ok(None);
    }

    try_create_match(db, swiper_id, swiped_id).await
}

/// Create a match if the reciprocal connect swipe exists
///
/// The pair is stored in canonical order (user1_id < user2_id) so the
/// UNIQUE constraint is direction-agnostic.
async fn try_create_match(db: &Pool<Sqlite>, a: Uuid, b: Uuid) -> Result<Option<MatchRow>> {
    let reciprocal = sqlx::query(
        "SELECT 1 FROM swipes WHERE swiper_id = ? AND swiped_id = ? AND direction = 'connect'",
    )
    .bind(b.to_string())
    .bind(a.to_string())
    .fetch_optional(db)
    .await?;

    if reciprocal.is_none() {
        return Ok(None);
    }

    let (mut user1, mut user2) = (a.to_string(), b.to_string());
    if user1 > user2 {
        std::mem::swap(&mut user1, &mut user2);
    }

    let result =
        sqlx::query("INSERT OR IGNORE INTO matches (id, user1_id, user2_id) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&user1)
            .bind(&user2)
            .execute(db)
            .await?;

    if result.rows_affected() == 0 {
        // Match already existed (repeated connect swipe)
        return Ok(None);
    }

    let row = sqlx::query(
        "SELECT id, user1_id, user2_id, matched_at FROM matches WHERE user1_id = ? AND user2_id = ?",
    )
    .bind(&user1)
    .bind(&user2)
    .fetch_one(db)
    .await?;

    Ok(Some(MatchRow {
        id: row.get("id"),
        user1_id: row.get("user1_id"),
        user2_id: row.get("user2_id"),
        matched_at: row.get("matched_at"),
    }))
}
