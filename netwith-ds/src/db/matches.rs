//! Match queries

use crate::db::users::user_from_row;
use netwith_common::db::UserRow;
use netwith_common::Result;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// One match joined with the other participant's stored profile row
#[derive(Debug, Clone)]
pub struct MatchWithUser {
    pub match_id: String,
    pub matched_at: String,
    pub user: UserRow,
}

/// All matches for a user, newest first
///
/// Each row carries the stored profile of the other participant, still
/// in raw encoding; callers normalize before serving.
pub async fn matches_for_user(db: &Pool<Sqlite>, user_id: Uuid) -> Result<Vec<MatchWithUser>> {
    let rows = sqlx::query(
        r#"
        SELECT m.id AS match_id, m.matched_at,
               u.id, u.email, u.name, u.bio, u.skills, u.interests,
               u.experience, u.education, u.profile_image_url, u.looking_for
        FROM matches m
        JOIN users u ON u.id = CASE
            WHEN m.user1_id = ? THEN m.user2_id
            ELSE m.user1_id
        END
        WHERE m.user1_id = ? OR m.user2_id = ?
        ORDER BY m.matched_at DESC, m.id DESC
        "#,
    )
    .bind(user_id.to_string())
    .bind(user_id.to_string())
    .bind(user_id.to_string())
    .fetch_all(db)
    .await?;

    Ok(rows
        .iter()
        .map(|row| MatchWithUser {
            match_id: row.get("match_id"),
            matched_at: row.get("matched_at"),
            user: user_from_row(row),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE users (
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
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE matches (
                id TEXT PRIMARY KEY,
                user1_id TEXT NOT NULL,
                user2_id TEXT NOT NULL,
                matched_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user1_id, user2_id),
                CHECK (user1_id < user2_id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    async fn insert_user(db: &Pool<Sqlite>, id: Uuid, email: &str, name: &str) {
        sqlx::query("INSERT INTO users (id, email, name) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(email)
            .bind(name)
            .execute(db)
            .await
            .unwrap();
    }

    async fn insert_match(db: &Pool<Sqlite>, a: Uuid, b: Uuid, matched_at: &str) {
        let (mut user1, mut user2) = (a.to_string(), b.to_string());
        if user1 > user2 {
            std::mem::swap(&mut user1, &mut user2);
        }
        sqlx::query("INSERT INTO matches (id, user1_id, user2_id, matched_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(user1)
            .bind(user2)
            .bind(matched_at)
            .execute(db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_matches_resolve_other_participant() {
        let db = setup_test_db().await;
        let a = Uuid::from_bytes([1; 16]);
        let b = Uuid::from_bytes([2; 16]);
        insert_user(&db, a, "a@example.com", "Alice").await;
        insert_user(&db, b, "b@example.com", "Bob").await;
        insert_match(&db, a, b, "2025-01-01 12:00:00").await;

        let for_a = matches_for_user(&db, a).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].user.id, b.to_string());
        assert_eq!(for_a[0].user.name.as_deref(), Some("Bob"));

        let for_b = matches_for_user(&db, b).await.unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].user.id, a.to_string());
    }

    #[tokio::test]
    async fn test_no_matches_returns_empty() {
        let db = setup_test_db().await;
        let a = Uuid::from_bytes([1; 16]);
        insert_user(&db, a, "a@example.com", "Alice").await;

        let matches = matches_for_user(&db, a).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_matches_newest_first() {
        let db = setup_test_db().await;
        let a = Uuid::from_bytes([1; 16]);
        let b = Uuid::from_bytes([2; 16]);
        let c = Uuid::from_bytes([3; 16]);
        insert_user(&db, a, "a@example.com", "Alice").await;
        insert_user(&db, b, "b@example.com", "Bob").await;
        insert_user(&db, c, "c@example.com", "Cara").await;
        insert_match(&db, a, b, "2025-01-01 12:00:00").await;
        insert_match(&db, a, c, "2025-03-01 12:00:00").await;

        let matches = matches_for_user(&db, a).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].user.id, c.to_string());
        assert_eq!(matches[1].user.id, b.to_string());
    }
}
