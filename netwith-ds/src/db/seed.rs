//! Sample data seeding
//!
//! Inserts a small set of well-known demo profiles. Existing rows with
//! the sample emails are deleted first, so seeding is repeatable.

use netwith_common::Result;
use sqlx::{Pool, Sqlite};
use tracing::info;
use uuid::Uuid;

struct SampleUser {
    email: &'static str,
    name: &'static str,
    bio: &'static str,
    skills: &'static str,
    interests: &'static str,
    experience: &'static str,
    education: &'static str,
    looking_for: &'static str,
}

const SAMPLE_USERS: &[SampleUser] = &[
    SampleUser {
        email: "sarah@example.com",
        name: "Sarah Johnson",
        bio: "Passionate about building innovative solutions and connecting with talented professionals.",
        skills: r#"["React", "TypeScript", "Node.js", "Python"]"#,
        interests: r#"["Technology", "Innovation", "Startups"]"#,
        experience: r#"[{"title": "Senior Software Engineer", "company": "Google", "period": "2022 - Present", "description": "Leading development of core platform features"}]"#,
        education: "BS Computer Science - Stanford",
        looking_for: "network",
    },
    SampleUser {
        email: "mike@example.com",
        name: "Mike Chen",
        bio: "Product leader with a passion for user experience.",
        skills: r#"["Product Strategy", "Analytics", "Leadership"]"#,
        interests: r#"["UX", "Data", "Team Building"]"#,
        experience: r#"[{"title": "Product Manager", "company": "Meta", "period": "2021 - Present", "description": "Leading product development"}]"#,
        education: "MBA - Harvard Business School",
        looking_for: "partner",
    },
    SampleUser {
        email: "emily@example.com",
        name: "Emily Rodriguez",
        bio: "Creating beautiful, intuitive designs that users love.",
        skills: r#"["Figma", "UI/UX", "Design Systems", "Prototyping"]"#,
        interests: r#"["Design", "Art", "User Research"]"#,
        experience: r#"[{"title": "UX Designer", "company": "Apple", "period": "2021 - Present", "description": "Designing next-gen products"}]"#,
        education: "BFA Design - RISD",
        looking_for: "mentor",
    },
];

/// Replace the sample users with a fresh copy
///
/// Returns the IDs of the inserted users. Deleting first cascades away
/// any swipes and matches the previous sample rows accumulated.
pub async fn seed_sample_users(db: &Pool<Sqlite>) -> Result<Vec<Uuid>> {
    sqlx::query("DELETE FROM users WHERE email IN (?, ?, ?)")
        .bind(SAMPLE_USERS[0].email)
        .bind(SAMPLE_USERS[1].email)
        .bind(SAMPLE_USERS[2].email)
        .execute(db)
        .await?;

    let mut ids = Vec::with_capacity(SAMPLE_USERS.len());
    for user in SAMPLE_USERS {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, bio, skills, interests,
                               experience, education, looking_for)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(user.email)
        .bind(user.name)
        .bind(user.bio)
        .bind(user.skills)
        .bind(user.interests)
        .bind(user.experience)
        .bind(user.education)
        .bind(user.looking_for)
        .execute(db)
        .await?;
        ids.push(id);
    }

    info!("Seeded {} sample users", ids.len());
    Ok(ids)
}
