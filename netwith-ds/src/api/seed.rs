//! Sample data endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::db::seed;
use crate::error::ApiResult;
use crate::AppState;

/// Response for seeding
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// IDs of the inserted sample users
    pub created: Vec<Uuid>,
}

/// POST /api/seed
///
/// Replace the sample users with a fresh copy. Intended for demos and
/// local development.
pub async fn seed_sample_data(State(state): State<AppState>) -> ApiResult<Json<SeedResponse>> {
    let created = seed::seed_sample_users(&state.db).await?;
    Ok(Json(SeedResponse { created }))
}

/// Build seed routes
pub fn seed_routes() -> Router<AppState> {
    Router::new().route("/api/seed", post(seed_sample_data))
}
