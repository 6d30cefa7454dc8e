//! Profile endpoints
//!
//! Reads return the normalized shape regardless of how the stored row is
//! encoded; writes re-encode list fields canonically.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db::users::{self, ProfileUpdate};
use crate::error::ApiResult;
use crate::AppState;
use netwith_common::events::NetWithEvent;
use netwith_common::normalize::normalize_record;
use netwith_common::Profile;

/// GET /api/profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Profile>> {
    let row = users::get_user(&state.db, user_id).await?;
    let record = row.into_raw_record()?;
    Ok(Json(normalize_record(&record)))
}

/// PUT /api/profiles/:user_id
///
/// Apply a partial update and return the updated normalized profile.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Profile>> {
    users::update_profile(&state.db, user_id, &update).await?;

    state.event_bus.emit_lossy(NetWithEvent::ProfileUpdated {
        user_id,
        timestamp: Utc::now(),
    });

    let row = users::get_user(&state.db, user_id).await?;
    let record = row.into_raw_record()?;
    Ok(Json(normalize_record(&record)))
}

/// Build profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/api/profiles/:user_id",
        get(get_profile).put(update_profile),
    )
}
