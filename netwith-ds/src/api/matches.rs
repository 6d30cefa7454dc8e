//! Match listing endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::db::matches;
use crate::error::ApiResult;
use crate::AppState;
use netwith_common::normalize::normalize_record;
use netwith_common::Profile;

/// One match with the other participant's normalized profile
#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub matched_at: String,
    pub profile: Profile,
}

/// GET /api/matches/:user_id
///
/// All matches for a user, newest first.
pub async fn list_matches(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MatchSummary>>> {
    let rows = matches::matches_for_user(&state.db, user_id).await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        match row.user.into_raw_record() {
            Ok(record) => summaries.push(MatchSummary {
                match_id: row.match_id,
                matched_at: row.matched_at,
                profile: normalize_record(&record),
            }),
            Err(e) => warn!("Skipping match {} participant: {}", row.match_id, e),
        }
    }

    Ok(Json(summaries))
}

/// Build match routes
pub fn match_routes() -> Router<AppState> {
    Router::new().route("/api/matches/:user_id", get(list_matches))
}
