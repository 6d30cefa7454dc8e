//! Discovery session endpoints
//!
//! One session per viewer, held in state. Swipes are persisted before the
//! deck advances, so a crash between the two never loses a decision.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{swipes, users};
use crate::discovery::{AdvanceOutcome, DiscoverySession};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use netwith_common::db::MatchRow;
use netwith_common::events::{NetWithEvent, SwipeDirection};
use netwith_common::{Error as CommonError, Profile};

/// Swipe decision request body
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub direction: SwipeDirection,
}

/// Response for session start
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// Number of candidates in the shuffled deck
    pub pool_size: usize,
    /// First candidate under the cursor
    pub current: Profile,
}

/// Match details returned when a swipe completes a mutual connect
#[derive(Debug, Serialize)]
pub struct MatchInfo {
    pub match_id: String,
    pub matched_user_id: String,
    pub matched_at: String,
}

/// Response for a swipe decision
#[derive(Debug, Serialize)]
pub struct DecideResponse {
    /// What the cursor did: next, reshuffled, or wrapped
    pub outcome: AdvanceOutcome,
    /// Present only when this swipe created a new match
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub new_match: Option<MatchInfo>,
    /// Candidate now under the cursor
    pub current: Profile,
    pub can_undo: bool,
}

/// Response for the current-candidate query
#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    /// Candidate under the cursor
    pub current: Profile,
    /// Cursor position within the deck
    pub position: usize,
    pub pool_size: usize,
    pub can_undo: bool,
}

/// Response for undo
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    /// False when there was no history to step back through
    pub undone: bool,
    pub current: Profile,
    pub can_undo: bool,
}

/// Response for session end
#[derive(Debug, Serialize)]
pub struct EndResponse {
    pub ended: bool,
}

/// POST /api/discovery/:user_id/start
///
/// Fetch the viewer's candidate pool, shuffle it into a fresh deck, and
/// replace any session the viewer already had.
pub async fn start_session(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<StartResponse>> {
    // Unknown viewers get a 404 rather than a session over everyone
    users::get_user(&state.db, user_id).await?;

    let pool = match state.candidate_source.candidates_for(user_id).await {
        Ok(pool) => pool,
        Err(e) => {
            *state.last_error.write().await = Some(e.to_string());
            return Err(e.into());
        }
    };
    let pool_size = pool.len();

    let mut session = DiscoverySession::new(user_id, state.exhaustion_policy);
    session.start(pool)?;
    let current = session.current()?.clone();

    state.sessions.write().await.insert(user_id, session);
    info!("Started discovery session for {} ({} candidates)", user_id, pool_size);

    let now = Utc::now();
    state.event_bus.emit_lossy(NetWithEvent::SessionStarted {
        user_id,
        pool_size,
        timestamp: now,
    });
    state.event_bus.emit_lossy(NetWithEvent::CandidateShown {
        user_id,
        candidate_id: current.id,
        timestamp: now,
    });

    Ok(Json(StartResponse { pool_size, current }))
}

/// GET /api/discovery/:user_id/current
///
/// Candidate currently under the viewer's cursor, with deck position
/// and undo state.
pub async fn current_candidate(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<CurrentResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&user_id)
        .ok_or(ApiError::Common(CommonError::EmptySession))?;

    Ok(Json(CurrentResponse {
        current: session.current()?.clone(),
        position: session.position(),
        pool_size: session.len(),
        can_undo: session.can_undo(),
    }))
}

/// POST /api/discovery/:user_id/decide
///
/// Record a swipe on the current candidate, then advance the deck. The
/// swiped candidate stays in the deck for this cycle; they drop out of
/// the pool when the next session starts.
pub async fn decide(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<DecideRequest>,
) -> ApiResult<Json<DecideResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&user_id)
        .ok_or(ApiError::Common(CommonError::EmptySession))?;

    let candidate = session.current()?.clone();
    let new_match = swipes::record_swipe(&state.db, user_id, candidate.id, request.direction).await?;

    let outcome = session.advance()?;
    let current = session.current()?.clone();
    let pool_size = session.len();
    let can_undo = session.can_undo();
    drop(sessions);

    let now = Utc::now();
    state.event_bus.emit_lossy(NetWithEvent::SwipeRecorded {
        swiper_id: user_id,
        swiped_id: candidate.id,
        direction: request.direction,
        timestamp: now,
    });

    let match_info = new_match.map(|m| emit_match_created(&state, &m, user_id, now));

    if outcome == AdvanceOutcome::Reshuffled {
        state.event_bus.emit_lossy(NetWithEvent::DeckReshuffled {
            user_id,
            pool_size,
            timestamp: now,
        });
    }
    state.event_bus.emit_lossy(NetWithEvent::CandidateShown {
        user_id,
        candidate_id: current.id,
        timestamp: now,
    });

    Ok(Json(DecideResponse {
        outcome,
        new_match: match_info,
        current,
        can_undo,
    }))
}

/// POST /api/discovery/:user_id/undo
///
/// Step back to the previously shown candidate. The swipe that was
/// recorded for it is not deleted; a new decision overwrites it.
pub async fn undo(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UndoResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&user_id)
        .ok_or(ApiError::Common(CommonError::EmptySession))?;

    let undone = session.undo();
    let current = session.current()?.clone();
    let can_undo = session.can_undo();
    drop(sessions);

    if undone {
        state.event_bus.emit_lossy(NetWithEvent::CandidateShown {
            user_id,
            candidate_id: current.id,
            timestamp: Utc::now(),
        });
    }

    Ok(Json(UndoResponse {
        undone,
        current,
        can_undo,
    }))
}

/// DELETE /api/discovery/:user_id
///
/// Discard the viewer's session. Ending a session that does not exist is
/// not an error.
pub async fn end_session(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<EndResponse>> {
    let removed = state.sessions.write().await.remove(&user_id);
    if removed.is_some() {
        info!("Ended discovery session for {}", user_id);
    }

    Ok(Json(EndResponse {
        ended: removed.is_some(),
    }))
}

/// Emit MatchCreated and build the response payload for a new match
fn emit_match_created(
    state: &AppState,
    m: &MatchRow,
    viewer_id: Uuid,
    now: chrono::DateTime<chrono::Utc>,
) -> MatchInfo {
    match (
        Uuid::parse_str(&m.id),
        Uuid::parse_str(&m.user1_id),
        Uuid::parse_str(&m.user2_id),
    ) {
        (Ok(match_id), Ok(user1_id), Ok(user2_id)) => {
            state.event_bus.emit_lossy(NetWithEvent::MatchCreated {
                match_id,
                user1_id,
                user2_id,
                timestamp: now,
            });
        }
        _ => warn!("Match {} has unparseable participant IDs", m.id),
    }

    MatchInfo {
        match_id: m.id.clone(),
        matched_user_id: m.other_user_id(&viewer_id.to_string()).to_string(),
        matched_at: m.matched_at.clone(),
    }
}

/// Build discovery routes
pub fn discovery_routes() -> Router<AppState> {
    Router::new()
        .route("/api/discovery/:user_id/start", post(start_session))
        .route("/api/discovery/:user_id/current", get(current_candidate))
        .route("/api/discovery/:user_id/decide", post(decide))
        .route("/api/discovery/:user_id/undo", post(undo))
        .route("/api/discovery/:user_id", delete(end_session))
}
