//! netwith-ds library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod db;
pub mod discovery;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use discovery::{CandidateSource, DiscoverySession, ExhaustionPolicy, SqliteCandidateSource};
use netwith_common::events::EventBus;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Where session candidate pools come from
    pub candidate_source: Arc<dyn CandidateSource>,
    /// Active discovery sessions keyed by viewer
    pub sessions: Arc<RwLock<HashMap<Uuid, DiscoverySession>>>,
    /// Exhaustion policy applied to newly started sessions
    pub exhaustion_policy: ExhaustionPolicy,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, event_bus: EventBus, exhaustion_policy: ExhaustionPolicy) -> Self {
        let candidate_source: Arc<dyn CandidateSource> =
            Arc::new(SqliteCandidateSource::new(db.clone()));
        Self {
            db,
            event_bus,
            candidate_source,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            exhaustion_policy,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::cors::CorsLayer;

    Router::new()
        .merge(api::discovery_routes())
        .merge(api::profile_routes())
        .merge(api::match_routes())
        .merge(api::seed_routes())
        .route("/api/events", get(api::event_stream))
        .merge(api::health_routes())
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
