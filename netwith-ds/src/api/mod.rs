//! HTTP API handlers for netwith-ds

pub mod discovery;
pub mod health;
pub mod matches;
pub mod profiles;
pub mod seed;
pub mod sse;

pub use discovery::discovery_routes;
pub use health::health_routes;
pub use matches::match_routes;
pub use profiles::profile_routes;
pub use seed::seed_routes;
pub use sse::event_stream;
