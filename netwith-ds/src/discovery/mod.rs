//! Discovery engine
//!
//! Sessions hold a shuffled deck of candidates per user; sources decide
//! which users are in the deck.

pub mod session;
pub mod source;

pub use session::{AdvanceOutcome, DiscoverySession, ExhaustionPolicy};
pub use source::{CandidateSource, SqliteCandidateSource};
